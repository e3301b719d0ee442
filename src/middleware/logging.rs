use crate::middleware::{Middleware, MiddlewareResult, Next};
use async_trait::async_trait;
use axum::{body::Body, http::Request};
use std::time::Instant;

/// A middleware that logs request timing and status
#[derive(Clone, Default)]
pub struct LoggingMiddleware;

#[async_trait]
impl Middleware for LoggingMiddleware {
    async fn intercept(&self, request: Request<Body>, next: Next) -> MiddlewareResult {
        let method = request.method().clone();
        let uri = request.uri().clone();
        let start = Instant::now();

        tracing::debug!(%method, %uri, "Request started");

        match next.run(request).await {
            Ok(response) => {
                tracing::info!(
                    %method,
                    %uri,
                    status = response.status().as_u16(),
                    elapsed = ?start.elapsed(),
                    "Request finished"
                );
                Ok(response)
            }
            Err(e) => {
                tracing::warn!(%method, %uri, elapsed = ?start.elapsed(), "Request failed: {}", e);
                Err(e)
            }
        }
    }
}
