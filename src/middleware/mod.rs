use async_trait::async_trait;
use axum::{body::Body, http::Request, response::Response};
use std::future::Future;
use std::pin::Pin;

mod layer;
mod logging;

pub use layer::{MiddlewareLayer, MiddlewareService};
pub use logging::LoggingMiddleware;

/// Standard return type for middlewares
pub type MiddlewareResult = Result<Response, MiddlewareError>;

/// A type-erased error for middlewares
pub type MiddlewareError = Box<dyn std::error::Error + Send + Sync>;

type BoxFuture = Pin<Box<dyn Future<Output = MiddlewareResult> + Send>>;

/// The rest of the chain after the current middleware
pub struct Next {
    run: Box<dyn FnOnce(Request<Body>) -> BoxFuture + Send>,
}

impl Next {
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce(Request<Body>) -> BoxFuture + Send + 'static,
    {
        Self { run: Box::new(f) }
    }

    /// Hand the request to the rest of the chain
    pub async fn run(self, request: Request<Body>) -> MiddlewareResult {
        (self.run)(request).await
    }
}

/// Request interceptor carried by a module.
///
/// Modules declare middlewares next to their providers; the module graph
/// resolver flattens them through imports, and [`MiddlewareLayer`] runs them
/// around a router in declaration order.
///
/// # Example
/// ```
/// use nestlet::middleware::{Middleware, MiddlewareResult, Next};
/// use nestlet::async_trait;
/// use axum::{body::Body, http::Request};
///
/// struct RequireJson;
///
/// #[async_trait]
/// impl Middleware for RequireJson {
///     async fn intercept(&self, request: Request<Body>, next: Next) -> MiddlewareResult {
///         if request.headers().contains_key("content-type") {
///             next.run(request).await
///         } else {
///             Err("missing content-type".into())
///         }
///     }
/// }
/// ```
#[async_trait]
pub trait Middleware: Send + Sync + 'static {
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    async fn intercept(&self, request: Request<Body>, next: Next) -> MiddlewareResult;
}
