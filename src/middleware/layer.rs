use super::{BoxFuture, Middleware, Next};
use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
};
use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};

/// Tower layer running a chain of [`Middleware`]s, first one outermost.
///
/// A middleware error becomes a 500 response so the layer can wrap an axum
/// router directly.
#[derive(Clone)]
pub struct MiddlewareLayer {
    middlewares: Arc<[Arc<dyn Middleware>]>,
}

impl MiddlewareLayer {
    pub fn new(middlewares: Vec<Arc<dyn Middleware>>) -> Self {
        Self {
            middlewares: middlewares.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }
}

impl<S> Layer<S> for MiddlewareLayer {
    type Service = MiddlewareService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MiddlewareService {
            inner,
            middlewares: Arc::clone(&self.middlewares),
        }
    }
}

#[derive(Clone)]
pub struct MiddlewareService<S> {
    inner: S,
    middlewares: Arc<[Arc<dyn Middleware>]>,
}

impl<S> Service<Request<Body>> for MiddlewareService<S>
where
    S: Service<Request<Body>, Response = Response, Error = Infallible> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Response, Infallible>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        // the polled-ready service goes into the chain, a fresh clone stays behind
        let clone = self.inner.clone();
        let inner = std::mem::replace(&mut self.inner, clone);
        let middlewares = Arc::clone(&self.middlewares);

        Box::pin(async move {
            let mut chain = Next::new(move |req: Request<Body>| -> BoxFuture {
                let mut inner = inner;
                Box::pin(async move {
                    match inner.call(req).await {
                        Ok(response) => Ok(response),
                        Err(never) => match never {},
                    }
                })
            });

            for middleware in middlewares.iter().rev() {
                let middleware = Arc::clone(middleware);
                let next = chain;
                chain = Next::new(move |req: Request<Body>| -> BoxFuture {
                    Box::pin(async move { middleware.intercept(req, next).await })
                });
            }

            Ok(chain.run(request).await.unwrap_or_else(|e| {
                tracing::error!("Middleware chain failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
            }))
        })
    }
}
