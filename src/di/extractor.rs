use crate::di::{Container, Injectable};
use crate::error::NestletError;
use axum::{extract::FromRequestParts, http::request::Parts};
use std::sync::Arc;

/// Axum extractor resolving `T` from the application container per request.
///
/// # Example
/// ```no_run
/// use nestlet::{Arguments, Inject, Injectable, Result};
///
/// struct Greeter;
///
/// impl Injectable for Greeter {
///     fn construct(_: &Arguments) -> Result<Self> {
///         Ok(Greeter)
///     }
/// }
///
/// async fn hello(Inject(_greeter): Inject<Greeter>) -> &'static str {
///     "hello"
/// }
/// ```
pub struct Inject<T>(pub Arc<T>);

/// Implemented by router state that carries a DI container.
pub trait HasContainer {
    fn container(&self) -> &Container;
}

impl HasContainer for Arc<Container> {
    fn container(&self) -> &Container {
        self
    }
}

impl<S, T> FromRequestParts<S> for Inject<T>
where
    S: Send + Sync + HasContainer,
    T: Injectable,
{
    type Rejection = NestletError;

    async fn from_request_parts(_parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        state.container().resolve::<T>().map(Inject).map_err(|e| {
            tracing::error!("Dependency injection failed for {}: {}", std::any::type_name::<T>(), e);
            e
        })
    }
}

impl<T> std::ops::Deref for Inject<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> Clone for Inject<T> {
    fn clone(&self) -> Self {
        Inject(Arc::clone(&self.0))
    }
}
