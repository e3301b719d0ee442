//! Lifecycle hook traits
//!
//! Hooks take `&self`: providers are shared singletons, so any state a hook
//! changes lives behind the provider's own interior mutability.

use super::LifecycleError;
use async_trait::async_trait;

/// Called once the application's modules are wired and extensions have run.
///
/// # Example
///
/// ```
/// use nestlet::lifecycle::{LifecycleError, OnModuleInit};
/// use nestlet::async_trait;
/// use std::sync::atomic::{AtomicBool, Ordering};
///
/// struct ConnectionPool {
///     ready: AtomicBool,
/// }
///
/// #[async_trait]
/// impl OnModuleInit for ConnectionPool {
///     async fn on_module_init(&self) -> Result<(), LifecycleError> {
///         self.ready.store(true, Ordering::SeqCst);
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait OnModuleInit: Send + Sync {
    async fn on_module_init(&self) -> Result<(), LifecycleError>;
}

/// Called after every [`OnModuleInit`] hook succeeded; the last hook before
/// the application serves requests.
#[async_trait]
pub trait OnApplicationBootstrap: Send + Sync {
    async fn on_application_bootstrap(&self) -> Result<(), LifecycleError>;
}

/// Called when shutdown starts, before any [`OnModuleDestroy`] hook.
#[async_trait]
pub trait OnApplicationShutdown: Send + Sync {
    async fn on_application_shutdown(&self) -> Result<(), LifecycleError>;
}

/// Called during shutdown, in reverse registration order.
#[async_trait]
pub trait OnModuleDestroy: Send + Sync {
    async fn on_module_destroy(&self) -> Result<(), LifecycleError>;
}
