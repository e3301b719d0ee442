//! Registration and execution of lifecycle hooks.

use super::{
    LifecycleError, OnApplicationBootstrap, OnApplicationShutdown, OnModuleDestroy, OnModuleInit,
    Result,
};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

struct LifecycleHook<T: ?Sized> {
    service: Arc<T>,
    name: String,
}

impl<T: ?Sized> LifecycleHook<T> {
    fn new(service: Arc<T>, name: impl Into<String>) -> Self {
        Self {
            service,
            name: name.into(),
        }
    }
}

/// Holds every service taking part in a lifecycle phase.
///
/// Init and bootstrap hooks run in registration order and stop at the first
/// failure. Shutdown hooks run in registration order and destroy hooks in
/// reverse; failures there are logged and the remaining hooks still run.
///
/// # Example
///
/// ```
/// use nestlet::lifecycle::{LifecycleError, LifecycleManager, OnModuleDestroy};
/// use nestlet::async_trait;
/// use std::sync::Arc;
///
/// struct Cache;
///
/// #[async_trait]
/// impl OnModuleDestroy for Cache {
///     async fn on_module_destroy(&self) -> Result<(), LifecycleError> {
///         Ok(())
///     }
/// }
///
/// let mut manager = LifecycleManager::new();
/// manager.register_destroy(Arc::new(Cache), "Cache");
/// assert_eq!(manager.destroy_hook_count(), 1);
/// ```
#[derive(Default)]
pub struct LifecycleManager {
    on_init_hooks: Vec<LifecycleHook<dyn OnModuleInit>>,
    on_bootstrap_hooks: Vec<LifecycleHook<dyn OnApplicationBootstrap>>,
    on_shutdown_hooks: Vec<LifecycleHook<dyn OnApplicationShutdown>>,
    on_destroy_hooks: Vec<LifecycleHook<dyn OnModuleDestroy>>,
}

impl LifecycleManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_init<T>(&mut self, service: Arc<T>, name: impl Into<String>)
    where
        T: OnModuleInit + 'static,
    {
        self.on_init_hooks.push(LifecycleHook::new(service, name));
    }

    pub fn register_bootstrap<T>(&mut self, service: Arc<T>, name: impl Into<String>)
    where
        T: OnApplicationBootstrap + 'static,
    {
        self.on_bootstrap_hooks
            .push(LifecycleHook::new(service, name));
    }

    pub fn register_shutdown<T>(&mut self, service: Arc<T>, name: impl Into<String>)
    where
        T: OnApplicationShutdown + 'static,
    {
        self.on_shutdown_hooks
            .push(LifecycleHook::new(service, name));
    }

    pub fn register_destroy<T>(&mut self, service: Arc<T>, name: impl Into<String>)
    where
        T: OnModuleDestroy + 'static,
    {
        self.on_destroy_hooks
            .push(LifecycleHook::new(service, name));
    }

    pub async fn call_module_init(&self) -> Result<()> {
        tracing::info!(hooks = self.on_init_hooks.len(), "Running OnModuleInit hooks");

        for hook in &self.on_init_hooks {
            tracing::debug!(service = %hook.name, "on_module_init");
            hook.service.on_module_init().await.map_err(|e| {
                tracing::error!(service = %hook.name, "OnModuleInit failed: {}", e);
                LifecycleError::hook_failed("OnModuleInit", &hook.name, &e)
            })?;
        }
        Ok(())
    }

    pub async fn call_module_init_with_timeout(&self, timeout: Duration) -> Result<()> {
        within("OnModuleInit", timeout, self.call_module_init()).await
    }

    pub async fn call_application_bootstrap(&self) -> Result<()> {
        tracing::info!(
            hooks = self.on_bootstrap_hooks.len(),
            "Running OnApplicationBootstrap hooks"
        );

        for hook in &self.on_bootstrap_hooks {
            tracing::debug!(service = %hook.name, "on_application_bootstrap");
            hook.service.on_application_bootstrap().await.map_err(|e| {
                tracing::error!(service = %hook.name, "OnApplicationBootstrap failed: {}", e);
                LifecycleError::hook_failed("OnApplicationBootstrap", &hook.name, &e)
            })?;
        }
        Ok(())
    }

    pub async fn call_application_bootstrap_with_timeout(&self, timeout: Duration) -> Result<()> {
        within("OnApplicationBootstrap", timeout, self.call_application_bootstrap()).await
    }

    pub async fn call_application_shutdown(&self) {
        tracing::info!(
            hooks = self.on_shutdown_hooks.len(),
            "Running OnApplicationShutdown hooks"
        );

        for hook in &self.on_shutdown_hooks {
            tracing::debug!(service = %hook.name, "on_application_shutdown");
            if let Err(e) = hook.service.on_application_shutdown().await {
                tracing::error!(service = %hook.name, "OnApplicationShutdown failed: {}", e);
            }
        }
    }

    pub async fn call_module_destroy(&self) {
        tracing::info!(
            hooks = self.on_destroy_hooks.len(),
            "Running OnModuleDestroy hooks"
        );

        for hook in self.on_destroy_hooks.iter().rev() {
            tracing::debug!(service = %hook.name, "on_module_destroy");
            if let Err(e) = hook.service.on_module_destroy().await {
                tracing::error!(service = %hook.name, "OnModuleDestroy failed: {}", e);
            }
        }
    }

    pub fn init_hook_count(&self) -> usize {
        self.on_init_hooks.len()
    }

    pub fn bootstrap_hook_count(&self) -> usize {
        self.on_bootstrap_hooks.len()
    }

    pub fn shutdown_hook_count(&self) -> usize {
        self.on_shutdown_hooks.len()
    }

    pub fn destroy_hook_count(&self) -> usize {
        self.on_destroy_hooks.len()
    }
}

async fn within<F>(phase: &'static str, timeout: Duration, phase_future: F) -> Result<()>
where
    F: Future<Output = Result<()>>,
{
    tokio::time::timeout(timeout, phase_future)
        .await
        .map_err(|_| {
            tracing::error!(phase, ?timeout, "Lifecycle phase timed out");
            LifecycleError::Timeout {
                phase,
                after: timeout,
            }
        })?
}
