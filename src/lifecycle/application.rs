//! Application bootstrap.
//!
//! Building an application runs, in order: root providers, module graph
//! resolution, extensions, eager singleton instantiation, then the
//! `OnModuleInit` and `OnApplicationBootstrap` hooks.

use super::{
    LifecycleManager, OnApplicationBootstrap, OnApplicationShutdown, OnModuleDestroy,
    OnModuleInit, ShutdownHandler,
};
use crate::config::ConfigService;
use crate::context::ApplicationContext;
use crate::controller::ControllerRegistry;
use crate::di::{Container, Injectable};
use crate::error::Result;
use crate::middleware::MiddlewareLayer;
use crate::module::{ApplicationExtension, Module, ModuleDef, ModuleKey, ProviderDef};
use std::sync::Arc;
use std::time::Duration;

pub const INIT_TIMEOUT_KEY: &str = "NESTLET_INIT_TIMEOUT_SECS";
pub const BOOTSTRAP_TIMEOUT_KEY: &str = "NESTLET_BOOTSTRAP_TIMEOUT_SECS";
pub const EAGER_SINGLETONS_KEY: &str = "NESTLET_EAGER_SINGLETONS";

type HookBinder = Box<dyn FnOnce(&ApplicationContext, &mut LifecycleManager) -> Result<()> + Send>;

/// A bootstrapped application.
///
/// # Example
///
/// ```rust,no_run
/// use nestlet::{Application, Module, ModuleDescriptor};
///
/// struct AppModule;
///
/// impl Module for AppModule {
///     fn descriptor() -> ModuleDescriptor {
///         ModuleDescriptor::new()
///     }
/// }
///
/// #[tokio::main]
/// async fn main() -> nestlet::Result<()> {
///     let app = Application::builder()
///         .module::<AppModule>()
///         .build()
///         .await?;
///
///     let shutdown = app.spawn_shutdown_handler();
///     // serve requests...
///     let _ = shutdown.await;
///     Ok(())
/// }
/// ```
pub struct Application {
    context: Arc<ApplicationContext>,
    lifecycle_manager: Arc<LifecycleManager>,
}

impl Application {
    pub fn builder() -> ApplicationBuilder {
        ApplicationBuilder::new()
    }

    pub fn context(&self) -> &Arc<ApplicationContext> {
        &self.context
    }

    /// The root container.
    pub fn container(&self) -> &Arc<Container> {
        self.context.root()
    }

    /// Container of module `M`; the usual router state for that module.
    pub fn container_of<M: 'static>(&self) -> Option<Arc<Container>> {
        self.context.container_of::<M>().cloned()
    }

    pub fn resolve<T: Injectable>(&self) -> Result<Arc<T>> {
        self.context.find::<T>()
    }

    pub fn controllers(&self) -> &ControllerRegistry {
        self.context.controllers()
    }

    /// Tower layer running `module`'s flattened middlewares.
    pub fn middleware_layer(&self, module: &ModuleDef) -> MiddlewareLayer {
        self.middleware_layer_for_key(module.key())
    }

    pub fn middleware_layer_of<M: 'static>(&self) -> MiddlewareLayer {
        self.middleware_layer_for_key(ModuleKey::of::<M>())
    }

    fn middleware_layer_for_key(&self, key: ModuleKey) -> MiddlewareLayer {
        MiddlewareLayer::new(self.context.modules().module_middlewares(key).to_vec())
    }

    pub fn lifecycle_manager(&self) -> &Arc<LifecycleManager> {
        &self.lifecycle_manager
    }

    pub fn shutdown_handler(&self) -> ShutdownHandler {
        ShutdownHandler::new(Arc::clone(&self.lifecycle_manager))
    }

    /// Run the shutdown hooks, then the destroy hooks in reverse order.
    pub async fn shutdown(&self) {
        tracing::info!("Shutting down application");
        self.lifecycle_manager.call_application_shutdown().await;
        self.lifecycle_manager.call_module_destroy().await;
        tracing::info!("Application shutdown complete");
    }

    /// Spawn a task that shuts the application down on Ctrl+C or SIGTERM.
    pub fn spawn_shutdown_handler(&self) -> tokio::task::JoinHandle<()> {
        let shutdown_handler = self.shutdown_handler();
        tokio::spawn(async move {
            shutdown_handler.wait_for_shutdown().await;
        })
    }
}

pub struct ApplicationBuilder {
    modules: Vec<ModuleDef>,
    providers: Vec<ProviderDef>,
    extensions: Vec<Arc<dyn ApplicationExtension>>,
    hooks: Vec<HookBinder>,
    init_timeout: Option<Duration>,
    bootstrap_timeout: Option<Duration>,
    eager_singletons: bool,
}

impl Default for ApplicationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplicationBuilder {
    pub fn new() -> Self {
        Self {
            modules: Vec::new(),
            providers: Vec::new(),
            extensions: Vec::new(),
            hooks: Vec::new(),
            init_timeout: None,
            bootstrap_timeout: None,
            eager_singletons: true,
        }
    }

    pub fn module<M: Module>(self) -> Self {
        self.module_def(ModuleDef::of::<M>())
    }

    pub fn module_def(mut self, module: ModuleDef) -> Self {
        self.modules.push(module);
        self
    }

    /// A provider registered directly on the root container.
    pub fn provider(mut self, provider: ProviderDef) -> Self {
        self.providers.push(provider);
        self
    }

    /// An extension run before those declared by modules.
    pub fn extension(mut self, extension: impl ApplicationExtension) -> Self {
        self.extensions.push(Arc::new(extension));
        self
    }

    pub fn init_timeout(mut self, timeout: Duration) -> Self {
        self.init_timeout = Some(timeout);
        self
    }

    pub fn bootstrap_timeout(mut self, timeout: Duration) -> Self {
        self.bootstrap_timeout = Some(timeout);
        self
    }

    /// Resolve every singleton before the lifecycle hooks run. On by default.
    pub fn eager_singletons(mut self, eager: bool) -> Self {
        self.eager_singletons = eager;
        self
    }

    /// Apply the builder settings found in `config`; missing keys leave the
    /// current values untouched.
    pub fn configure(mut self, config: &ConfigService) -> Self {
        if let Some(secs) = config.get_parsed::<u64>(INIT_TIMEOUT_KEY) {
            self.init_timeout = Some(Duration::from_secs(secs));
        }
        if let Some(secs) = config.get_parsed::<u64>(BOOTSTRAP_TIMEOUT_KEY) {
            self.bootstrap_timeout = Some(Duration::from_secs(secs));
        }
        if let Some(eager) = config.get_parsed::<bool>(EAGER_SINGLETONS_KEY) {
            self.eager_singletons = eager;
        }
        self
    }

    /// Call `T::on_module_init` during bootstrap, resolving `T` from the
    /// application context.
    pub fn on_init<T>(mut self) -> Self
    where
        T: Injectable + OnModuleInit,
    {
        self.hooks.push(Box::new(
            |context: &ApplicationContext, manager: &mut LifecycleManager| -> Result<()> {
                manager.register_init(context.find::<T>()?, std::any::type_name::<T>());
                Ok(())
            },
        ));
        self
    }

    pub fn on_bootstrap<T>(mut self) -> Self
    where
        T: Injectable + OnApplicationBootstrap,
    {
        self.hooks.push(Box::new(
            |context: &ApplicationContext, manager: &mut LifecycleManager| -> Result<()> {
                manager.register_bootstrap(context.find::<T>()?, std::any::type_name::<T>());
                Ok(())
            },
        ));
        self
    }

    pub fn on_shutdown<T>(mut self) -> Self
    where
        T: Injectable + OnApplicationShutdown,
    {
        self.hooks.push(Box::new(
            |context: &ApplicationContext, manager: &mut LifecycleManager| -> Result<()> {
                manager.register_shutdown(context.find::<T>()?, std::any::type_name::<T>());
                Ok(())
            },
        ));
        self
    }

    pub fn on_destroy<T>(mut self) -> Self
    where
        T: Injectable + OnModuleDestroy,
    {
        self.hooks.push(Box::new(
            |context: &ApplicationContext, manager: &mut LifecycleManager| -> Result<()> {
                manager.register_destroy(context.find::<T>()?, std::any::type_name::<T>());
                Ok(())
            },
        ));
        self
    }

    /// Shorthand for [`Self::on_init`] plus [`Self::on_destroy`].
    pub fn register_lifecycle<T>(self) -> Self
    where
        T: Injectable + OnModuleInit + OnModuleDestroy,
    {
        self.on_init::<T>().on_destroy::<T>()
    }

    /// Build and initialize the application.
    ///
    /// # Errors
    ///
    /// Module graph errors, extension failures, singleton construction
    /// failures and failing or timed-out init/bootstrap hooks.
    pub async fn build(self) -> Result<Application> {
        tracing::info!(modules = self.modules.len(), "Bootstrapping application");

        let mut context = ApplicationContext::new();
        for provider in &self.providers {
            provider.register_into(context.root());
        }
        for module in &self.modules {
            context.register_module(module)?;
        }

        let extensions = context.run_extensions(&self.extensions, &self.modules)?;
        tracing::info!(extensions, "Extensions registered");

        if self.eager_singletons {
            context.instantiate_singletons()?;
        }

        let mut lifecycle_manager = LifecycleManager::new();
        for bind in self.hooks {
            bind(&context, &mut lifecycle_manager)?;
        }

        match self.init_timeout {
            Some(timeout) => {
                lifecycle_manager
                    .call_module_init_with_timeout(timeout)
                    .await?
            }
            None => lifecycle_manager.call_module_init().await?,
        }

        match self.bootstrap_timeout {
            Some(timeout) => {
                lifecycle_manager
                    .call_application_bootstrap_with_timeout(timeout)
                    .await?
            }
            None => lifecycle_manager.call_application_bootstrap().await?,
        }

        tracing::info!(
            modules = context.modules().len(),
            controllers = context.controllers().len(),
            "Application initialization complete"
        );

        Ok(Application {
            context: Arc::new(context),
            lifecycle_manager: Arc::new(lifecycle_manager),
        })
    }
}
