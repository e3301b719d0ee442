//! Test harness for nestlet modules.
//!
//! Compiles one module graph into its own [`ApplicationContext`], with
//! selected providers swapped for test doubles.
//!
//! ```
//! use nestlet::{Module, ModuleDescriptor};
//! use nestlet_testing::TestingModule;
//!
//! struct Clock(u64);
//!
//! struct ClockModule;
//!
//! impl Module for ClockModule {
//!     fn descriptor() -> ModuleDescriptor {
//!         ModuleDescriptor::new().factory("CLOCK", |_| Ok(Clock(0)))
//!     }
//! }
//!
//! let module = TestingModule::create::<ClockModule>()
//!     .override_value("CLOCK", Clock(1_700_000_000))
//!     .compile()
//!     .unwrap();
//! assert_eq!(module.get_token::<Clock>("CLOCK").unwrap().0, 1_700_000_000);
//! ```

use nestlet::middleware::MiddlewareLayer;
use nestlet::{
    ApplicationContext, ApplicationExtension, Container, ControllerRegistry, Injectable, Instance,
    Module, ModuleDef, ProviderConfig, ProviderDef, Result, Token,
};
use std::any::Any;
use std::sync::Arc;

/// Install a `tracing` subscriber writing through the test harness.
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

pub struct TestingModuleBuilder {
    module: ModuleDef,
    overrides: Vec<ProviderDef>,
    providers: Vec<ProviderDef>,
    extensions: Vec<Arc<dyn ApplicationExtension>>,
    eager_singletons: bool,
}

impl TestingModuleBuilder {
    fn new(module: ModuleDef) -> Self {
        Self {
            module,
            overrides: Vec::new(),
            providers: Vec::new(),
            extensions: Vec::new(),
            eager_singletons: false,
        }
    }

    /// Replace the provider registered under `token`, wherever it is declared.
    pub fn override_provider(mut self, provider: ProviderDef) -> Self {
        self.overrides.push(provider);
        self
    }

    pub fn override_value<V: Any + Send + Sync>(self, token: impl Into<Token>, value: V) -> Self {
        self.override_provider(ProviderDef::value(token, value))
    }

    pub fn override_factory<V, F>(self, token: impl Into<Token>, factory: F) -> Self
    where
        V: Any + Send + Sync,
        F: Fn(&Container) -> Result<V> + Send + Sync + 'static,
    {
        self.override_provider(ProviderDef::factory(token, factory))
    }

    /// Replace `T` with `R`, built through the container like any class.
    pub fn override_class<T: Injectable, R: Injectable>(self) -> Self {
        self.override_provider(ProviderDef::new(
            Token::of::<T>(),
            ProviderConfig::new().use_class::<R>(),
        ))
    }

    /// A provider on the root container, visible to every module.
    pub fn provide(mut self, provider: ProviderDef) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn extension(mut self, extension: impl ApplicationExtension) -> Self {
        self.extensions.push(Arc::new(extension));
        self
    }

    /// Resolve every singleton while compiling. Off by default so tests only
    /// build what they ask for.
    pub fn eager_singletons(mut self, eager: bool) -> Self {
        self.eager_singletons = eager;
        self
    }

    pub fn compile(self) -> Result<TestingModule> {
        let mut context = ApplicationContext::new();

        for provider in &self.providers {
            self.overrides
                .iter()
                .find(|candidate| candidate.token() == provider.token())
                .unwrap_or(provider)
                .register_into(context.root());
        }
        for provider in &self.overrides {
            context.modules_mut().override_provider(provider.clone());
        }

        context.register_module(&self.module)?;
        context.run_extensions(&self.extensions, std::slice::from_ref(&self.module))?;
        if self.eager_singletons {
            context.instantiate_singletons()?;
        }

        let container = context
            .modules()
            .container_of(self.module.key())
            .cloned()
            .unwrap_or_else(|| Arc::clone(context.root()));

        tracing::debug!(module = self.module.name(), "Compiled testing module");
        Ok(TestingModule {
            context,
            module: self.module,
            container,
        })
    }
}

/// A compiled module graph under test.
pub struct TestingModule {
    context: ApplicationContext,
    module: ModuleDef,
    container: Arc<Container>,
}

impl TestingModule {
    pub fn builder(module: ModuleDef) -> TestingModuleBuilder {
        TestingModuleBuilder::new(module)
    }

    pub fn create<M: Module>() -> TestingModuleBuilder {
        Self::builder(ModuleDef::of::<M>())
    }

    /// Resolve `T` as the module under test sees it, falling back to any
    /// module that registers it.
    pub fn get<T: Injectable>(&self) -> Result<Arc<T>> {
        self.get_token::<T>(Token::of::<T>())
    }

    pub fn get_token<V: Any + Send + Sync>(&self, token: impl Into<Token>) -> Result<Arc<V>> {
        let token = token.into();
        if self.container.is_registered(&token) {
            return self.container.get::<V>(token);
        }
        self.context.find_as::<V>(token)
    }

    pub fn resolve_token(&self, token: &Token) -> Result<Instance> {
        if self.container.is_registered(token) {
            return self.container.resolve_token(token);
        }
        self.context.find_token(token)
    }

    /// Container of the module under test.
    pub fn container(&self) -> &Arc<Container> {
        &self.container
    }

    pub fn container_of<M: 'static>(&self) -> Option<&Arc<Container>> {
        self.context.container_of::<M>()
    }

    pub fn context(&self) -> &ApplicationContext {
        &self.context
    }

    pub fn controllers(&self) -> &ControllerRegistry {
        self.context.controllers()
    }

    pub fn middleware_layer(&self) -> MiddlewareLayer {
        MiddlewareLayer::new(
            self.context
                .modules()
                .module_middlewares(self.module.key())
                .to_vec(),
        )
    }
}
