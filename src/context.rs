use crate::controller::ControllerRegistry;
use crate::di::{Container, Injectable, Instance, Token};
use crate::error::{NestletError, Result};
use crate::module::{ApplicationExtension, Module, ModuleDef, ModuleGraphResolver, ModuleKey};
use std::any::Any;
use std::sync::Arc;

/// Everything one application owns: the root container, the module graph
/// and the controllers it registered.
///
/// Two contexts never share state, so several applications (or tests) can
/// live in one process.
pub struct ApplicationContext {
    root: Arc<Container>,
    modules: ModuleGraphResolver,
    controllers: ControllerRegistry,
}

impl ApplicationContext {
    pub fn new() -> Self {
        Self::with_root(Arc::new(Container::new()))
    }

    pub fn with_root(root: Arc<Container>) -> Self {
        Self {
            root,
            modules: ModuleGraphResolver::new(),
            controllers: ControllerRegistry::new(),
        }
    }

    pub fn root(&self) -> &Arc<Container> {
        &self.root
    }

    pub fn modules(&self) -> &ModuleGraphResolver {
        &self.modules
    }

    pub fn modules_mut(&mut self) -> &mut ModuleGraphResolver {
        &mut self.modules
    }

    pub fn controllers(&self) -> &ControllerRegistry {
        &self.controllers
    }

    /// Attach `module` (and everything it imports) to the root container.
    pub fn register_module(&mut self, module: &ModuleDef) -> Result<()> {
        let root = Arc::clone(&self.root);
        self.modules
            .register(module, &root, &mut self.controllers)
    }

    pub fn register_module_type<M: Module>(&mut self) -> Result<()> {
        self.register_module(&ModuleDef::of::<M>())
    }

    pub fn container_of<M: 'static>(&self) -> Option<&Arc<Container>> {
        self.modules.container_of(ModuleKey::of::<M>())
    }

    /// Resolve `T` wherever it is registered.
    pub fn find<T: Injectable>(&self) -> Result<Arc<T>> {
        self.find_as::<T>(Token::of::<T>())
    }

    /// Resolve `token` and downcast it to `V`.
    pub fn find_as<V: Any + Send + Sync>(&self, token: impl Into<Token>) -> Result<Arc<V>> {
        self.find_token(&token.into())?
            .downcast::<V>()
            .map_err(|_| NestletError::DowncastFailed {
                type_name: std::any::type_name::<V>(),
            })
    }

    /// Lookup order: the root container, then the first module container
    /// registering `token` locally, then the root again so unregistered
    /// zero-dependency types are auto-constructed.
    pub fn find_token(&self, token: &Token) -> Result<Instance> {
        if self.root.is_registered(token) {
            return self.root.resolve_token(token);
        }
        let mut owners = self.modules.owners_of(token);
        match owners.next() {
            Some(owner) => {
                let others: Vec<&str> = owners.map(|other| other.name()).collect();
                if !others.is_empty() {
                    tracing::warn!(
                        token = %token,
                        chosen = owner.name(),
                        ?others,
                        "Token registered by several modules, using the first"
                    );
                }
                owner.container().resolve_token(token)
            }
            None => self.root.resolve_token(token),
        }
    }

    /// Run each distinct extension once against the root container: the
    /// `extra` ones first, then the flattened extensions of each module.
    /// Returns how many ran.
    pub fn run_extensions(
        &self,
        extra: &[Arc<dyn ApplicationExtension>],
        modules: &[ModuleDef],
    ) -> Result<usize> {
        let mut seen: Vec<Arc<dyn ApplicationExtension>> = Vec::new();
        let declared = modules
            .iter()
            .flat_map(|module| self.modules.module_extensions(module.key()).iter());

        for extension in extra.iter().chain(declared) {
            if seen.iter().any(|done| Arc::ptr_eq(done, extension)) {
                continue;
            }
            tracing::debug!(extension = extension.name(), "Running extension");
            extension.register(&self.root)?;
            seen.push(Arc::clone(extension));
        }
        Ok(seen.len())
    }

    /// Eagerly resolve every singleton in the root and module containers.
    pub fn instantiate_singletons(&self) -> Result<usize> {
        let mut count = self.root.instantiate_singletons()?;
        for module in self.modules.modules() {
            count += module.container().instantiate_singletons()?;
        }
        tracing::debug!(count, "Instantiated singletons");
        Ok(count)
    }

    /// Drop every module, controller and root provider.
    pub fn clear(&mut self) {
        self.modules.clear();
        self.controllers.clear();
        self.root.clear();
    }
}

impl Default for ApplicationContext {
    fn default() -> Self {
        Self::new()
    }
}
