use crate::di::{Constructor, Container, Injectable, Instance, ProviderConfig, Token};
use crate::error::Result;
use crate::middleware::Middleware;
use crate::module::ApplicationExtension;
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// Trait for application modules
///
/// Modules are typically defined using the `#[module]` macro, which
/// implements this trait from the attribute's lists.
///
/// # Example
/// ```
/// use nestlet::{Arguments, Injectable, Module, ModuleDescriptor, Result};
///
/// struct UserService;
///
/// impl Injectable for UserService {
///     fn construct(_: &Arguments) -> Result<Self> {
///         Ok(UserService)
///     }
/// }
///
/// struct UserModule;
///
/// impl Module for UserModule {
///     fn descriptor() -> ModuleDescriptor {
///         ModuleDescriptor::new()
///             .provider::<UserService>()
///             .export_type::<UserService>()
///     }
/// }
/// ```
pub trait Module: 'static {
    /// Build the module's declaration. Must be free of side effects: the
    /// resolver calls it once per application.
    fn descriptor() -> ModuleDescriptor;
}

/// Identity of a module inside one module graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModuleKey(TypeId);

impl ModuleKey {
    pub fn of<M: 'static>() -> Self {
        Self(TypeId::of::<M>())
    }
}

type DescriptorFn = Arc<dyn Fn() -> ModuleDescriptor + Send + Sync>;

/// Reference to a module as written in an import list.
///
/// The descriptor is built lazily, so modules importing each other can be
/// declared (and then rejected as a cycle) without infinite recursion.
#[derive(Clone)]
pub struct ModuleDef {
    key: ModuleKey,
    name: &'static str,
    build: DescriptorFn,
}

impl ModuleDef {
    pub fn of<M: Module>() -> Self {
        Self {
            key: ModuleKey::of::<M>(),
            name: std::any::type_name::<M>(),
            build: Arc::new(M::descriptor),
        }
    }

    /// A module whose descriptor depends on options, keyed by `M`.
    ///
    /// # Example
    /// ```
    /// use nestlet::{ModuleDef, ModuleDescriptor};
    ///
    /// struct CacheModule;
    ///
    /// impl CacheModule {
    ///     fn for_root(ttl_secs: u64) -> ModuleDef {
    ///         ModuleDef::configured::<CacheModule, _>(move || {
    ///             ModuleDescriptor::new()
    ///                 .value("CACHE_TTL", ttl_secs)
    ///                 .export("CACHE_TTL")
    ///         })
    ///     }
    /// }
    ///
    /// let def = CacheModule::for_root(60);
    /// assert_eq!(def.descriptor().exports().len(), 1);
    /// ```
    pub fn configured<M, F>(build: F) -> Self
    where
        M: 'static,
        F: Fn() -> ModuleDescriptor + Send + Sync + 'static,
    {
        Self {
            key: ModuleKey::of::<M>(),
            name: std::any::type_name::<M>(),
            build: Arc::new(build),
        }
    }

    pub fn key(&self) -> ModuleKey {
        self.key
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn descriptor(&self) -> ModuleDescriptor {
        (self.build)()
    }
}

impl fmt::Debug for ModuleDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ModuleDef").field(&self.name).finish()
    }
}

#[derive(Clone)]
enum ProviderSource {
    Config(ProviderConfig),
    Value(Instance),
}

/// A provider as declared by a module: class, value, or factory form.
#[derive(Clone)]
pub struct ProviderDef {
    token: Token,
    source: ProviderSource,
}

impl ProviderDef {
    /// `T` implemented by itself.
    pub fn class<T: Injectable>() -> Self {
        Self::new(Token::of::<T>(), ProviderConfig::new())
    }

    pub fn new(token: impl Into<Token>, config: ProviderConfig) -> Self {
        Self {
            token: token.into(),
            source: ProviderSource::Config(config),
        }
    }

    pub fn value<V: Any + Send + Sync>(token: impl Into<Token>, value: V) -> Self {
        Self {
            token: token.into(),
            source: ProviderSource::Value(Arc::new(value)),
        }
    }

    pub fn factory<V, F>(token: impl Into<Token>, factory: F) -> Self
    where
        V: Any + Send + Sync,
        F: Fn(&Container) -> Result<V> + Send + Sync + 'static,
    {
        Self::new(token, ProviderConfig::new().use_factory(factory))
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    pub fn register_into(&self, container: &Container) {
        match &self.source {
            ProviderSource::Config(config) => {
                container.register_with(self.token.clone(), config.clone());
            }
            ProviderSource::Value(instance) => {
                container.register_shared(self.token.clone(), Arc::clone(instance));
            }
        }
    }
}

impl fmt::Debug for ProviderDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let form = match &self.source {
            ProviderSource::Config(_) => "config",
            ProviderSource::Value(_) => "value",
        };
        f.debug_struct("ProviderDef")
            .field("token", &self.token)
            .field("form", &form)
            .finish()
    }
}

/// Immutable declaration of a module.
#[derive(Clone, Default)]
pub struct ModuleDescriptor {
    imports: Vec<ModuleDef>,
    providers: Vec<ProviderDef>,
    controllers: Vec<Constructor>,
    exports: Vec<Token>,
    extensions: Vec<Arc<dyn ApplicationExtension>>,
    middlewares: Vec<Arc<dyn Middleware>>,
}

impl ModuleDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn import<M: Module>(self) -> Self {
        self.import_def(ModuleDef::of::<M>())
    }

    pub fn import_def(mut self, module: ModuleDef) -> Self {
        self.imports.push(module);
        self
    }

    pub fn provider<T: Injectable>(self) -> Self {
        self.provide(ProviderDef::class::<T>())
    }

    pub fn provide(mut self, provider: ProviderDef) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn value<V: Any + Send + Sync>(self, token: impl Into<Token>, value: V) -> Self {
        self.provide(ProviderDef::value(token, value))
    }

    pub fn factory<V, F>(self, token: impl Into<Token>, factory: F) -> Self
    where
        V: Any + Send + Sync,
        F: Fn(&Container) -> Result<V> + Send + Sync + 'static,
    {
        self.provide(ProviderDef::factory(token, factory))
    }

    pub fn controller<C: Injectable>(mut self) -> Self {
        self.controllers.push(Constructor::of::<C>());
        self
    }

    pub fn export(mut self, token: impl Into<Token>) -> Self {
        self.exports.push(token.into());
        self
    }

    pub fn export_type<T: ?Sized + 'static>(self) -> Self {
        self.export(Token::of_type::<T>())
    }

    pub fn extension(self, extension: impl ApplicationExtension) -> Self {
        self.extension_shared(Arc::new(extension))
    }

    pub fn extension_shared(mut self, extension: Arc<dyn ApplicationExtension>) -> Self {
        self.extensions.push(extension);
        self
    }

    pub fn middleware(self, middleware: impl Middleware) -> Self {
        self.middleware_shared(Arc::new(middleware))
    }

    pub fn middleware_shared(mut self, middleware: Arc<dyn Middleware>) -> Self {
        self.middlewares.push(middleware);
        self
    }

    pub fn imports(&self) -> &[ModuleDef] {
        &self.imports
    }

    pub fn providers(&self) -> &[ProviderDef] {
        &self.providers
    }

    pub fn controllers(&self) -> &[Constructor] {
        &self.controllers
    }

    pub fn exports(&self) -> &[Token] {
        &self.exports
    }

    pub fn extensions(&self) -> &[Arc<dyn ApplicationExtension>] {
        &self.extensions
    }

    pub fn middlewares(&self) -> &[Arc<dyn Middleware>] {
        &self.middlewares
    }
}

impl fmt::Debug for ModuleDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleDescriptor")
            .field("imports", &self.imports)
            .field("providers", &self.providers)
            .field("controllers", &self.controllers)
            .field("exports", &self.exports)
            .field("extensions", &self.extensions.len())
            .field("middlewares", &self.middlewares.len())
            .finish()
    }
}
