use crate::di::guard::ResolutionGuard;
use crate::di::provider::{Provider, Recipe};
use crate::di::{
    Arguments, Constructor, DependencyPlan, Injectable, Instance, Lifecycle, ProviderConfig,
    Token, TokenKey,
};
use crate::error::{NestletError, Result};
use dashmap::DashMap;
use once_cell::sync::OnceCell;
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_CONTAINER_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Clone)]
struct Registration {
    token: Token,
    provider: Provider,
}

/// Thread-safe dependency injection container.
///
/// Singletons are cached per container: the same token registered on a
/// parent and on a child yields two distinct instances. A token missing
/// locally is delegated to the parent chain.
pub struct Container {
    id: u64,
    label: String,
    parent: Option<Arc<Container>>,
    providers: DashMap<TokenKey, Registration>,
    singletons: DashMap<TokenKey, Arc<OnceCell<Instance>>>,
    plans: DashMap<TypeId, Arc<DependencyPlan>>,
}

impl Container {
    /// A root container without parent.
    pub fn new() -> Self {
        Self::build("root", None)
    }

    /// A container that delegates unknown tokens to `parent`.
    pub fn child(parent: &Arc<Container>, label: impl Into<String>) -> Self {
        Self::build(label, Some(Arc::clone(parent)))
    }

    fn build(label: impl Into<String>, parent: Option<Arc<Container>>) -> Self {
        Self {
            id: NEXT_CONTAINER_ID.fetch_add(1, Ordering::Relaxed),
            label: label.into(),
            parent,
            providers: DashMap::new(),
            singletons: DashMap::new(),
            plans: DashMap::new(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn parent(&self) -> Option<&Arc<Container>> {
        self.parent.as_ref()
    }

    /// Register `token` with default options.
    ///
    /// A type token created with [`Token::of`] becomes its own implementation.
    pub fn register(&self, token: impl Into<Token>) -> &Self {
        self.register_with(token, ProviderConfig::new())
    }

    /// Register `T` as its own implementation.
    pub fn register_type<T: Injectable>(&self) -> &Self {
        self.register(Token::of::<T>())
    }

    pub fn register_with(&self, token: impl Into<Token>, config: ProviderConfig) -> &Self {
        let token = token.into();
        let provider = config.into_provider(&token);
        tracing::debug!(
            container = %self.label,
            token = %token,
            lifecycle = %provider.lifecycle,
            "Registering provider"
        );
        self.insert(token, provider)
    }

    /// Install a pre-built singleton. No plan is built and nothing is constructed.
    pub fn register_instance<V: Any + Send + Sync>(&self, token: impl Into<Token>, value: V) -> &Self {
        self.register_shared(token, Arc::new(value))
    }

    /// Same as [`Container::register_instance`] for an already shared value.
    pub fn register_shared(&self, token: impl Into<Token>, instance: Instance) -> &Self {
        let token = token.into();
        let key = token.key().clone();
        tracing::debug!(container = %self.label, token = %token, "Registering instance");
        self.insert(token, Provider::value(Arc::clone(&instance)));
        self.singletons
            .insert(key, Arc::new(OnceCell::with_value(instance)));
        self
    }

    /// Register `token` here as an alias resolved inside `source`.
    pub(crate) fn register_export(&self, token: Token, source: &Arc<Container>) -> &Self {
        tracing::debug!(
            container = %self.label,
            source = %source.label,
            token = %token,
            "Bridging export"
        );
        let provider = Provider::export(Arc::clone(source), token.clone());
        self.insert(token, provider)
    }

    fn insert(&self, token: Token, provider: Provider) -> &Self {
        let key = token.key().clone();
        if self
            .providers
            .insert(key.clone(), Registration { token, provider })
            .is_some()
        {
            tracing::warn!(container = %self.label, "Replacing existing provider");
        }
        self.singletons.remove(&key);
        self
    }

    /// Local check only; the parent chain is not consulted.
    pub fn is_registered(&self, token: &Token) -> bool {
        self.providers.contains_key(token.key())
    }

    /// Resolve `T` through its type token.
    pub fn resolve<T: Injectable>(&self) -> Result<Arc<T>> {
        self.get::<T>(Token::of::<T>())
    }

    /// Resolve `token` and downcast the instance to `V`.
    pub fn get<V: Any + Send + Sync>(&self, token: impl Into<Token>) -> Result<Arc<V>> {
        self.resolve_token(&token.into())?
            .downcast::<V>()
            .map_err(|_| NestletError::DowncastFailed {
                type_name: std::any::type_name::<V>(),
            })
    }

    /// Resolve `token` to its type-erased instance.
    ///
    /// # Errors
    /// - [`NestletError::ProviderNotFound`] when neither this container, its
    ///   parents, nor the token's own zero-argument constructor can supply it.
    /// - [`NestletError::CannotInstantiateToken`] when the provider has no
    ///   way to build an instance.
    /// - [`NestletError::CircularDependency`] when resolution re-enters itself.
    pub fn resolve_token(&self, token: &Token) -> Result<Instance> {
        let provider = match self.providers.get(token.key()) {
            Some(registration) => registration.provider.clone(),
            None => return self.resolve_unregistered(token),
        };

        let _guard = ResolutionGuard::enter(self.id, token)?;
        match provider.lifecycle {
            Lifecycle::Transient => self.produce(token, &provider),
            Lifecycle::Singleton => {
                let cell = Arc::clone(
                    self.singletons
                        .entry(token.key().clone())
                        .or_default()
                        .value(),
                );
                cell.get_or_try_init(|| self.produce(token, &provider))
                    .cloned()
            }
        }
    }

    fn resolve_unregistered(&self, token: &Token) -> Result<Instance> {
        if let Some(parent) = &self.parent {
            return parent.resolve_token(token);
        }

        match token.constructor() {
            Some(constructor) if constructor.dependencies().is_empty() => {
                tracing::debug!(token = %token, "Auto-constructing unregistered type");
                self.instantiate(constructor)
            }
            _ => Err(NestletError::ProviderNotFound {
                token: token.to_string(),
            }),
        }
    }

    fn produce(&self, token: &Token, provider: &Provider) -> Result<Instance> {
        match &provider.recipe {
            Recipe::Value(instance) => Ok(Arc::clone(instance)),
            Recipe::Factory(factory) => factory(self),
            Recipe::Class(constructor) => self.instantiate(constructor),
            Recipe::Export(link) => link.source.resolve_token(&link.token),
            Recipe::Unset => Err(NestletError::CannotInstantiateToken {
                token: token.to_string(),
            }),
        }
    }

    /// Build a new instance of `constructor`, resolving each planned
    /// parameter through this container.
    pub fn instantiate(&self, constructor: &Constructor) -> Result<Instance> {
        let plan = self.plan(constructor)?;
        let values = plan
            .slots()
            .iter()
            .map(|slot| self.resolve_token(slot))
            .collect::<Result<Vec<_>>>()?;
        constructor.build(&Arguments::new(constructor.name(), values))
    }

    /// Cached dependency plan of `constructor` for this container.
    pub fn plan(&self, constructor: &Constructor) -> Result<Arc<DependencyPlan>> {
        if let Some(plan) = self.plans.get(&constructor.type_id()) {
            return Ok(Arc::clone(plan.value()));
        }

        let plan = Arc::new(DependencyPlan::build(constructor)?);
        tracing::debug!(
            container = %self.label,
            constructor = constructor.name(),
            slots = plan.len(),
            "Built dependency plan"
        );
        Ok(Arc::clone(
            self.plans
                .entry(constructor.type_id())
                .or_insert(plan)
                .value(),
        ))
    }

    /// Resolve every locally registered singleton, returning how many there were.
    pub fn instantiate_singletons(&self) -> Result<usize> {
        let tokens: Vec<Token> = self
            .providers
            .iter()
            .filter(|entry| entry.provider.lifecycle == Lifecycle::Singleton)
            .map(|entry| entry.token.clone())
            .collect();

        for token in &tokens {
            self.resolve_token(token)?;
        }
        Ok(tokens.len())
    }

    /// Drop every provider, cached singleton and plan.
    pub fn clear(&self) {
        tracing::debug!(container = %self.label, "Clearing container");
        self.providers.clear();
        self.singletons.clear();
        self.plans.clear();
    }

    /// Locally registered tokens.
    pub fn tokens(&self) -> Vec<Token> {
        self.providers
            .iter()
            .map(|entry| entry.token.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("parent", &self.parent.as_ref().map(|p| p.id))
            .field("providers", &self.providers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::di::{DependencyMetadata, Symbol};
    use std::sync::atomic::AtomicUsize;

    struct Logger;

    impl Injectable for Logger {
        fn construct(_: &Arguments) -> Result<Self> {
            Ok(Logger)
        }
    }

    struct Database {
        url: String,
    }

    struct Repo {
        db: Arc<Database>,
    }

    impl Injectable for Repo {
        fn dependencies() -> DependencyMetadata {
            DependencyMetadata::new().typed::<Database>(0)
        }

        fn construct(args: &Arguments) -> Result<Self> {
            Ok(Repo { db: args.get(0)? })
        }
    }

    struct Service {
        db: Arc<Database>,
    }

    impl Injectable for Service {
        fn dependencies() -> DependencyMetadata {
            DependencyMetadata::new().typed::<Database>(0).token(0, "DB_TOKEN")
        }

        fn construct(args: &Arguments) -> Result<Self> {
            Ok(Service { db: args.get(0)? })
        }
    }

    struct Request {
        logger: Arc<Logger>,
    }

    impl Injectable for Request {
        fn dependencies() -> DependencyMetadata {
            DependencyMetadata::new().class::<Logger>(0)
        }

        fn lifecycle() -> Option<Lifecycle> {
            Some(Lifecycle::Transient)
        }

        fn construct(args: &Arguments) -> Result<Self> {
            Ok(Request { logger: args.get(0)? })
        }
    }

    struct Chicken;
    struct Egg;

    impl Injectable for Chicken {
        fn dependencies() -> DependencyMetadata {
            DependencyMetadata::new().class::<Egg>(0)
        }

        fn construct(_: &Arguments) -> Result<Self> {
            Ok(Chicken)
        }
    }

    impl Injectable for Egg {
        fn dependencies() -> DependencyMetadata {
            DependencyMetadata::new().class::<Chicken>(0)
        }

        fn construct(_: &Arguments) -> Result<Self> {
            Ok(Egg)
        }
    }

    struct Broken;

    impl Injectable for Broken {
        fn dependencies() -> DependencyMetadata {
            DependencyMetadata::new().token(1, "SECOND")
        }

        fn construct(_: &Arguments) -> Result<Self> {
            Ok(Broken)
        }
    }

    #[test]
    fn test_singleton_is_cached_until_clear() {
        let container = Container::new();
        container.register_type::<Logger>();

        let first = container.resolve::<Logger>().unwrap();
        let second = container.resolve::<Logger>().unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        container.clear();
        let third = container.resolve::<Logger>().unwrap();
        assert!(!Arc::ptr_eq(&first, &third));
    }

    #[test]
    fn test_transient_rebuilds_instance_with_same_wiring() {
        let container = Container::new();
        container.register_type::<Logger>().register_type::<Request>();

        let a = container.resolve::<Request>().unwrap();
        let b = container.resolve::<Request>().unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
        assert!(Arc::ptr_eq(&a.logger, &b.logger));
    }

    #[test]
    fn test_transient_reuses_plan() {
        let container = Container::new();
        container.register_type::<Logger>().register_type::<Request>();

        container.resolve::<Request>().unwrap();
        let before = container.plan(&Constructor::of::<Request>()).unwrap();
        container.resolve::<Request>().unwrap();
        let after = container.plan(&Constructor::of::<Request>()).unwrap();
        assert!(Arc::ptr_eq(&before, &after));
    }

    #[test]
    fn test_registered_instance_is_injected() {
        let container = Container::new();
        let db = Arc::new(Database {
            url: "postgres://localhost".into(),
        });
        container
            .register_shared(Token::of_type::<Database>(), db.clone())
            .register_type::<Repo>();

        let repo = container.resolve::<Repo>().unwrap();
        assert!(Arc::ptr_eq(&repo.db, &db));
        assert_eq!(repo.db.url, "postgres://localhost");
    }

    #[test]
    fn test_explicit_token_is_injected() {
        let container = Container::new();
        let fake = Arc::new(Database { url: "fake".into() });
        container
            .register_shared("DB_TOKEN", fake.clone())
            .register_type::<Service>();

        let service = container.resolve::<Service>().unwrap();
        assert!(Arc::ptr_eq(&service.db, &fake));
    }

    #[test]
    fn test_child_delegates_to_parent_singleton() {
        let parent = Arc::new(Container::new());
        parent.register_type::<Logger>();
        let child = Container::child(&parent, "child");

        let from_child = child.resolve::<Logger>().unwrap();
        let from_parent = parent.resolve::<Logger>().unwrap();
        assert!(Arc::ptr_eq(&from_child, &from_parent));
        assert!(!child.is_registered(&Token::of::<Logger>()));
    }

    #[test]
    fn test_singletons_are_per_container() {
        let parent = Arc::new(Container::new());
        parent.register_type::<Logger>();
        let child = Container::child(&parent, "child");
        child.register_type::<Logger>();

        let from_child = child.resolve::<Logger>().unwrap();
        let from_parent = parent.resolve::<Logger>().unwrap();
        assert!(!Arc::ptr_eq(&from_child, &from_parent));
    }

    #[test]
    fn test_zero_arg_type_is_auto_constructed_at_root() {
        let container = Container::new();
        assert!(container.resolve::<Logger>().is_ok());
    }

    #[test]
    fn test_missing_provider() {
        let container = Container::new();
        let err = container.get::<Database>("MISSING").err().unwrap();
        assert!(matches!(err, NestletError::ProviderNotFound { token } if token == "MISSING"));

        // types with dependencies are never auto-constructed
        assert!(matches!(
            container.resolve::<Repo>(),
            Err(NestletError::ProviderNotFound { .. })
        ));
    }

    #[test]
    fn test_token_without_recipe_cannot_be_instantiated() {
        let container = Container::new();
        container.register("CONFIG");
        assert!(matches!(
            container.resolve_token(&Token::from("CONFIG")),
            Err(NestletError::CannotInstantiateToken { .. })
        ));
    }

    #[test]
    fn test_unresolvable_parameter_fails_at_plan_time() {
        let container = Container::new();
        container.register_type::<Broken>();
        container.register_instance("SECOND", 2u32);

        let err = container.resolve::<Broken>().err().unwrap();
        assert!(matches!(err, NestletError::UnresolvableDependency { index: 0, .. }));
    }

    #[test]
    fn test_factory_sees_registering_container() {
        let container = Container::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        container
            .register_instance("URL", String::from("sqlite::memory:"))
            .register_with(
                Token::of_type::<Database>(),
                ProviderConfig::new().use_factory(move |c| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    let url = c.get::<String>("URL")?;
                    Ok(Database { url: (*url).clone() })
                }),
            );

        let db = container.get::<Database>(Token::of_type::<Database>()).unwrap();
        container.get::<Database>(Token::of_type::<Database>()).unwrap();
        assert_eq!(db.url, "sqlite::memory:");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_symbol_tokens() {
        let container = Container::new();
        let clock = Symbol::new("CLOCK");
        container.register_instance(&clock, 42u64);
        assert_eq!(*container.get::<u64>(&clock).unwrap(), 42);
        assert!(container.get::<u64>(Symbol::new("CLOCK")).is_err());
    }

    #[test]
    fn test_downcast_mismatch() {
        let container = Container::new();
        container.register_instance("PORT", 8080u16);
        assert!(matches!(
            container.get::<u32>("PORT"),
            Err(NestletError::DowncastFailed { .. })
        ));
    }

    #[test]
    fn test_provider_cycle_is_reported() {
        let container = Container::new();
        container.register_type::<Chicken>().register_type::<Egg>();

        let err = container.resolve::<Chicken>().err().unwrap();
        match err {
            NestletError::CircularDependency { cycle } => {
                assert!(cycle.contains("Chicken -> "));
                assert!(cycle.ends_with("Chicken"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_reregistration_drops_cached_singleton() {
        let container = Container::new();
        container.register_instance("VALUE", 1u8);
        assert_eq!(*container.get::<u8>("VALUE").unwrap(), 1);
        container.register_instance("VALUE", 2u8);
        assert_eq!(*container.get::<u8>("VALUE").unwrap(), 2);
    }

    #[test]
    fn test_instantiate_singletons() {
        let container = Container::new();
        container
            .register_type::<Logger>()
            .register_type::<Request>()
            .register_instance("PORT", 1u16);
        assert_eq!(container.instantiate_singletons().unwrap(), 2);
    }

    #[test]
    fn test_concurrent_first_resolution_constructs_once() {
        static BUILT: AtomicUsize = AtomicUsize::new(0);

        struct Slow;

        impl Injectable for Slow {
            fn construct(_: &Arguments) -> Result<Self> {
                BUILT.fetch_add(1, Ordering::SeqCst);
                std::thread::sleep(std::time::Duration::from_millis(20));
                Ok(Slow)
            }
        }

        let container = Arc::new(Container::new());
        container.register_type::<Slow>();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let container = Arc::clone(&container);
                std::thread::spawn(move || container.resolve::<Slow>().unwrap())
            })
            .collect();
        let instances: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(BUILT.load(Ordering::SeqCst), 1);
        assert!(instances.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }
}
