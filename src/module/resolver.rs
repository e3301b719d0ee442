use crate::controller::{ControllerEntry, ControllerRegistry};
use crate::di::{Container, Token, TokenKey};
use crate::error::{NestletError, Result};
use crate::middleware::Middleware;
use crate::module::{ApplicationExtension, ModuleDef, ModuleDescriptor, ModuleKey, ProviderDef};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Runtime record of one module in the graph.
pub struct ModuleRef {
    def: ModuleDef,
    descriptor: ModuleDescriptor,
    container: Arc<Container>,
    controllers_registered: bool,
    imports_resolved: bool,
    attached_parents: HashSet<u64>,
    extensions: Vec<Arc<dyn ApplicationExtension>>,
    middlewares: Vec<Arc<dyn Middleware>>,
}

impl ModuleRef {
    pub fn name(&self) -> &'static str {
        self.def.name()
    }

    pub fn key(&self) -> ModuleKey {
        self.def.key()
    }

    pub fn descriptor(&self) -> &ModuleDescriptor {
        &self.descriptor
    }

    pub fn container(&self) -> &Arc<Container> {
        &self.container
    }

    /// Own extensions first, then those of each import in import order.
    pub fn extensions(&self) -> &[Arc<dyn ApplicationExtension>] {
        &self.extensions
    }

    /// Own middlewares first, then those of each import in import order.
    pub fn middlewares(&self) -> &[Arc<dyn Middleware>] {
        &self.middlewares
    }

    pub fn is_attached_to(&self, container: &Container) -> bool {
        self.attached_parents.contains(&container.id())
    }

    fn register_controllers(&mut self, registry: &mut ControllerRegistry) {
        if self.controllers_registered {
            return;
        }
        for constructor in self.descriptor.controllers() {
            // a declared provider or override for the same token wins
            if !self.container.is_registered(&Token::from(*constructor)) {
                self.container.register(*constructor);
            }
            registry.add(ControllerEntry::new(
                *constructor,
                self.def.name(),
                Arc::clone(&self.container),
            ));
        }
        self.controllers_registered = true;
    }

    fn attach(&mut self, parent: &Arc<Container>, imported: Imported) -> Result<()> {
        if self.is_attached_to(parent) {
            return Ok(());
        }

        for token in self.descriptor.exports() {
            if !self.container.is_registered(token) {
                return Err(NestletError::InvalidExport {
                    module: self.def.name().to_string(),
                    token: token.to_string(),
                });
            }
        }

        for token in self.descriptor.exports() {
            if parent.is_registered(token) {
                continue;
            }
            parent.register_export(token.clone(), &self.container);
        }

        merge_unique(&mut self.extensions, imported.extensions);
        merge_unique(&mut self.middlewares, imported.middlewares);

        tracing::debug!(
            module = self.def.name(),
            parent = parent.label(),
            exports = self.descriptor.exports().len(),
            "Attached module"
        );
        self.attached_parents.insert(parent.id());
        Ok(())
    }
}

#[derive(Default)]
struct Imported {
    extensions: Vec<Arc<dyn ApplicationExtension>>,
    middlewares: Vec<Arc<dyn Middleware>>,
}

fn merge_unique<T: ?Sized>(into: &mut Vec<Arc<T>>, from: Vec<Arc<T>>) {
    for item in from {
        if !into.iter().any(|existing| Arc::ptr_eq(existing, &item)) {
            into.push(item);
        }
    }
}

/// Walks module import graphs, giving each module its own container and
/// bridging exports into the importing module's container.
///
/// Every module is instantiated once per resolver no matter how many times it
/// is imported. Module containers are children of the root container that was
/// passed to the first [`ModuleGraphResolver::register`] call.
#[derive(Default)]
pub struct ModuleGraphResolver {
    refs: HashMap<ModuleKey, ModuleRef>,
    order: Vec<ModuleKey>,
    processing: Vec<ModuleKey>,
    root: Option<Arc<Container>>,
    overrides: HashMap<TokenKey, ProviderDef>,
}

impl ModuleGraphResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any module provider with the same token when its module is
    /// first instantiated.
    pub fn override_provider(&mut self, provider: ProviderDef) -> &mut Self {
        self.overrides
            .insert(provider.token().key().clone(), provider);
        self
    }

    /// Process `module` and its imports, bridging its exports into `parent`.
    ///
    /// # Errors
    /// - [`NestletError::CircularModuleDependency`] when `module` imports
    ///   itself, directly or through other modules.
    /// - [`NestletError::InvalidExport`] when a module exports a token it
    ///   never registered.
    pub fn register(
        &mut self,
        module: &ModuleDef,
        parent: &Arc<Container>,
        controllers: &mut ControllerRegistry,
    ) -> Result<()> {
        let root = Arc::clone(self.root.get_or_insert_with(|| Arc::clone(parent)));
        tracing::info!(module = module.name(), "Resolving module graph");

        let result = self.process_module(module, parent, &root, controllers);
        if result.is_err() {
            self.processing.clear();
        }
        result
    }

    fn process_module(
        &mut self,
        module: &ModuleDef,
        parent: &Arc<Container>,
        root: &Arc<Container>,
        controllers: &mut ControllerRegistry,
    ) -> Result<()> {
        let key = module.key();
        if let Some(position) = self.processing.iter().position(|k| *k == key) {
            return Err(self.cycle_error(position, module));
        }

        self.ensure_module_ref(module, root, controllers);

        let (container, imports, imports_resolved) = match self.refs.get(&key) {
            Some(module_ref) => (
                Arc::clone(&module_ref.container),
                module_ref.descriptor.imports().to_vec(),
                module_ref.imports_resolved,
            ),
            None => return Ok(()),
        };

        if !imports_resolved {
            self.processing.push(key);
            for import in &imports {
                self.process_module(import, &container, root, controllers)?;
            }
            self.processing.pop();

            if let Some(module_ref) = self.refs.get_mut(&key) {
                module_ref.imports_resolved = true;
            }
        }

        let imported = self.imported(&imports);
        match self.refs.get_mut(&key) {
            Some(module_ref) => module_ref.attach(parent, imported),
            None => Ok(()),
        }
    }

    fn ensure_module_ref(
        &mut self,
        module: &ModuleDef,
        root: &Arc<Container>,
        controllers: &mut ControllerRegistry,
    ) {
        if self.refs.contains_key(&module.key()) {
            return;
        }

        let descriptor = module.descriptor();
        let container = Arc::new(Container::child(root, module.name()));
        for provider in descriptor.providers() {
            match self.overrides.get(provider.token().key()) {
                Some(replacement) => {
                    tracing::debug!(
                        module = module.name(),
                        token = %provider.token(),
                        "Overriding provider"
                    );
                    replacement.register_into(&container);
                }
                None => provider.register_into(&container),
            }
        }
        for constructor in descriptor.controllers() {
            let token = Token::from(*constructor);
            if container.is_registered(&token) {
                continue;
            }
            if let Some(replacement) = self.overrides.get(token.key()) {
                tracing::debug!(module = module.name(), token = %token, "Overriding controller");
                replacement.register_into(&container);
            }
        }

        let mut module_ref = ModuleRef {
            def: module.clone(),
            extensions: descriptor.extensions().to_vec(),
            middlewares: descriptor.middlewares().to_vec(),
            descriptor,
            container,
            controllers_registered: false,
            imports_resolved: false,
            attached_parents: HashSet::new(),
        };
        module_ref.register_controllers(controllers);

        tracing::debug!(
            module = module.name(),
            providers = module_ref.container.len(),
            "Instantiated module"
        );
        self.order.push(module.key());
        self.refs.insert(module.key(), module_ref);
    }

    fn imported(&self, imports: &[ModuleDef]) -> Imported {
        let mut imported = Imported::default();
        for import in imports {
            if let Some(module_ref) = self.refs.get(&import.key()) {
                imported
                    .extensions
                    .extend(module_ref.extensions.iter().cloned());
                imported
                    .middlewares
                    .extend(module_ref.middlewares.iter().cloned());
            }
        }
        imported
    }

    fn cycle_error(&self, position: usize, module: &ModuleDef) -> NestletError {
        let path = self.processing[position..]
            .iter()
            .map(|key| self.refs.get(key).map_or("?", |r| r.name()))
            .chain(std::iter::once(module.name()))
            .collect::<Vec<_>>()
            .join(" -> ");
        tracing::error!(module = module.name(), %path, "Circular module import");
        NestletError::CircularModuleDependency {
            module: module.name().to_string(),
            path,
        }
    }

    pub fn module_ref(&self, key: ModuleKey) -> Option<&ModuleRef> {
        self.refs.get(&key)
    }

    pub fn container_of(&self, key: ModuleKey) -> Option<&Arc<Container>> {
        self.refs.get(&key).map(|module_ref| &module_ref.container)
    }

    /// Flattened extensions of a processed module; empty when unknown.
    pub fn module_extensions(&self, key: ModuleKey) -> &[Arc<dyn ApplicationExtension>] {
        self.refs.get(&key).map_or(&[], |module_ref| module_ref.extensions())
    }

    /// Flattened middlewares of a processed module; empty when unknown.
    pub fn module_middlewares(&self, key: ModuleKey) -> &[Arc<dyn Middleware>] {
        self.refs.get(&key).map_or(&[], |module_ref| module_ref.middlewares())
    }

    /// Modules in instantiation order.
    pub fn modules(&self) -> impl Iterator<Item = &ModuleRef> {
        self.order.iter().filter_map(|key| self.refs.get(key))
    }

    /// Module containers that register `token` locally, in instantiation order.
    pub fn owners_of<'a>(&'a self, token: &'a Token) -> impl Iterator<Item = &'a ModuleRef> + 'a {
        self.modules()
            .filter(move |module_ref| module_ref.container.is_registered(token))
    }

    pub fn root(&self) -> Option<&Arc<Container>> {
        self.root.as_ref()
    }

    pub fn len(&self) -> usize {
        self.refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    /// Forget every module, override and the root. Module containers are
    /// cleared too, which releases export links between them.
    pub fn clear(&mut self) {
        for module_ref in self.refs.values() {
            module_ref.container.clear();
        }
        self.refs.clear();
        self.order.clear();
        self.processing.clear();
        self.overrides.clear();
        self.root = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::di::{Arguments, DependencyMetadata, Injectable, Lifecycle, ProviderConfig};
    use crate::module::Module;

    fn resolve(module: &ModuleDef) -> (ModuleGraphResolver, Arc<Container>, ControllerRegistry) {
        let root = Arc::new(Container::new());
        let mut resolver = ModuleGraphResolver::new();
        let mut controllers = ControllerRegistry::new();
        resolver
            .register(module, &root, &mut controllers)
            .unwrap();
        (resolver, root, controllers)
    }

    struct Database;

    impl Injectable for Database {
        fn construct(_: &Arguments) -> crate::Result<Self> {
            Ok(Database)
        }
    }

    struct UserService {
        db: Arc<Database>,
    }

    impl Injectable for UserService {
        fn dependencies() -> DependencyMetadata {
            DependencyMetadata::new().push_class::<Database>()
        }

        fn construct(args: &Arguments) -> crate::Result<Self> {
            Ok(UserService { db: args.get(0)? })
        }
    }

    struct UserController {
        users: Arc<UserService>,
    }

    impl Injectable for UserController {
        fn dependencies() -> DependencyMetadata {
            DependencyMetadata::new().push_class::<UserService>()
        }

        fn construct(args: &Arguments) -> crate::Result<Self> {
            Ok(UserController { users: args.get(0)? })
        }
    }

    struct DatabaseModule;

    impl Module for DatabaseModule {
        fn descriptor() -> ModuleDescriptor {
            ModuleDescriptor::new()
                .provider::<Database>()
                .export_type::<Database>()
        }
    }

    struct UserModule;

    impl Module for UserModule {
        fn descriptor() -> ModuleDescriptor {
            ModuleDescriptor::new()
                .import::<DatabaseModule>()
                .provider::<UserService>()
                .controller::<UserController>()
                .export_type::<UserService>()
        }
    }

    struct AppModule;

    impl Module for AppModule {
        fn descriptor() -> ModuleDescriptor {
            ModuleDescriptor::new().import::<UserModule>()
        }
    }

    #[test]
    fn test_exports_bridge_into_importer() {
        let (resolver, root, controllers) = resolve(&ModuleDef::of::<AppModule>());

        let app = resolver.container_of(ModuleKey::of::<AppModule>()).unwrap();
        let users = resolver.container_of(ModuleKey::of::<UserModule>()).unwrap();
        let database = resolver
            .container_of(ModuleKey::of::<DatabaseModule>())
            .unwrap();

        // the importer sees the exporter's singleton
        let from_app = app.resolve::<UserService>().unwrap();
        let from_users = users.resolve::<UserService>().unwrap();
        assert!(Arc::ptr_eq(&from_app, &from_users));
        assert!(Arc::ptr_eq(
            &from_users.db,
            &database.resolve::<Database>().unwrap()
        ));

        // AppModule exports nothing, so nothing is bridged into the root
        assert!(!root.is_registered(&Token::of::<UserService>()));
        assert_eq!(controllers.len(), 1);
        let controller = controllers.resolve::<UserController>().unwrap();
        assert!(Arc::ptr_eq(&controller.users, &from_users));
    }

    #[test]
    fn test_exports_are_not_transitive() {
        let (resolver, _root, _) = resolve(&ModuleDef::of::<AppModule>());
        let app = resolver.container_of(ModuleKey::of::<AppModule>()).unwrap();

        // Database is exported to UserModule only; AppModule falls through
        // to the root container, which auto-constructs a separate instance.
        assert!(!app.is_registered(&Token::of::<Database>()));
        let database = resolver
            .container_of(ModuleKey::of::<DatabaseModule>())
            .unwrap()
            .resolve::<Database>()
            .unwrap();
        let fallback = app.resolve::<Database>().unwrap();
        assert!(!Arc::ptr_eq(&database, &fallback));
    }

    struct ReexportModule;

    impl Module for ReexportModule {
        fn descriptor() -> ModuleDescriptor {
            ModuleDescriptor::new()
                .import::<DatabaseModule>()
                .export_type::<Database>()
        }
    }

    #[test]
    fn test_reexport_of_bridged_token() {
        let root = Arc::new(Container::new());
        let mut resolver = ModuleGraphResolver::new();
        let mut controllers = ControllerRegistry::new();
        resolver
            .register(&ModuleDef::of::<ReexportModule>(), &root, &mut controllers)
            .unwrap();

        let database = resolver
            .container_of(ModuleKey::of::<DatabaseModule>())
            .unwrap()
            .resolve::<Database>()
            .unwrap();
        assert!(root.is_registered(&Token::of::<Database>()));
        assert!(Arc::ptr_eq(&root.resolve::<Database>().unwrap(), &database));
    }

    struct CycleA;
    struct CycleB;

    impl Module for CycleA {
        fn descriptor() -> ModuleDescriptor {
            ModuleDescriptor::new().import::<CycleB>()
        }
    }

    impl Module for CycleB {
        fn descriptor() -> ModuleDescriptor {
            ModuleDescriptor::new().import::<CycleA>()
        }
    }

    #[test]
    fn test_circular_import_reports_path() {
        let root = Arc::new(Container::new());
        let mut resolver = ModuleGraphResolver::new();
        let mut controllers = ControllerRegistry::new();

        let err = resolver
            .register(&ModuleDef::of::<CycleA>(), &root, &mut controllers)
            .unwrap_err();
        match err {
            NestletError::CircularModuleDependency { module, path } => {
                assert!(module.ends_with("CycleA"));
                assert_eq!(path.matches(" -> ").count(), 2);
                assert!(path.contains("CycleB"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(resolver.processing.is_empty());
    }

    struct SelfImport;

    impl Module for SelfImport {
        fn descriptor() -> ModuleDescriptor {
            ModuleDescriptor::new().import::<SelfImport>()
        }
    }

    #[test]
    fn test_self_import_is_a_cycle() {
        let root = Arc::new(Container::new());
        let mut resolver = ModuleGraphResolver::new();
        let err = resolver
            .register(&ModuleDef::of::<SelfImport>(), &root, &mut ControllerRegistry::new())
            .unwrap_err();
        assert_eq!(err.code(), "CIRCULAR_MODULE_DEPENDENCY");
    }

    struct BrokenExport;

    impl Module for BrokenExport {
        fn descriptor() -> ModuleDescriptor {
            ModuleDescriptor::new()
                .provider::<Database>()
                .export("MISSING")
                .export_type::<Database>()
        }
    }

    #[test]
    fn test_invalid_export_bridges_nothing() {
        let root = Arc::new(Container::new());
        let mut resolver = ModuleGraphResolver::new();
        let err = resolver
            .register(&ModuleDef::of::<BrokenExport>(), &root, &mut ControllerRegistry::new())
            .unwrap_err();

        match err {
            NestletError::InvalidExport { module, token } => {
                assert!(module.ends_with("BrokenExport"));
                assert_eq!(token, "MISSING");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(root.is_empty());
    }

    // Diamond: Top imports Left and Right, both import Shared.
    struct Shared;
    struct Left;
    struct Right;
    struct Top;

    impl Module for Shared {
        fn descriptor() -> ModuleDescriptor {
            ModuleDescriptor::new()
                .provider::<Database>()
                .export_type::<Database>()
                .extension(Noop("shared"))
                .middleware(crate::middleware::LoggingMiddleware)
        }
    }

    impl Module for Left {
        fn descriptor() -> ModuleDescriptor {
            ModuleDescriptor::new()
                .import::<Shared>()
                .extension(Noop("left"))
        }
    }

    impl Module for Right {
        fn descriptor() -> ModuleDescriptor {
            ModuleDescriptor::new()
                .import::<Shared>()
                .extension(Noop("right"))
        }
    }

    impl Module for Top {
        fn descriptor() -> ModuleDescriptor {
            ModuleDescriptor::new()
                .import::<Left>()
                .import::<Right>()
                .extension(Noop("top"))
        }
    }

    struct Noop(&'static str);

    impl ApplicationExtension for Noop {
        fn name(&self) -> &str {
            self.0
        }

        fn register(&self, _: &Container) -> crate::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_diamond_instantiates_shared_once() {
        let (resolver, _root, _) = resolve(&ModuleDef::of::<Top>());
        assert_eq!(resolver.len(), 4);

        let left = resolver.container_of(ModuleKey::of::<Left>()).unwrap();
        let right = resolver.container_of(ModuleKey::of::<Right>()).unwrap();
        assert!(Arc::ptr_eq(
            &left.resolve::<Database>().unwrap(),
            &right.resolve::<Database>().unwrap()
        ));

        let shared = resolver.module_ref(ModuleKey::of::<Shared>()).unwrap();
        assert!(shared.is_attached_to(left));
        assert!(shared.is_attached_to(right));
    }

    #[test]
    fn test_extensions_flatten_in_declaration_order() {
        let (resolver, _root, _) = resolve(&ModuleDef::of::<Top>());

        let names: Vec<_> = resolver
            .module_extensions(ModuleKey::of::<Top>())
            .iter()
            .map(|extension| extension.name().to_string())
            .collect();
        assert_eq!(names, vec!["top", "left", "shared", "right"]);
        assert_eq!(resolver.module_middlewares(ModuleKey::of::<Top>()).len(), 1);
    }

    struct Sibling1;
    struct Sibling2;

    impl Module for Sibling1 {
        fn descriptor() -> ModuleDescriptor {
            ModuleDescriptor::new().provider::<Database>()
        }
    }

    impl Module for Sibling2 {
        fn descriptor() -> ModuleDescriptor {
            ModuleDescriptor::new().provider::<Database>()
        }
    }

    struct Siblings;

    impl Module for Siblings {
        fn descriptor() -> ModuleDescriptor {
            ModuleDescriptor::new()
                .import::<Sibling1>()
                .import::<Sibling2>()
        }
    }

    #[test]
    fn test_sibling_modules_keep_separate_singletons() {
        let (resolver, _root, _) = resolve(&ModuleDef::of::<Siblings>());
        let first = resolver
            .container_of(ModuleKey::of::<Sibling1>())
            .unwrap()
            .resolve::<Database>()
            .unwrap();
        let second = resolver
            .container_of(ModuleKey::of::<Sibling2>())
            .unwrap()
            .resolve::<Database>()
            .unwrap();
        assert!(!Arc::ptr_eq(&first, &second));

        let token = Token::of::<Database>();
        assert_eq!(resolver.owners_of(&token).count(), 2);
    }

    #[test]
    fn test_registering_twice_is_idempotent() {
        let root = Arc::new(Container::new());
        let mut resolver = ModuleGraphResolver::new();
        let mut controllers = ControllerRegistry::new();
        let module = ModuleDef::of::<UserModule>();

        resolver.register(&module, &root, &mut controllers).unwrap();
        let service = root.resolve::<UserService>().unwrap();
        resolver.register(&module, &root, &mut controllers).unwrap();

        assert_eq!(controllers.len(), 1);
        assert_eq!(resolver.len(), 2);
        assert!(Arc::ptr_eq(&service, &root.resolve::<UserService>().unwrap()));
    }

    struct Clock(u64);

    struct ClockModule;

    impl Module for ClockModule {
        fn descriptor() -> ModuleDescriptor {
            ModuleDescriptor::new()
                .factory("CLOCK", |_| Ok(Clock(1)))
                .provide(ProviderDef::new(
                    Token::of::<Database>(),
                    ProviderConfig::new().lifecycle(Lifecycle::Transient),
                ))
                .export("CLOCK")
                .export_type::<Database>()
        }
    }

    #[test]
    fn test_override_replaces_module_provider() {
        let root = Arc::new(Container::new());
        let mut resolver = ModuleGraphResolver::new();
        resolver.override_provider(ProviderDef::value("CLOCK", Clock(42)));
        resolver
            .register(&ModuleDef::of::<ClockModule>(), &root, &mut ControllerRegistry::new())
            .unwrap();

        assert_eq!(root.get::<Clock>("CLOCK").unwrap().0, 42);
    }

    struct PerRequestModule;

    impl Module for PerRequestModule {
        fn descriptor() -> ModuleDescriptor {
            ModuleDescriptor::new()
                .provider::<Database>()
                .provider::<UserService>()
                .provide(ProviderDef::new(
                    Token::of::<UserController>(),
                    ProviderConfig::new().lifecycle(Lifecycle::Transient),
                ))
                .controller::<UserController>()
        }
    }

    #[test]
    fn test_controller_keeps_declared_provider() {
        let (resolver, _root, controllers) = resolve(&ModuleDef::of::<PerRequestModule>());

        let container = resolver
            .container_of(ModuleKey::of::<PerRequestModule>())
            .unwrap();
        let first = container.resolve::<UserController>().unwrap();
        let second = container.resolve::<UserController>().unwrap();
        assert!(!Arc::ptr_eq(&first, &second));

        assert_eq!(controllers.len(), 1);
        let a = controllers.resolve::<UserController>().unwrap();
        let b = controllers.resolve::<UserController>().unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_override_of_controller_token_survives() {
        let root = Arc::new(Container::new());
        let mut resolver = ModuleGraphResolver::new();
        let mut controllers = ControllerRegistry::new();
        resolver.override_provider(ProviderDef::factory(Token::of::<UserController>(), |_| {
            Ok(7u8)
        }));
        resolver
            .register(&ModuleDef::of::<UserModule>(), &root, &mut controllers)
            .unwrap();

        let container = resolver.container_of(ModuleKey::of::<UserModule>()).unwrap();
        assert_eq!(*container.get::<u8>(Token::of::<UserController>()).unwrap(), 7);
        assert_eq!(controllers.len(), 1);
    }

    #[test]
    fn test_exported_transient_stays_transient() {
        let (_resolver, root, _) = resolve(&ModuleDef::of::<ClockModule>());
        let first = root.resolve::<Database>().unwrap();
        let second = root.resolve::<Database>().unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_clear_forgets_modules() {
        let (mut resolver, root, _) = resolve(&ModuleDef::of::<UserModule>());
        let users = Arc::clone(resolver.container_of(ModuleKey::of::<UserModule>()).unwrap());

        resolver.clear();
        assert!(resolver.is_empty());
        assert!(resolver.root().is_none());
        assert!(users.is_empty());
        // bridges on the caller's root are left alone
        assert!(root.is_registered(&Token::of::<UserService>()));
    }
}
