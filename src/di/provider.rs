use crate::di::{Constructor, Container, Instance, Injectable, Token};
use crate::error::Result;
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use strum_macros::{Display, EnumString};

/// How long a resolved instance lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum Lifecycle {
    /// One instance per container, created on first resolution.
    #[default]
    Singleton,
    /// A fresh instance on every resolution.
    Transient,
}

/// Factory closure producing an instance from the registering container.
pub type Factory = Arc<dyn Fn(&Container) -> Result<Instance> + Send + Sync>;

/// Registration options for [`Container::register_with`].
///
/// # Example
/// ```
/// use nestlet::{Container, ProviderConfig};
///
/// struct Settings {
///     retries: u32,
/// }
///
/// let container = Container::new();
/// container.register_with(
///     "SETTINGS",
///     ProviderConfig::new().use_factory(|_| Ok(Settings { retries: 3 })),
/// );
/// let settings = container.get::<Settings>("SETTINGS").unwrap();
/// assert_eq!(settings.retries, 3);
/// ```
#[derive(Clone, Default)]
pub struct ProviderConfig {
    lifecycle: Option<Lifecycle>,
    factory: Option<Factory>,
    implementation: Option<Constructor>,
}

impl ProviderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lifecycle(mut self, lifecycle: Lifecycle) -> Self {
        self.lifecycle = Some(lifecycle);
        self
    }

    pub fn transient(self) -> Self {
        self.lifecycle(Lifecycle::Transient)
    }

    pub fn singleton(self) -> Self {
        self.lifecycle(Lifecycle::Singleton)
    }

    /// Produce the instance with `factory`. Takes precedence over an implementation.
    pub fn use_factory<V, F>(mut self, factory: F) -> Self
    where
        V: Any + Send + Sync,
        F: Fn(&Container) -> Result<V> + Send + Sync + 'static,
    {
        self.factory = Some(Arc::new(move |container: &Container| {
            let instance: Instance = Arc::new(factory(container)?);
            Ok(instance)
        }));
        self
    }

    /// Same as [`ProviderConfig::use_factory`] for a factory that already
    /// returns a type-erased instance.
    pub fn use_raw_factory(mut self, factory: Factory) -> Self {
        self.factory = Some(factory);
        self
    }

    /// Construct `T` (auto-wired) whenever the token is resolved.
    pub fn use_class<T: Injectable>(self) -> Self {
        self.use_constructor(Constructor::of::<T>())
    }

    pub fn use_constructor(mut self, constructor: Constructor) -> Self {
        self.implementation = Some(constructor);
        self
    }

    /// Resolve the effective provider for `token`.
    ///
    /// Lifecycle precedence: explicit config, then the implementation type's
    /// own declaration, then singleton.
    pub(crate) fn into_provider(self, token: &Token) -> Provider {
        let implementation = self.implementation.or_else(|| token.constructor().copied());
        let lifecycle = self
            .lifecycle
            .or_else(|| implementation.and_then(|ctor| ctor.lifecycle()))
            .unwrap_or_default();

        let recipe = match (self.factory, implementation) {
            (Some(factory), _) => Recipe::Factory(factory),
            (None, Some(constructor)) => Recipe::Class(constructor),
            (None, None) => Recipe::Unset,
        };

        Provider { lifecycle, recipe }
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("lifecycle", &self.lifecycle)
            .field("factory", &self.factory.is_some())
            .field("implementation", &self.implementation)
            .finish()
    }
}

/// Export-table entry: the token is owned by `source` and resolved there.
#[derive(Clone)]
pub(crate) struct ExportLink {
    pub(crate) source: Arc<Container>,
    pub(crate) token: Token,
}

#[derive(Clone)]
pub(crate) enum Recipe {
    Value(Instance),
    Factory(Factory),
    Class(Constructor),
    Export(ExportLink),
    Unset,
}

#[derive(Clone)]
pub(crate) struct Provider {
    pub(crate) lifecycle: Lifecycle,
    pub(crate) recipe: Recipe,
}

impl Provider {
    pub(crate) fn value(instance: Instance) -> Self {
        Self {
            lifecycle: Lifecycle::Singleton,
            recipe: Recipe::Value(instance),
        }
    }

    /// Caching stays with the source container, so a transient export stays transient.
    pub(crate) fn export(source: Arc<Container>, token: Token) -> Self {
        Self {
            lifecycle: Lifecycle::Transient,
            recipe: Recipe::Export(ExportLink { source, token }),
        }
    }
}
