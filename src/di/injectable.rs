use crate::di::{DependencyMetadata, Lifecycle};
use crate::error::{NestletError, Result};
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// Type-erased instance as stored by a container.
pub type Instance = Arc<dyn Any + Send + Sync>;

/// Trait for types a container can construct
///
/// This trait is typically implemented automatically via the `#[derive(Injectable)]` macro.
/// The dependency list returned by [`Injectable::dependencies`] is the only
/// source of wiring information: parameter `i` of the plan is handed to
/// [`Injectable::construct`] at position `i` of the [`Arguments`].
///
/// # Example
/// ```
/// use nestlet::{Arguments, Container, DependencyMetadata, Injectable, Result};
/// use std::sync::Arc;
///
/// struct Database;
///
/// impl Injectable for Database {
///     fn construct(_: &Arguments) -> Result<Self> {
///         Ok(Database)
///     }
/// }
///
/// struct Repo {
///     db: Arc<Database>,
/// }
///
/// impl Injectable for Repo {
///     fn dependencies() -> DependencyMetadata {
///         DependencyMetadata::new().class::<Database>(0)
///     }
///
///     fn construct(args: &Arguments) -> Result<Self> {
///         Ok(Repo { db: args.get(0)? })
///     }
/// }
///
/// let container = Container::new();
/// container.register_type::<Database>().register_type::<Repo>();
/// let repo = container.resolve::<Repo>().unwrap();
/// assert!(Arc::ptr_eq(&repo.db, &container.resolve::<Database>().unwrap()));
/// ```
pub trait Injectable: Sized + Send + Sync + 'static {
    /// Constructor parameters, in positional order.
    fn dependencies() -> DependencyMetadata {
        DependencyMetadata::new()
    }

    /// Lifecycle recorded on the type itself; registration config overrides it.
    fn lifecycle() -> Option<Lifecycle> {
        None
    }

    /// Build an instance from already-resolved dependencies.
    fn construct(args: &Arguments) -> Result<Self>;
}

/// Type-erased handle on an [`Injectable`] type.
#[derive(Clone, Copy)]
pub struct Constructor {
    type_id: TypeId,
    name: &'static str,
    dependencies: fn() -> DependencyMetadata,
    lifecycle: fn() -> Option<Lifecycle>,
    build: fn(&Arguments) -> Result<Instance>,
}

fn build_erased<T: Injectable>(args: &Arguments) -> Result<Instance> {
    let instance: Instance = Arc::new(T::construct(args)?);
    Ok(instance)
}

impl Constructor {
    pub fn of<T: Injectable>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            dependencies: T::dependencies,
            lifecycle: T::lifecycle,
            build: build_erased::<T>,
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn dependencies(&self) -> DependencyMetadata {
        (self.dependencies)()
    }

    pub fn lifecycle(&self) -> Option<Lifecycle> {
        (self.lifecycle)()
    }

    pub(crate) fn build(&self, args: &Arguments) -> Result<Instance> {
        (self.build)(args)
    }
}

impl PartialEq for Constructor {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for Constructor {}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Constructor").field(&self.name).finish()
    }
}

/// Resolved constructor arguments, addressed by parameter index.
pub struct Arguments {
    constructor: &'static str,
    values: Vec<Instance>,
}

impl Arguments {
    pub(crate) fn new(constructor: &'static str, values: Vec<Instance>) -> Self {
        Self {
            constructor,
            values,
        }
    }

    /// Downcast argument `index` to `V`.
    ///
    /// For a `dyn Trait` dependency the stored value is an `Arc<dyn Trait>`,
    /// so ask for `V = Arc<dyn Trait>`.
    pub fn get<V: Any + Send + Sync>(&self, index: usize) -> Result<Arc<V>> {
        let value = self
            .values
            .get(index)
            .ok_or(NestletError::UnresolvableDependency {
                constructor: self.constructor,
                index,
            })?;
        Arc::clone(value)
            .downcast::<V>()
            .map_err(|_| NestletError::DowncastFailed {
                type_name: std::any::type_name::<V>(),
            })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
