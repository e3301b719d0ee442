use crate::di::Container;
use crate::error::Result;

/// One-time bootstrap hook seeding cross-cutting singletons.
///
/// Extensions are declared on modules and flattened through imports. The
/// application runs each distinct extension exactly once against the root
/// container, before lifecycle hooks run and before any controller is
/// resolved.
///
/// # Example
/// ```
/// use nestlet::{ApplicationExtension, Container, Result};
///
/// struct BuildInfo;
///
/// impl ApplicationExtension for BuildInfo {
///     fn register(&self, container: &Container) -> Result<()> {
///         container.register_instance("BUILD_SHA", String::from("abc123"));
///         Ok(())
///     }
/// }
/// ```
pub trait ApplicationExtension: Send + Sync + 'static {
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    fn register(&self, container: &Container) -> Result<()>;
}
