//! Modules group providers, controllers, extensions and middlewares, and
//! decide which of their providers other modules may see.

mod descriptor;
mod extension;
mod resolver;

pub use descriptor::{Module, ModuleDef, ModuleDescriptor, ModuleKey, ProviderDef};
pub use extension::ApplicationExtension;
pub use resolver::{ModuleGraphResolver, ModuleRef};
