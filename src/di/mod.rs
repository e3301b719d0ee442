mod container;
mod extractor;
mod guard;
mod injectable;
mod metadata;
mod plan;
mod provider;
mod token;

pub use container::Container;
pub use extractor::{HasContainer, Inject};
pub use injectable::{Arguments, Constructor, Injectable, Instance};
pub use metadata::{DependencyMetadata, ParamDescriptor};
pub use plan::DependencyPlan;
pub use provider::{Factory, Lifecycle, ProviderConfig};
pub use token::{Symbol, Token, TokenKey};
