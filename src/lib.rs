//! # Nestlet
//!
//! Module-scoped dependency injection for axum services.
//!
//! Applications are assembled from modules. Each module owns a child
//! container holding its providers, imports other modules, and exports a
//! subset of its providers to whoever imports it. Constructors declare their
//! parameters explicitly, so wiring never depends on runtime reflection.
//!
//! ## Quick Start
//!
//! ```rust
//! use nestlet::{Application, Injectable, module};
//! use std::sync::Arc;
//!
//! #[derive(Injectable)]
//! pub struct Database;
//!
//! #[derive(Injectable)]
//! pub struct UserService {
//!     db: Arc<Database>,
//! }
//!
//! #[derive(Injectable)]
//! pub struct UserController {
//!     users: Arc<UserService>,
//! }
//!
//! #[module(providers = [Database], exports = [Database])]
//! pub struct DatabaseModule;
//!
//! #[module(
//!     imports = [DatabaseModule],
//!     providers = [UserService],
//!     controllers = [UserController],
//! )]
//! pub struct AppModule;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> nestlet::Result<()> {
//! let app = Application::builder().module::<AppModule>().build().await?;
//! let controller = app.controllers().resolve::<UserController>()?;
//! assert!(Arc::ptr_eq(&controller.users, &app.resolve::<UserService>()?));
//! # Ok(())
//! # }
//! ```

extern crate self as nestlet;

pub mod config;
pub mod context;
pub mod controller;
pub mod di;
pub mod error;
pub mod lifecycle;
pub mod middleware;
pub mod module;

// Re-export core types
pub use config::{ConfigExtension, ConfigService};
pub use context::ApplicationContext;
pub use controller::{ControllerEntry, ControllerRegistry};
pub use di::{
    Arguments, Constructor, Container, DependencyMetadata, DependencyPlan, Factory, HasContainer,
    Inject, Injectable, Instance, Lifecycle, ParamDescriptor, ProviderConfig, Symbol, Token,
    TokenKey,
};
pub use error::{NestletError, Result};
pub use lifecycle::{Application, ApplicationBuilder};
pub use module::{
    ApplicationExtension, Module, ModuleDef, ModuleDescriptor, ModuleGraphResolver, ModuleKey,
    ModuleRef, ProviderDef,
};

// Re-export macros
pub use nestlet_macro::{Injectable, module};

// Re-export commonly used types from dependencies
pub use async_trait::async_trait;
pub use axum;

/// Prelude module for convenient imports
///
/// ```
/// use nestlet::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{ConfigExtension, ConfigService};
    pub use crate::context::ApplicationContext;
    pub use crate::di::{
        Arguments, Container, DependencyMetadata, HasContainer, Inject, Lifecycle, ProviderConfig,
        Symbol, Token,
    };
    pub use crate::error::{NestletError, Result};
    pub use crate::lifecycle::{
        Application, ApplicationBuilder, LifecycleError, OnApplicationBootstrap,
        OnApplicationShutdown, OnModuleDestroy, OnModuleInit, shutdown_signal,
    };
    pub use crate::middleware::{LoggingMiddleware, Middleware, MiddlewareResult, Next};
    pub use crate::module::{ApplicationExtension, Module, ModuleDef, ModuleDescriptor, ProviderDef};
    // trait and derive macro
    pub use crate::{Injectable, module};
    pub use async_trait::async_trait;
    pub use std::sync::Arc;
}
