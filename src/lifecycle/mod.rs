//! Lifecycle hooks and application bootstrap.
//!
//! # Lifecycle Phases
//!
//! ```text
//! 1. Root providers
//!    ↓
//! 2. Module graph resolution
//!    ↓
//! 3. Extensions (once each)
//!    ↓
//! 4. Eager singletons
//!    ↓
//! 5. OnModuleInit                ← Lifecycle Hook
//!    ↓
//! 6. OnApplicationBootstrap      ← Lifecycle Hook
//!    ↓
//! [Running...]
//!    ↓
//! 7. Shutdown Signal (SIGTERM/SIGINT)
//!    ↓
//! 8. OnApplicationShutdown       ← Lifecycle Hook
//!    ↓
//! 9. OnModuleDestroy (reverse)   ← Lifecycle Hook
//! ```

mod application;
mod error;
mod manager;
mod shutdown;
mod traits;

pub use application::{
    Application, ApplicationBuilder, BOOTSTRAP_TIMEOUT_KEY, EAGER_SINGLETONS_KEY,
    INIT_TIMEOUT_KEY,
};
pub use error::{LifecycleError, Result};
pub use manager::LifecycleManager;
pub use shutdown::{ShutdownHandler, shutdown_signal};
pub use traits::{OnApplicationBootstrap, OnApplicationShutdown, OnModuleDestroy, OnModuleInit};
