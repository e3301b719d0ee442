//! Graceful shutdown on Ctrl+C or SIGTERM.

use super::LifecycleManager;
use std::sync::Arc;
use tokio::signal;

/// Waits for a termination signal, then runs the shutdown and destroy hooks.
///
/// # Example
///
/// ```rust,no_run
/// use nestlet::lifecycle::{LifecycleManager, ShutdownHandler};
/// use std::sync::Arc;
///
/// # async fn run() {
/// let handler = ShutdownHandler::new(Arc::new(LifecycleManager::new()));
/// tokio::spawn(async move {
///     handler.wait_for_shutdown().await;
/// });
/// # }
/// ```
#[derive(Clone)]
pub struct ShutdownHandler {
    lifecycle_manager: Arc<LifecycleManager>,
}

impl ShutdownHandler {
    pub fn new(lifecycle_manager: Arc<LifecycleManager>) -> Self {
        Self { lifecycle_manager }
    }

    pub async fn wait_for_shutdown(&self) {
        shutdown_signal().await;
        self.shutdown().await;
    }

    /// Run the hooks without waiting for a signal.
    pub async fn shutdown(&self) {
        tracing::info!("Starting graceful shutdown");
        self.lifecycle_manager.call_application_shutdown().await;
        self.lifecycle_manager.call_module_destroy().await;
        tracing::info!("Graceful shutdown complete");
    }
}

/// Completes when Ctrl+C or, on unix, SIGTERM is received.
///
/// A signal whose handler cannot be installed is logged and never fires.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal");
        },
    }
}
