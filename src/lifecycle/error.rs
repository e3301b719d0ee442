use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Initialization failed: {0}")]
    InitializationFailed(String),

    #[error("Shutdown failed: {0}")]
    ShutdownFailed(String),

    #[error("{phase} did not finish within {after:?}")]
    Timeout { phase: &'static str, after: Duration },

    #[error("{phase} hook failed for {service}: {message}")]
    HookFailed {
        phase: &'static str,
        service: String,
        message: String,
    },
}

impl LifecycleError {
    pub fn init_failed(msg: impl Into<String>) -> Self {
        Self::InitializationFailed(msg.into())
    }

    pub fn shutdown_failed(msg: impl Into<String>) -> Self {
        Self::ShutdownFailed(msg.into())
    }

    pub(crate) fn hook_failed(phase: &'static str, service: &str, source: &LifecycleError) -> Self {
        Self::HookFailed {
            phase,
            service: service.to_string(),
            message: source.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LifecycleError>;
