use crate::lifecycle::LifecycleError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, NestletError>;

#[derive(Debug, Error)]
pub enum NestletError {
    #[error("No provider for {token}")]
    ProviderNotFound { token: String },

    #[error("Cannot resolve parameter #{index} of {constructor}: no token or type recorded")]
    UnresolvableDependency {
        constructor: &'static str,
        index: usize,
    },

    #[error("Provider for {token} has neither a factory nor an implementation")]
    CannotInstantiateToken { token: String },

    #[error("Circular module import at {module}: {path}")]
    CircularModuleDependency { module: String, path: String },

    #[error("Module {module} exports {token} but never registers it")]
    InvalidExport { module: String, token: String },

    #[error("Circular dependency detected: {cycle}")]
    CircularDependency { cycle: String },

    #[error("Failed to downcast instance to {type_name}")]
    DowncastFailed { type_name: &'static str },

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl NestletError {
    /// Stable machine-readable name of the variant.
    pub fn code(&self) -> &'static str {
        match self {
            NestletError::ProviderNotFound { .. } => "PROVIDER_NOT_FOUND",
            NestletError::UnresolvableDependency { .. } => "UNRESOLVABLE_DEPENDENCY",
            NestletError::CannotInstantiateToken { .. } => "CANNOT_INSTANTIATE_TOKEN",
            NestletError::CircularModuleDependency { .. } => "CIRCULAR_MODULE_DEPENDENCY",
            NestletError::InvalidExport { .. } => "INVALID_EXPORT",
            NestletError::CircularDependency { .. } => "CIRCULAR_DEPENDENCY",
            NestletError::DowncastFailed { .. } => "DOWNCAST_FAILED",
            NestletError::Lifecycle(_) => "LIFECYCLE",
            NestletError::Other(_) => "INTERNAL",
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

/// A failed resolution during request handling is a server-side wiring
/// problem, so every variant maps to 500.
impl IntoResponse for NestletError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            code: self.code(),
            message: self.to_string(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response()
    }
}
