//! Error types for the core crate.
//!
//! Only fatal conditions surface as [`CoreError`]. Generation failures and
//! cache read/write failures are absorbed by the naming code and never reach
//! the caller.

use thiserror::Error;

/// Core error types.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Storage error.
    #[error("storage error: {0}")]
    Storage(#[from] modelnamer_storage::StorageError),

    /// Catalog or generation service error.
    #[error("provider error: {0}")]
    Provider(#[from] modelnamer_provider::ProviderError),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Cache age does not fit in a timestamp offset.
    #[error("invalid cache age: {0:?}")]
    InvalidMaxAge(std::time::Duration),
}

/// Configuration-specific errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid JSON syntax.
    #[error("invalid config at {path}: {message}")]
    InvalidJson { path: String, message: String },

    /// Config validation failed.
    #[error("config validation failed: {message}")]
    Validation { message: String },

    /// Config file not found.
    #[error("config file not found: {path}")]
    NotFound { path: String },
}

impl ConfigError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
