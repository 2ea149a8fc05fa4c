//! Provider error types.

use thiserror::Error;

/// Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors that can occur while talking to the catalog or generation service.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// HTTP request failed (connect error, timeout, body read error).
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Missing API key.
    #[error("Missing API key for provider: {0}")]
    MissingApiKey(String),

    /// Invalid API key (not representable as a header value).
    #[error("Invalid API key for provider: {0}")]
    InvalidApiKey(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Internal provider error.
    #[error("Provider error: {message}")]
    Internal { message: String },

    /// API error with status code.
    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },
}

impl ProviderError {
    /// Create a missing API key error.
    pub fn missing_api_key(provider: impl Into<String>) -> Self {
        Self::MissingApiKey(provider.into())
    }

    /// Create an invalid API key error.
    pub fn invalid_api_key(provider: impl Into<String>) -> Self {
        Self::InvalidApiKey(provider.into())
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Create an API error.
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// Check if this error means no credential is configured.
    pub fn is_missing_credential(&self) -> bool {
        matches!(self, ProviderError::MissingApiKey(_))
    }

    /// Check if this error came from a timed-out request.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ProviderError::RequestFailed(e) if e.is_timeout())
    }
}
