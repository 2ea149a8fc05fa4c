//! Storage error types.

use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// IO error (creating the database directory, permission denied, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// SQLite error (open failure, corruption, constraint violation, etc.)
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A stored timestamp could not be parsed
    #[error("Invalid timestamp in row: {0}")]
    InvalidTimestamp(String),

    /// Lock was poisoned (another thread panicked while holding the lock)
    #[error("Lock poisoned: {0}")]
    LockPoisoned(String),
}

impl StorageError {
    /// Create an invalid timestamp error.
    pub fn invalid_timestamp(value: impl Into<String>) -> Self {
        Self::InvalidTimestamp(value.into())
    }
}
