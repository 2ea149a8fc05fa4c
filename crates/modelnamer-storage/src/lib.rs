//! Storage layer for modelnamer.
//!
//! This crate provides the durable display-name cache with two backends:
//! - SQLite file storage (default)
//! - In-memory storage (for testing)
//!
//! Entries are keyed by `(model id, metadata fingerprint)`. The fingerprint is
//! computed by the caller; this crate only stores it as opaque text.

pub mod error;
pub mod memory;
pub mod sqlite;

pub use error::{StorageError, StorageResult};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a cached display name.
///
/// The model id alone is not unique in the catalog, so the fingerprint of the
/// model's differentiating metadata is always part of the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CacheKey {
    pub model_id: String,
    pub fingerprint: String,
}

impl CacheKey {
    pub fn new(model_id: impl Into<String>, fingerprint: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
            fingerprint: fingerprint.into(),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.model_id, self.fingerprint)
    }
}

/// A stored display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: CacheKey,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Create an entry stamped with the current time.
    pub fn new(key: CacheKey, display_name: impl Into<String>) -> Self {
        Self::with_created_at(key, display_name, Utc::now())
    }

    /// Create an entry with an explicit creation time.
    pub fn with_created_at(
        key: CacheKey,
        display_name: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            key,
            display_name: display_name.into(),
            created_at,
        }
    }
}

/// A trait for display-name cache backends.
#[async_trait]
pub trait NameStore: Send + Sync {
    /// Look up an entry by its full key.
    ///
    /// Returns `None` if the key doesn't exist.
    async fn get(&self, key: &CacheKey) -> StorageResult<Option<CacheEntry>>;

    /// Insert or replace an entry. The last write for a key wins.
    async fn put(&self, entry: &CacheEntry) -> StorageResult<()>;

    /// Delete every entry created strictly before `cutoff`.
    ///
    /// Returns the number of removed entries.
    async fn remove_created_before(&self, cutoff: DateTime<Utc>) -> StorageResult<u64>;

    /// Total number of entries.
    async fn count(&self) -> StorageResult<u64>;

    /// List entries, optionally restricted to one model id, ordered by key.
    async fn list(&self, model_id: Option<&str>) -> StorageResult<Vec<CacheEntry>>;
}
