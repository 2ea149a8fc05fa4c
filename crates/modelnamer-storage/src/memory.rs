//! In-memory storage implementation for testing.

use crate::{CacheEntry, CacheKey, NameStore, StorageError, StorageResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::RwLock;

/// In-memory display-name store.
///
/// This stores all data in memory and is not persistent.
pub struct MemoryStore {
    data: RwLock<BTreeMap<CacheKey, CacheEntry>>,
}

impl MemoryStore {
    /// Create a new in-memory store.
    pub fn new() -> Self {
        Self {
            data: RwLock::new(BTreeMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> StorageError {
    StorageError::LockPoisoned(e.to_string())
}

#[async_trait]
impl NameStore for MemoryStore {
    async fn get(&self, key: &CacheKey) -> StorageResult<Option<CacheEntry>> {
        let data = self.data.read().map_err(poisoned)?;
        Ok(data.get(key).cloned())
    }

    async fn put(&self, entry: &CacheEntry) -> StorageResult<()> {
        let mut data = self.data.write().map_err(poisoned)?;
        data.insert(entry.key.clone(), entry.clone());
        Ok(())
    }

    async fn remove_created_before(&self, cutoff: DateTime<Utc>) -> StorageResult<u64> {
        let mut data = self.data.write().map_err(poisoned)?;
        let before = data.len();
        data.retain(|_, entry| entry.created_at >= cutoff);
        Ok((before - data.len()) as u64)
    }

    async fn count(&self) -> StorageResult<u64> {
        let data = self.data.read().map_err(poisoned)?;
        Ok(data.len() as u64)
    }

    async fn list(&self, model_id: Option<&str>) -> StorageResult<Vec<CacheEntry>> {
        let data = self.data.read().map_err(poisoned)?;
        Ok(data
            .values()
            .filter(|entry| model_id.map_or(true, |id| entry.key.model_id == id))
            .cloned()
            .collect())
    }
}
