//! Display-name cache.
//!
//! Wraps a [`NameStore`] and speaks in catalog models instead of raw keys.
//! Read failures degrade to a miss and are only logged; write and sweep
//! failures are returned so the caller can log them and carry on.

use crate::error::{CoreError, CoreResult};
use crate::fingerprint::cache_key;
use chrono::Utc;
use modelnamer_provider::CatalogModel;
use modelnamer_storage::{CacheEntry, NameStore};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default age after which cached names are swept (30 days).
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// Cache of generated display names, keyed by `(model id, fingerprint)`.
#[derive(Clone)]
pub struct DisplayNameCache {
    store: Arc<dyn NameStore>,
}

impl DisplayNameCache {
    pub fn new(store: Arc<dyn NameStore>) -> Self {
        Self { store }
    }

    /// Look up the cached name for `model`.
    pub async fn get(&self, model: &CatalogModel) -> Option<String> {
        let key = cache_key(model);
        match self.store.get(&key).await {
            Ok(Some(entry)) if !entry.display_name.is_empty() => {
                debug!(model = %model.id, "Cache hit");
                Some(entry.display_name)
            }
            Ok(_) => None,
            Err(e) => {
                warn!(model = %model.id, error = %e, "Cache get error");
                None
            }
        }
    }

    /// Store a generated name for `model`, replacing any previous entry.
    ///
    /// Only call this with names produced by the generation service.
    pub async fn set(&self, model: &CatalogModel, display_name: &str) -> CoreResult<()> {
        let entry = CacheEntry::new(cache_key(model), display_name);
        self.store.put(&entry).await?;
        Ok(())
    }

    /// Remove entries created more than `max_age` ago.
    ///
    /// The cutoff is taken once, before deleting, so entries written later
    /// in the same run are never candidates.
    pub async fn clean_old_entries(&self, max_age: Duration) -> CoreResult<u64> {
        let age = chrono::Duration::from_std(max_age).map_err(|_| CoreError::InvalidMaxAge(max_age))?;
        let cutoff = Utc::now()
            .checked_sub_signed(age)
            .ok_or(CoreError::InvalidMaxAge(max_age))?;

        let removed = self.store.remove_created_before(cutoff).await?;
        if removed > 0 {
            info!(removed, "Cleaned old cache entries");
        }
        Ok(removed)
    }

    /// Total number of cached names.
    pub async fn stats(&self) -> CoreResult<u64> {
        Ok(self.store.count().await?)
    }

    /// Entries for inspection, optionally for a single model id.
    pub async fn entries(&self, model_id: Option<&str>) -> CoreResult<Vec<CacheEntry>> {
        Ok(self.store.list(model_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::DateTime;
    use modelnamer_storage::{CacheKey, MemoryStore, StorageError, StorageResult};

    fn model(id: &str, provider: &str) -> CatalogModel {
        CatalogModel {
            id: id.into(),
            provider: provider.into(),
            ..Default::default()
        }
    }

    /// A store whose every operation fails.
    struct BrokenStore;

    #[async_trait]
    impl NameStore for BrokenStore {
        async fn get(&self, _key: &CacheKey) -> StorageResult<Option<CacheEntry>> {
            Err(StorageError::LockPoisoned("broken".into()))
        }
        async fn put(&self, _entry: &CacheEntry) -> StorageResult<()> {
            Err(StorageError::LockPoisoned("broken".into()))
        }
        async fn remove_created_before(&self, _cutoff: DateTime<Utc>) -> StorageResult<u64> {
            Err(StorageError::LockPoisoned("broken".into()))
        }
        async fn count(&self) -> StorageResult<u64> {
            Err(StorageError::LockPoisoned("broken".into()))
        }
        async fn list(&self, _model_id: Option<&str>) -> StorageResult<Vec<CacheEntry>> {
            Err(StorageError::LockPoisoned("broken".into()))
        }
    }

    #[tokio::test]
    async fn set_then_get_round_trips() {
        let cache = DisplayNameCache::new(Arc::new(MemoryStore::new()));
        let gpt4 = model("gpt-4", "openai");

        cache.set(&gpt4, "X").await.unwrap();
        assert_eq!(cache.get(&gpt4).await.as_deref(), Some("X"));
    }

    #[tokio::test]
    async fn set_twice_keeps_one_entry() {
        let cache = DisplayNameCache::new(Arc::new(MemoryStore::new()));
        let gpt4 = model("gpt-4", "openai");

        cache.set(&gpt4, "GPT-4").await.unwrap();
        cache.set(&gpt4, "GPT-4").await.unwrap();

        assert_eq!(cache.stats().await.unwrap(), 1);
        assert_eq!(cache.get(&gpt4).await.as_deref(), Some("GPT-4"));
    }

    #[tokio::test]
    async fn variants_with_same_id_are_cached_separately() {
        let cache = DisplayNameCache::new(Arc::new(MemoryStore::new()));
        let openai = model("gpt-4", "openai");
        let azure = model("gpt-4", "azure");

        cache.set(&openai, "GPT-4 (OpenAI)").await.unwrap();

        assert_eq!(cache.get(&openai).await.as_deref(), Some("GPT-4 (OpenAI)"));
        assert_eq!(cache.get(&azure).await, None);
    }

    #[tokio::test]
    async fn storage_errors_degrade_to_miss() {
        let cache = DisplayNameCache::new(Arc::new(BrokenStore));
        let gpt4 = model("gpt-4", "openai");

        assert_eq!(cache.get(&gpt4).await, None);
        assert!(cache.set(&gpt4, "GPT-4").await.is_err());
        assert!(cache.stats().await.is_err());
        assert!(cache.clean_old_entries(DEFAULT_MAX_AGE).await.is_err());
    }

    #[tokio::test]
    async fn clean_old_entries_respects_cutoff() {
        let store = Arc::new(MemoryStore::new());
        let cache = DisplayNameCache::new(store.clone());
        let old = model("old", "x");
        let fresh = model("fresh", "x");

        store
            .put(&CacheEntry::with_created_at(
                cache_key(&old),
                "Old",
                Utc::now() - chrono::Duration::days(45),
            ))
            .await
            .unwrap();
        cache.set(&fresh, "Fresh").await.unwrap();

        let removed = cache.clean_old_entries(DEFAULT_MAX_AGE).await.unwrap();

        assert_eq!(removed, 1);
        assert_eq!(cache.get(&old).await, None);
        assert_eq!(cache.get(&fresh).await.as_deref(), Some("Fresh"));
    }

    #[tokio::test]
    async fn absurd_max_age_is_rejected() {
        let cache = DisplayNameCache::new(Arc::new(MemoryStore::new()));
        let result = cache.clean_old_entries(Duration::from_secs(u64::MAX)).await;
        assert!(matches!(result, Err(CoreError::InvalidMaxAge(_))));
    }
}
