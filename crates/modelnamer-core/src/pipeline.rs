//! Catalog-to-config run.
//!
//! One run sweeps stale cache entries, fetches the catalog, keeps enabled
//! and available language models, resolves their display names and builds
//! the sorted provider config. Only a catalog failure aborts the run.

use crate::error::CoreResult;
use crate::fingerprint::cache_key;
use crate::naming::Namer;
use crate::provider_config::{ModelRecord, ProviderConfig};
use modelnamer_provider::CatalogSource;
use modelnamer_util::TimingGuard;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Outcome of a run.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// The sorted provider config.
    pub config: ProviderConfig,
    /// One `Added model ...` line per record, in catalog order.
    pub added: Vec<String>,
    /// Records fetched from the catalog before filtering.
    pub fetched: usize,
    /// Cache size after the run, when it could be read.
    pub cache_entries: Option<u64>,
}

impl RunReport {
    /// Closing line printed after the config is written.
    pub fn summary(&self) -> String {
        format!(
            "Successfully generated APIpie provider config with {} models",
            self.config.models.len()
        )
    }
}

/// Drives one run against a catalog and a namer.
pub struct Pipeline {
    catalog: Arc<dyn CatalogSource>,
    namer: Namer,
    max_cache_age: Duration,
}

impl Pipeline {
    pub fn new(catalog: Arc<dyn CatalogSource>, namer: Namer, max_cache_age: Duration) -> Self {
        Self {
            catalog,
            namer,
            max_cache_age,
        }
    }

    pub async fn run(&self) -> CoreResult<RunReport> {
        let cache = self.namer.cache();

        if let Err(e) = cache.clean_old_entries(self.max_cache_age).await {
            warn!(error = %e, "Failed to clean old cache entries");
        }
        if let Ok(count) = cache.stats().await {
            info!(entries = count, "Cache initialized");
        }

        let catalog = self.catalog.fetch_models().await?;
        let fetched = catalog.len();
        let models: Vec<_> = catalog.into_iter().filter(|m| m.is_text_model()).collect();
        info!(fetched, kept = models.len(), "Fetched catalog");

        let names = {
            let _timing = TimingGuard::new("naming", format!("{} models", models.len()));
            self.namer.resolve_all(&models).await
        };

        let mut config = ProviderConfig::apipie();
        let mut added = Vec::with_capacity(models.len());
        for model in &models {
            let name = names
                .get(&cache_key(model))
                .cloned()
                .unwrap_or_else(|| model.id.clone());
            let record = ModelRecord::from_catalog(model, name);
            added.push(format!(
                "Added model {} ({}) with context window {}",
                record.id, record.name, record.context_window
            ));
            config.models.push(record);
        }
        config.sort_models();

        let cache_entries = cache.stats().await.ok();
        if let Some(count) = cache_entries {
            info!(entries = count, "Cache now contains entries");
        }

        Ok(RunReport {
            config,
            added,
            fetched,
            cache_entries,
        })
    }
}
