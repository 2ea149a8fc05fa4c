//! Command handlers for the modelnamer CLI.

pub mod cache;
pub mod generate;

pub use cache::*;
pub use generate::*;

use anyhow::Context;
use modelnamer_core::{Config, DisplayNameCache};
use modelnamer_storage::SqliteStore;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Load configuration and apply the global command-line overrides.
pub async fn load_config(path: Option<&Path>, cache: Option<PathBuf>) -> anyhow::Result<Config> {
    let mut config = Config::load(path)
        .await
        .context("Error loading configuration")?;
    if let Some(cache) = cache {
        config.cache_path = Some(cache);
    }
    Ok(config)
}

/// Open the SQLite name cache named by `config`.
pub fn open_cache(config: &Config) -> anyhow::Result<DisplayNameCache> {
    let path = config.cache_path();
    let store = SqliteStore::open(&path)
        .with_context(|| format!("Error initializing cache at {}", path.display()))?;
    Ok(DisplayNameCache::new(Arc::new(store)))
}
