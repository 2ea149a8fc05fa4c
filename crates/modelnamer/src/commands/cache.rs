//! Cache maintenance command handlers.
//!
//! Handles stats, age-based cleanup and listing of cached display names.

use super::open_cache;
use clap::Subcommand;
use modelnamer_core::Config;
use std::time::Duration;

/// Cache subcommands.
#[derive(Subcommand)]
pub enum CacheCommands {
    /// Show the number of cached names
    Stats,
    /// Remove cached names older than the maximum age
    Clean {
        /// Maximum age in days (defaults to the configured age)
        #[arg(long)]
        max_age_days: Option<u64>,
    },
    /// List cached names
    List {
        /// Only show entries for this model id
        #[arg(long)]
        model: Option<String>,
    },
}

/// Handle cache commands.
pub async fn handle_cache(config: Config, command: CacheCommands) -> anyhow::Result<()> {
    let cache = open_cache(&config)?;

    match command {
        CacheCommands::Stats => {
            let count = cache.stats().await?;
            println!("Cache: {}", config.cache_path().display());
            println!("Entries: {count}");
        }
        CacheCommands::Clean { max_age_days } => {
            let max_age = max_age_days
                .map(|days| Duration::from_secs(days.saturating_mul(24 * 60 * 60)))
                .unwrap_or_else(|| config.max_cache_age());
            let removed = cache.clean_old_entries(max_age).await?;
            println!("Removed {removed} cache entries");
        }
        CacheCommands::List { model } => {
            let entries = cache.entries(model.as_deref()).await?;

            if entries.is_empty() {
                println!("No cached names found.");
            } else {
                println!("{:<40} {:<14} {:<40} {:<20}", "MODEL", "HASH", "NAME", "CREATED");
                println!("{}", "-".repeat(117));

                for entry in entries {
                    let hash: String = entry.key.fingerprint.chars().take(12).collect();
                    let created = entry.created_at.format("%Y-%m-%d %H:%M:%S");
                    println!(
                        "{:<40} {:<14} {:<40} {:<20}",
                        entry.key.model_id, hash, entry.display_name, created
                    );
                }
            }
        }
    }

    Ok(())
}
