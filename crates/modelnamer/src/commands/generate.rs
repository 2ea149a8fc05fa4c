//! The generate command.

use super::open_cache;
use anyhow::Context;
use clap::Args;
use modelnamer_core::{Config, GithubActionsNotifier, Namer, Pipeline};
use modelnamer_provider::{ApipieCatalog, ApipieGenerator};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Options of the generate command.
#[derive(Args, Debug, Default)]
pub struct GenerateArgs {
    /// Where to write the provider config
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Sweep cached names older than this many days
    #[arg(long)]
    pub max_age_days: Option<u64>,
}

impl GenerateArgs {
    /// Whether any option was given.
    pub fn is_set(&self) -> bool {
        self.output.is_some() || self.max_age_days.is_some()
    }
}

/// Run the catalog-to-config pipeline and write the result.
pub async fn handle_generate(mut config: Config, args: GenerateArgs) -> anyhow::Result<()> {
    if let Some(output) = args.output {
        config.output_path = Some(output);
    }
    if let Some(days) = args.max_age_days {
        config.max_cache_age_days = Some(days);
    }
    config.validate().context("Invalid configuration")?;

    let cache = open_cache(&config)?;

    let generator = ApipieGenerator::new(config.generator_config())
        .context("Error creating display name client")?;
    if !generator.has_credentials() {
        warn!("APIPIE_DISPLAY_NAME_API_KEY is not set; display names fall back to model ids");
    }

    let catalog = ApipieCatalog::new(
        config.catalog_url(),
        config.catalog_api_key.clone(),
        config.timeout(),
    )
    .context("Error creating catalog client")?;

    let notifier = GithubActionsNotifier::new(config.notify_user.clone());
    let namer = Namer::new(cache, Arc::new(generator), Arc::new(notifier));
    let pipeline = Pipeline::new(Arc::new(catalog), namer, config.max_cache_age());

    let report = pipeline
        .run()
        .await
        .context("Error fetching APIpie models")?;

    for line in &report.added {
        println!("{line}");
    }

    let output = config.output_path();
    report
        .config
        .write_to(&output)
        .await
        .with_context(|| format!("Error writing APIpie provider config to {}", output.display()))?;
    info!(path = %output.display(), models = report.config.models.len(), "Wrote provider config");

    println!("{}", report.summary());
    Ok(())
}
