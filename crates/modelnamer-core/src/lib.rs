//! Core naming logic for modelnamer.
//!
//! This crate provides:
//! - Metadata fingerprints and the display-name cache built on them
//! - Single and grouped display-name resolution with id fallback
//! - Price and context-window derivation for provider config records
//! - The catalog-to-config pipeline and its configuration

pub mod cache;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod naming;
pub mod notify;
pub mod pipeline;
pub mod pricing;
pub mod provider_config;

pub use cache::{DisplayNameCache, DEFAULT_MAX_AGE};
pub use config::Config;
pub use error::{ConfigError, CoreError, CoreResult};
pub use fingerprint::{cache_key, fingerprint, Fingerprint};
pub use naming::{validate_name, NameSource, Namer};
pub use notify::{GithubActionsNotifier, NoopNotifier, Notifier};
pub use pipeline::{Pipeline, RunReport};
pub use pricing::{PriceSource, TokenPrices};
pub use provider_config::{ModelRecord, ProviderConfig};
