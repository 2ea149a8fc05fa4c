//! Configuration for a generation run.
//!
//! Configuration is layered, later sources override earlier:
//! 1. Built-in defaults
//! 2. An optional JSON config file
//! 3. Environment variables (`APIPIE_*`, `MODELNAMER_*`)
//!
//! The binary applies command-line flags on top before calling [`Config::validate`].

use crate::cache::DEFAULT_MAX_AGE;
use crate::error::{ConfigError, CoreResult};
use modelnamer_provider::apipie::{DEFAULT_COMPLETIONS_URL, DEFAULT_GENERATION_MODEL};
use modelnamer_provider::catalog::DEFAULT_CATALOG_URL;
use modelnamer_provider::GeneratorConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default location of the name cache database.
pub const DEFAULT_CACHE_PATH: &str = "cmd/apipie/cache.db";

/// Default location of the generated provider config.
pub const DEFAULT_OUTPUT_PATH: &str = "internal/providers/configs/apipie.json";

/// Default timeout for each HTTP request, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Credential for display-name generation.
pub const ENV_DISPLAY_NAME_API_KEY: &str = "APIPIE_DISPLAY_NAME_API_KEY";
/// Optional credential for the catalog.
pub const ENV_CATALOG_API_KEY: &str = "APIPIE_API_KEY";
/// GitHub user mentioned in failure annotations.
pub const ENV_NOTIFY_USER: &str = "APIPIE_API_KEY_NOTIFY_USER";
pub const ENV_CACHE_PATH: &str = "MODELNAMER_CACHE_PATH";
pub const ENV_OUTPUT_PATH: &str = "MODELNAMER_OUTPUT_PATH";

/// Run configuration. Every field is optional; accessors supply defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path of the SQLite name cache.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_path: Option<PathBuf>,

    /// Path the provider config is written to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<PathBuf>,

    /// Detailed catalog endpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_url: Option<String>,

    /// Chat-completions endpoint used for naming.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completions_url: Option<String>,

    /// Model that generates the display names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_model: Option<String>,

    /// HTTP timeout in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Cached names older than this are swept at startup.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_cache_age_days: Option<u64>,

    /// GitHub user to mention in failure annotations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify_user: Option<String>,

    #[serde(skip_serializing)]
    pub display_name_api_key: Option<String>,

    #[serde(skip_serializing)]
    pub catalog_api_key: Option<String>,
}

impl Config {
    /// Load configuration from an optional file plus the process environment.
    ///
    /// A path that was given explicitly must exist.
    pub async fn load(path: Option<&Path>) -> CoreResult<Self> {
        let mut config = match path {
            Some(path) => Self::load_file(path).await?,
            None => Config::default(),
        };
        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Load configuration from a JSON file.
    pub async fn load_file(path: &Path) -> CoreResult<Self> {
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConfigError::NotFound {
                    path: path.display().to_string(),
                }
                .into());
            }
            Err(e) => return Err(e.into()),
        };
        Self::parse(&content, &path.display().to_string())
    }

    fn parse(content: &str, source: &str) -> CoreResult<Self> {
        serde_json::from_str(content).map_err(|e| {
            ConfigError::InvalidJson {
                path: source.to_string(),
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Override fields from environment variables read through `lookup`.
    ///
    /// Empty values are ignored.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = get(ENV_DISPLAY_NAME_API_KEY) {
            self.display_name_api_key = Some(key);
        }
        if let Some(key) = get(ENV_CATALOG_API_KEY) {
            self.catalog_api_key = Some(key);
        }
        if let Some(user) = get(ENV_NOTIFY_USER) {
            self.notify_user = Some(user);
        }
        if let Some(path) = get(ENV_CACHE_PATH) {
            self.cache_path = Some(PathBuf::from(path));
        }
        if let Some(path) = get(ENV_OUTPUT_PATH) {
            self.output_path = Some(PathBuf::from(path));
        }
    }

    /// Check URLs and numeric settings.
    pub fn validate(&self) -> CoreResult<()> {
        validate_url("catalog_url", &self.catalog_url())?;
        validate_url("completions_url", &self.completions_url())?;

        if self.generation_model().trim().is_empty() {
            return Err(ConfigError::validation("generation_model must not be empty").into());
        }
        if self.timeout_secs == Some(0) {
            return Err(ConfigError::validation("timeout_secs must be positive").into());
        }
        Ok(())
    }

    pub fn cache_path(&self) -> PathBuf {
        self.cache_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_PATH))
    }

    pub fn output_path(&self) -> PathBuf {
        self.output_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_PATH))
    }

    pub fn catalog_url(&self) -> String {
        self.catalog_url
            .clone()
            .unwrap_or_else(|| DEFAULT_CATALOG_URL.to_string())
    }

    pub fn completions_url(&self) -> String {
        self.completions_url
            .clone()
            .unwrap_or_else(|| DEFAULT_COMPLETIONS_URL.to_string())
    }

    pub fn generation_model(&self) -> String {
        self.generation_model
            .clone()
            .unwrap_or_else(|| DEFAULT_GENERATION_MODEL.to_string())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    pub fn max_cache_age(&self) -> Duration {
        self.max_cache_age_days
            .map(|days| Duration::from_secs(days.saturating_mul(24 * 60 * 60)))
            .unwrap_or(DEFAULT_MAX_AGE)
    }

    /// Settings for the naming client.
    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            endpoint: self.completions_url(),
            api_key: self.display_name_api_key.clone(),
            model: self.generation_model(),
            timeout: self.timeout(),
        }
    }
}

fn validate_url(field: &str, value: &str) -> CoreResult<()> {
    let url = url::Url::parse(value)
        .map_err(|e| ConfigError::validation(format!("{field} is not a valid URL ({e}): {value}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::validation(format!(
            "{field} must use http or https: {value}"
        ))
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.cache_path(), PathBuf::from("cmd/apipie/cache.db"));
        assert_eq!(
            config.output_path(),
            PathBuf::from("internal/providers/configs/apipie.json")
        );
        assert_eq!(config.catalog_url(), "https://apipie.ai/v1/models/detailed");
        assert_eq!(config.completions_url(), "https://apipie.ai/v1/chat/completions");
        assert_eq!(config.generation_model(), "claude-sonnet-4");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.max_cache_age(), Duration::from_secs(30 * 86_400));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn env_overrides_file_values() {
        let mut config = Config::parse(
            r#"{"cache_path": "from-file.db", "notify_user": "file-user"}"#,
            "<test>",
        )
        .unwrap();

        config.apply_env(env(&[
            ("APIPIE_DISPLAY_NAME_API_KEY", "sk-names"),
            ("APIPIE_API_KEY", "sk-catalog"),
            ("APIPIE_API_KEY_NOTIFY_USER", "octocat"),
            ("MODELNAMER_CACHE_PATH", "/tmp/env.db"),
        ]));

        assert_eq!(config.cache_path(), PathBuf::from("/tmp/env.db"));
        assert_eq!(config.notify_user.as_deref(), Some("octocat"));
        assert_eq!(config.catalog_api_key.as_deref(), Some("sk-catalog"));
        assert_eq!(config.generator_config().api_key.as_deref(), Some("sk-names"));
    }

    #[test]
    fn empty_env_values_are_ignored() {
        let mut config = Config::default();
        config.apply_env(env(&[("APIPIE_DISPLAY_NAME_API_KEY", "  "), ("MODELNAMER_OUTPUT_PATH", "")]));
        assert_eq!(config.display_name_api_key, None);
        assert_eq!(config.output_path(), PathBuf::from(DEFAULT_OUTPUT_PATH));
    }

    #[test]
    fn invalid_json_reports_source() {
        let err = Config::parse("{not json", "settings.json").unwrap_err();
        assert!(matches!(
            err,
            CoreError::Config(ConfigError::InvalidJson { ref path, .. }) if path == "settings.json"
        ));
    }

    #[test]
    fn invalid_urls_fail_validation() {
        let config = Config {
            catalog_url: Some("not a url".into()),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(CoreError::Config(ConfigError::Validation { .. }))
        ));

        let config = Config {
            completions_url: Some("ftp://apipie.ai/v1".into()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_timeout_fails_validation() {
        let config = Config {
            timeout_secs: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn secrets_are_not_serialized() {
        let config = Config {
            display_name_api_key: Some("sk-secret".into()),
            generation_model: Some("gpt-4o".into()),
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("sk-secret"));
        assert!(json.contains("gpt-4o"));
    }

    #[tokio::test]
    async fn load_file_reads_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("modelnamer.json");
        tokio::fs::write(&path, r#"{"max_cache_age_days": 7, "timeout_secs": 5}"#)
            .await
            .unwrap();

        let config = Config::load_file(&path).await.unwrap();
        assert_eq!(config.max_cache_age(), Duration::from_secs(7 * 86_400));
        assert_eq!(config.timeout(), Duration::from_secs(5));
    }

    #[tokio::test]
    async fn missing_explicit_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_file(&dir.path().join("absent.json")).await.unwrap_err();
        assert!(matches!(err, CoreError::Config(ConfigError::NotFound { .. })));
    }
}
