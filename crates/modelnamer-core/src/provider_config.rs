//! The provider config written at the end of a run.
//!
//! Field names follow the provider-config JSON format consumed downstream
//! (`cost_per_1m_in`, `supports_attachments`, ...).

use crate::error::CoreResult;
use crate::pricing::TokenPrices;
use modelnamer_provider::CatalogModel;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::io::AsyncWriteExt;

/// Context window assumed when neither the catalog nor the id table help.
pub const DEFAULT_CONTEXT_WINDOW: i64 = 32_768;

/// Response budget assumed when the catalog gives no limits at all.
pub const DEFAULT_MAX_TOKENS: i64 = 4_096;

/// Id substrings checked in order when the catalog has no context size.
const CONTEXT_WINDOW_TABLE: &[(&str, i64)] = &[
    ("gpt-4o", 128_000),
    ("gpt-4", 8_192),
    ("gpt-3.5", 16_385),
    ("claude", 200_000),
    ("gemini", 32_768),
    ("llama", 128_000),
];

/// Top-level provider record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub name: String,
    pub id: String,
    pub api_key: String,
    pub api_endpoint: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub default_large_model_id: String,
    pub default_small_model_id: String,
    pub models: Vec<ModelRecord>,
}

impl ProviderConfig {
    /// The APIpie provider with no models yet.
    pub fn apipie() -> Self {
        Self {
            name: "APIpie".to_string(),
            id: "apipie".to_string(),
            api_key: "$APIPIE_API_KEY".to_string(),
            api_endpoint: "https://apipie.ai/v1".to_string(),
            kind: "openai".to_string(),
            default_large_model_id: "claude-sonnet-4".to_string(),
            default_small_model_id: "claude-3-5-haiku".to_string(),
            models: Vec::new(),
        }
    }

    /// Sort models by display name, byte-wise and stable.
    pub fn sort_models(&mut self) {
        self.models.sort_by(|a, b| a.name.cmp(&b.name));
    }

    /// Write as indented JSON, creating parent directories.
    ///
    /// On Unix a newly created file is readable by the owner only.
    pub async fn write_to(&self, path: &Path) -> CoreResult<()> {
        let data = serde_json::to_vec_pretty(self)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut options = tokio::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(0o600);

        let mut file = options.open(path).await?;
        file.write_all(&data).await?;
        file.flush().await?;
        Ok(())
    }
}

/// One model entry of the provider config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelRecord {
    pub id: String,
    pub name: String,
    pub cost_per_1m_in: f64,
    pub cost_per_1m_out: f64,
    pub cost_per_1m_in_cached: f64,
    pub cost_per_1m_out_cached: f64,
    pub context_window: i64,
    pub default_max_tokens: i64,
    pub can_reason: bool,
    pub has_reasoning_efforts: bool,
    pub supports_attachments: bool,
}

impl ModelRecord {
    /// Build the record for `model` under its resolved display name.
    pub fn from_catalog(model: &CatalogModel, name: impl Into<String>) -> Self {
        let prices = TokenPrices::for_model(model);
        Self {
            id: model.id.clone(),
            name: name.into(),
            cost_per_1m_in: prices.per_million_in(),
            cost_per_1m_out: prices.per_million_out(),
            cost_per_1m_in_cached: prices.per_million_in_cached(),
            cost_per_1m_out_cached: prices.per_million_out_cached(),
            context_window: context_window(model),
            default_max_tokens: default_max_tokens(model),
            can_reason: false,
            has_reasoning_efforts: false,
            supports_attachments: supports_images(model),
        }
    }
}

/// Whether the model accepts image input.
pub fn supports_images(model: &CatalogModel) -> bool {
    let description = model.description.to_lowercase();
    model.input_modalities.iter().any(|m| m == "image")
        || model.subtype.contains("multimodal")
        || model.subtype.contains("vision")
        || description.contains("vision")
        || description.contains("image")
}

/// Context window in tokens, guessed from the id when the catalog has none.
pub fn context_window(model: &CatalogModel) -> i64 {
    if model.max_tokens > 0 {
        return model.max_tokens;
    }
    let id = model.id.to_lowercase();
    CONTEXT_WINDOW_TABLE
        .iter()
        .find(|(needle, _)| id.contains(*needle))
        .map_or(DEFAULT_CONTEXT_WINDOW, |&(_, window)| window)
}

/// Default response budget.
pub fn default_max_tokens(model: &CatalogModel) -> i64 {
    if model.max_response_tokens > 0 {
        model.max_response_tokens
    } else if model.max_tokens > 0 {
        model.max_tokens / 4
    } else {
        DEFAULT_MAX_TOKENS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(id: &str) -> CatalogModel {
        CatalogModel {
            id: id.into(),
            ..Default::default()
        }
    }

    #[test]
    fn context_window_prefers_catalog_value() {
        let mut m = model("gpt-4o");
        m.max_tokens = 1_000;
        assert_eq!(context_window(&m), 1_000);
    }

    #[test]
    fn context_window_table_is_checked_in_order() {
        assert_eq!(context_window(&model("GPT-4o-mini")), 128_000);
        assert_eq!(context_window(&model("gpt-4-turbo")), 8_192);
        assert_eq!(context_window(&model("gpt-3.5-turbo")), 16_385);
        assert_eq!(context_window(&model("claude-3-5-haiku")), 200_000);
        assert_eq!(context_window(&model("gemini-pro")), 32_768);
        assert_eq!(context_window(&model("Meta-Llama-3.1-70B")), 128_000);
        assert_eq!(context_window(&model("mistral-large")), DEFAULT_CONTEXT_WINDOW);
    }

    #[test]
    fn default_max_tokens_chain() {
        let mut m = model("x");
        assert_eq!(default_max_tokens(&m), 4_096);
        m.max_tokens = 8_192;
        assert_eq!(default_max_tokens(&m), 2_048);
        m.max_response_tokens = 1_000;
        assert_eq!(default_max_tokens(&m), 1_000);
    }

    #[test]
    fn image_support_signals() {
        assert!(!supports_images(&model("plain")));

        let mut m = model("a");
        m.input_modalities = vec!["text".into(), "image".into()];
        assert!(supports_images(&m));

        let mut m = model("b");
        m.subtype = "multimodal".into();
        assert!(supports_images(&m));

        let mut m = model("c");
        m.subtype = "chat-vision".into();
        assert!(supports_images(&m));

        let mut m = model("d");
        m.description = "Understands IMAGES and text".into();
        assert!(supports_images(&m));
    }

    #[test]
    fn record_carries_prices_and_heuristics() {
        let mut m = model("claude-3-5-sonnet");
        m.pricing.confirmed.input_cost = "0.000003".into();
        m.pricing.confirmed.output_cost = "0.000015".into();

        let record = ModelRecord::from_catalog(&m, "Claude 3.5 Sonnet");

        assert_eq!(record.name, "Claude 3.5 Sonnet");
        assert!((record.cost_per_1m_in - 3.0).abs() < 1e-9);
        assert!((record.cost_per_1m_in_cached - 1.5).abs() < 1e-9);
        assert!((record.cost_per_1m_out_cached - 3.75).abs() < 1e-9);
        assert_eq!(record.context_window, 200_000);
        assert_eq!(record.default_max_tokens, 4_096);
        assert!(!record.can_reason);
    }

    #[test]
    fn sort_is_ordinal_and_stable() {
        let mut config = ProviderConfig::apipie();
        for (id, name) in [("1", "b"), ("2", "B"), ("3", "a"), ("4", "B")] {
            config.models.push(ModelRecord::from_catalog(&model(id), name));
        }
        config.sort_models();

        let order: Vec<&str> = config.models.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(order, vec!["2", "4", "3", "1"]);
    }

    #[test]
    fn serializes_with_provider_config_field_names() {
        let config = ProviderConfig::apipie();
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["type"], "openai");
        assert_eq!(json["api_key"], "$APIPIE_API_KEY");
        assert_eq!(json["default_large_model_id"], "claude-sonnet-4");

        let record = ModelRecord::from_catalog(&model("x"), "X");
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("cost_per_1m_in").is_some());
        assert!(json.get("supports_attachments").is_some());
    }

    #[tokio::test]
    async fn write_to_creates_parents_and_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("configs").join("apipie.json");
        let mut config = ProviderConfig::apipie();
        config.models.push(ModelRecord::from_catalog(&model("gpt-4"), "GPT-4"));

        config.write_to(&path).await.unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("{\n  \"name\": \"APIpie\""));
        let back: ProviderConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(back, config);

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }
}
