//! APIpie detailed catalog.
//!
//! This module fetches model records from <https://apipie.ai/v1/models/detailed>.
//! The same model id can appear several times, once per provider, route or
//! pool that serves it.

use crate::{CatalogSource, ProviderError, ProviderResult};
use async_trait::async_trait;
use modelnamer_util::TimingGuard;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default URL of the detailed catalog.
pub const DEFAULT_CATALOG_URL: &str = "https://apipie.ai/v1/models/detailed";

/// User agent for requests
const CLIENT_USER_AGENT: &str = concat!("modelnamer/", env!("CARGO_PKG_VERSION"));

/// Treat an explicit JSON `null` the same as an absent field.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One catalog record.
///
/// Every field except `id` may be missing; missing values decode to the empty
/// string, zero or an empty list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogModel {
    /// Model identifier. Not unique across the catalog.
    pub id: String,

    /// Base model string
    #[serde(default, deserialize_with = "nullable")]
    pub model: String,

    #[serde(default, deserialize_with = "nullable")]
    pub route: String,

    #[serde(default, deserialize_with = "nullable")]
    pub description: String,

    /// Context window in tokens
    #[serde(default, deserialize_with = "nullable")]
    pub max_tokens: i64,

    #[serde(default, deserialize_with = "nullable")]
    pub max_response_tokens: i64,

    /// Model kind, e.g. `llm`, `image`, `embedding`
    #[serde(rename = "type", default, deserialize_with = "nullable")]
    pub kind: String,

    #[serde(default, deserialize_with = "nullable")]
    pub subtype: String,

    #[serde(default, deserialize_with = "nullable")]
    pub provider: String,

    #[serde(default, deserialize_with = "nullable")]
    pub pool: String,

    #[serde(default, deserialize_with = "nullable")]
    pub instruct_type: String,

    #[serde(default, deserialize_with = "nullable")]
    pub quantization: String,

    /// `1` when enabled
    #[serde(default, deserialize_with = "nullable")]
    pub enabled: i64,

    /// `1` when available
    #[serde(default, deserialize_with = "nullable")]
    pub available: i64,

    #[serde(default, deserialize_with = "nullable")]
    pub input_modalities: Vec<String>,

    #[serde(default, deserialize_with = "nullable")]
    pub output_modalities: Vec<String>,

    #[serde(default, deserialize_with = "nullable")]
    pub pricing: Pricing,
}

impl CatalogModel {
    /// First line of the description, the part sent to the naming service.
    pub fn description_headline(&self) -> &str {
        self.description.split('\n').next().unwrap_or_default()
    }

    /// Enabled, available language model.
    pub fn is_text_model(&self) -> bool {
        self.enabled == 1 && self.available == 1 && self.kind == "llm"
    }
}

/// The two pricing sources the catalog carries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pricing {
    #[serde(default, deserialize_with = "nullable")]
    pub confirmed: ConfirmedPricing,
    #[serde(default, deserialize_with = "nullable")]
    pub advertised: AdvertisedPricing,
}

/// Measured per-token cost, decimal strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfirmedPricing {
    #[serde(default, deserialize_with = "nullable")]
    pub input_cost: String,
    #[serde(default, deserialize_with = "nullable")]
    pub output_cost: String,
}

/// Vendor-advertised per-token cost, decimal strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdvertisedPricing {
    #[serde(default, deserialize_with = "nullable")]
    pub input_cost_per_token: String,
    #[serde(default, deserialize_with = "nullable")]
    pub output_cost_per_token: String,
}

/// Response envelope of the catalog endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelsResponse {
    #[serde(default, deserialize_with = "nullable")]
    pub object: String,
    #[serde(default, deserialize_with = "nullable")]
    pub data: Vec<CatalogModel>,
}

/// HTTP client for the detailed catalog.
pub struct ApipieCatalog {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

impl ApipieCatalog {
    /// Create a catalog client.
    ///
    /// `api_key` is optional; the endpoint is public but returns more when authenticated.
    pub fn new(
        url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> ProviderResult<Self> {
        let url = url.into();
        url::Url::parse(&url)?;

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::internal(e.to_string()))?;

        Ok(Self {
            client,
            url,
            api_key: api_key.filter(|k| !k.is_empty()),
        })
    }
}

#[async_trait]
impl CatalogSource for ApipieCatalog {
    async fn fetch_models(&self) -> ProviderResult<Vec<CatalogModel>> {
        let _timing = TimingGuard::fetch(&self.url);

        let mut request = self.client.get(&self.url);
        if let Some(key) = &self.api_key {
            let value = HeaderValue::from_str(key)
                .map_err(|_| ProviderError::invalid_api_key("apipie"))?;
            request = request.header("x-api-key", value);
        }

        debug!(url = %self.url, authenticated = self.api_key.is_some(), "Fetching catalog");
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, "Catalog request failed");
            return Err(ProviderError::api_error(status.as_u16(), body));
        }

        let text = response.text().await?;
        let parsed: ModelsResponse = serde_json::from_str(&text)?;

        info!(count = parsed.data.len(), "Fetched catalog");
        Ok(parsed.data)
    }
}
