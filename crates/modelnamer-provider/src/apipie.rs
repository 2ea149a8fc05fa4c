//! APIpie chat-completions client used for display-name generation.
//!
//! APIpie speaks the OpenAI chat format but authenticates with an
//! `x-api-key` header instead of a bearer token.

use crate::{GenerateOptions, NameGenerator, ProviderError, ProviderResult};
use async_trait::async_trait;
use modelnamer_util::TimingGuard;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Default chat-completions endpoint.
pub const DEFAULT_COMPLETIONS_URL: &str = "https://apipie.ai/v1/chat/completions";

/// Default model asked to write display names.
pub const DEFAULT_GENERATION_MODEL: &str = "claude-sonnet-4";

const PROVIDER_ID: &str = "apipie";

/// Settings for [`ApipieGenerator`].
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Full URL of the chat-completions endpoint.
    pub endpoint: String,
    /// Credential; `None` makes every request fail with a missing-key error.
    pub api_key: Option<String>,
    /// Model that writes the names.
    pub model: String,
    /// Client-side timeout for one request.
    pub timeout: Duration,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_COMPLETIONS_URL.to_string(),
            api_key: None,
            model: DEFAULT_GENERATION_MODEL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Chat-completions generator.
pub struct ApipieGenerator {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<HeaderValue>,
    model: String,
}

impl ApipieGenerator {
    /// Create a new generator.
    pub fn new(config: GeneratorConfig) -> ProviderResult<Self> {
        url::Url::parse(&config.endpoint)?;

        let api_key = match config.api_key.filter(|k| !k.is_empty()) {
            Some(key) => Some(
                HeaderValue::from_str(&key)
                    .map_err(|_| ProviderError::invalid_api_key(PROVIDER_ID))?,
            ),
            None => None,
        };

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::internal(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.endpoint,
            api_key,
            model: config.model,
        })
    }

    /// Whether a credential is configured.
    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some()
    }
}

/// OpenAI chat completion request.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    messages: Vec<ChatMessage<'a>>,
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// OpenAI chat completion response, reduced to what naming needs.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl NameGenerator for ApipieGenerator {
    async fn complete(
        &self,
        prompt: &str,
        options: &GenerateOptions,
    ) -> ProviderResult<Vec<String>> {
        let api_key = self
            .api_key
            .clone()
            .ok_or_else(|| ProviderError::missing_api_key(PROVIDER_ID))?;

        let request = ChatRequest {
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            model: &self.model,
            max_tokens: options.max_tokens,
            temperature: options.temperature,
        };

        let _timing = TimingGuard::generation(&self.model);
        debug!(model = %self.model, max_tokens = options.max_tokens, "Sending completion request");
        trace!(request = ?request, "Full request");

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "APIpie API error");
            return Err(ProviderError::api_error(status.as_u16(), error_text));
        }

        let body = response.text().await?;
        let parsed: ChatResponse = serde_json::from_str(&body)?;

        Ok(parsed
            .choices
            .into_iter()
            .map(|choice| choice.message.content.unwrap_or_default())
            .collect())
    }
}
