//! Scripted generator and catalog for testing.

use crate::{
    CatalogModel, CatalogSource, GenerateOptions, NameGenerator, ProviderError, ProviderResult,
};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

/// A scripted generator response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return a single choice with this text.
    Text(String),
    /// Return these choices verbatim (possibly none).
    Choices(Vec<String>),
    /// Fail as if no credential were configured.
    MissingApiKey,
    /// Fail with a non-success HTTP status.
    Status(u16, String),
    /// Fail with an internal error.
    Error(String),
}

/// Mock generator for testing.
///
/// Responses are consumed in order. Once the script is exhausted every call
/// fails with a missing-key error, which models an unreachable service.
#[derive(Clone, Default)]
pub struct MockGenerator {
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

impl MockGenerator {
    /// Create a mock with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock that answers once with `text`.
    pub fn with_text_response(text: impl Into<String>) -> Self {
        let generator = Self::new();
        generator.expect_text(text);
        generator
    }

    /// Create a mock that never succeeds.
    pub fn unavailable() -> Self {
        Self::new()
    }

    /// Queue a text response.
    pub fn expect_text(&self, text: impl Into<String>) {
        self.expect(MockResponse::Text(text.into()));
    }

    /// Queue an arbitrary response.
    pub fn expect(&self, response: MockResponse) {
        lock(&self.responses).push_back(response);
    }

    /// Get the number of times complete was called.
    pub fn call_count(&self) -> usize {
        lock(&self.prompts).len()
    }

    /// Every prompt received so far.
    pub fn prompts(&self) -> Vec<String> {
        lock(&self.prompts).clone()
    }
}

#[async_trait]
impl NameGenerator for MockGenerator {
    async fn complete(
        &self,
        prompt: &str,
        _options: &GenerateOptions,
    ) -> ProviderResult<Vec<String>> {
        lock(&self.prompts).push(prompt.to_string());

        let next = lock(&self.responses).pop_front();
        match next {
            Some(MockResponse::Text(text)) => Ok(vec![text]),
            Some(MockResponse::Choices(choices)) => Ok(choices),
            Some(MockResponse::Status(status, body)) => Err(ProviderError::api_error(status, body)),
            Some(MockResponse::Error(message)) => Err(ProviderError::internal(message)),
            Some(MockResponse::MissingApiKey) | None => Err(ProviderError::missing_api_key("mock")),
        }
    }
}

/// A catalog that returns a fixed list, or fails when built with [`StaticCatalog::failing`].
pub struct StaticCatalog {
    models: Option<Vec<CatalogModel>>,
}

impl StaticCatalog {
    pub fn new(models: Vec<CatalogModel>) -> Self {
        Self {
            models: Some(models),
        }
    }

    pub fn failing() -> Self {
        Self { models: None }
    }
}

#[async_trait]
impl CatalogSource for StaticCatalog {
    async fn fetch_models(&self) -> ProviderResult<Vec<CatalogModel>> {
        self.models
            .clone()
            .ok_or_else(|| ProviderError::api_error(500, "catalog unavailable"))
    }
}
