//! APIpie clients for modelnamer.
//!
//! This crate provides the two external services the naming pipeline talks to:
//! - The detailed model catalog (`GET /v1/models/detailed`)
//! - The chat-completions endpoint used to generate display names
//!
//! Both sit behind traits so the naming core can be exercised with the
//! scripted implementations in [`mock`].

pub mod apipie;
pub mod catalog;
pub mod error;
pub mod mock;

pub use apipie::{ApipieGenerator, GeneratorConfig};
pub use catalog::{ApipieCatalog, CatalogModel, ModelsResponse, Pricing};
pub use error::{ProviderError, ProviderResult};

use async_trait::async_trait;

/// Options for a single completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateOptions {
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Temperature for sampling (0.0-1.0).
    pub temperature: f32,
}

impl GenerateOptions {
    /// Options for naming one model.
    pub fn single() -> Self {
        Self {
            max_tokens: 100,
            temperature: 0.1,
        }
    }

    /// Options for naming a group of same-id variants in one call.
    pub fn group() -> Self {
        Self {
            max_tokens: 300,
            temperature: 0.1,
        }
    }
}

/// A text-generation service that turns a prompt into ranked choices.
#[async_trait]
pub trait NameGenerator: Send + Sync {
    /// Send `prompt` as a single user message.
    ///
    /// Returns the text of every choice in the order the service ranked them.
    /// An empty list is a valid return value; interpreting it is up to the caller.
    async fn complete(&self, prompt: &str, options: &GenerateOptions)
        -> ProviderResult<Vec<String>>;
}

/// A source of raw catalog records.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch every model the vendor lists.
    async fn fetch_models(&self) -> ProviderResult<Vec<CatalogModel>>;
}
