//! Display-name resolution.
//!
//! Names come from an ordered list of [`NameSource`]s tried in sequence; the
//! first source that yields a name wins and the raw model id is the final
//! fallback. Only names produced by the generator are written to the cache.
//!
//! Models sharing an id are resolved together so the generator can give each
//! variant a distinguishing name in one request.

mod group;
pub mod parse;
pub mod prompt;
mod single;

use crate::cache::DisplayNameCache;
use crate::fingerprint::cache_key;
use crate::notify::Notifier;
use modelnamer_provider::{CatalogModel, NameGenerator, ProviderError};
use modelnamer_storage::CacheKey;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Longest accepted display name, in characters.
pub const MAX_NAME_CHARS: usize = 60;

/// Where a resolved name came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameSource {
    /// A previously generated name found in the cache.
    Cache,
    /// A freshly generated name.
    Generator,
}

impl NameSource {
    /// Sources in the order they are consulted.
    pub const ORDER: [NameSource; 2] = [NameSource::Cache, NameSource::Generator];
}

/// Clean up a generated name and check that it is usable.
///
/// Surrounding whitespace and quote characters are stripped. The result must
/// be 1 to 60 characters long and fit on one line.
pub fn validate_name(raw: &str) -> Option<String> {
    let name = raw.trim().trim_matches(|c| c == '"' || c == '\'');
    let len = name.chars().count();
    if len == 0 || len > MAX_NAME_CHARS || name.contains(['\n', '\r']) {
        return None;
    }
    Some(name.to_string())
}

/// What a generation request was for, used in failure reports.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Purpose {
    Single,
    Group,
}

impl Purpose {
    fn label(self) -> &'static str {
        match self {
            Purpose::Single => "display name generation",
            Purpose::Group => "group display name generation",
        }
    }
}

/// Operator-facing description of a failed generation request.
pub(crate) fn failure_message(error: &ProviderError, purpose: Purpose) -> String {
    let label = purpose.label();
    match error {
        ProviderError::MissingApiKey(_) | ProviderError::InvalidApiKey(_) => {
            format!("APIpie API key missing or invalid for {label}")
        }
        ProviderError::RequestFailed(e) if e.is_timeout() => {
            format!("APIpie API request failed for {label} - timeout")
        }
        ProviderError::RequestFailed(_) => {
            format!("APIpie API request failed for {label} - network error")
        }
        ProviderError::ApiError { status, message } => {
            format!("APIpie API returned status {status} for {label}: {message}")
        }
        ProviderError::Json(_) => {
            format!("Failed to decode APIpie response for {label}")
        }
        other => format!("APIpie API request failed for {label}: {other}"),
    }
}

/// Message for a successful response that carried no choices.
pub(crate) fn empty_choices_message(purpose: Purpose) -> String {
    format!("APIpie returned empty choices for {}", purpose.label())
}

/// Resolves display names with cache, generator and id fallback.
#[derive(Clone)]
pub struct Namer {
    cache: DisplayNameCache,
    generator: Arc<dyn NameGenerator>,
    notifier: Arc<dyn Notifier>,
}

impl Namer {
    pub fn new(
        cache: DisplayNameCache,
        generator: Arc<dyn NameGenerator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            cache,
            generator,
            notifier,
        }
    }

    pub fn cache(&self) -> &DisplayNameCache {
        &self.cache
    }

    /// Resolve a name for every model, keyed by cache key.
    ///
    /// Models are grouped by id in first-seen order. Single-member groups go
    /// through [`Namer::resolve_one`], larger ones through [`Namer::resolve_group`].
    pub async fn resolve_all(&self, models: &[CatalogModel]) -> HashMap<CacheKey, String> {
        let groups = group_by_id(models);
        debug!(models = models.len(), groups = groups.len(), "Resolving display names");

        let mut names = HashMap::with_capacity(models.len());
        for group in groups {
            match group.as_slice() {
                [model] => {
                    let name = self.resolve_one(model).await;
                    names.insert(cache_key(model), name);
                }
                members => {
                    info!(model = %members[0].id, variants = members.len(), "Processing model variants");
                    names.extend(self.resolve_group(members).await);
                }
            }
        }
        names
    }

    /// Write a generated name through to the cache. Failures are logged only.
    async fn remember(&self, model: &CatalogModel, name: &str) {
        match self.cache.set(model, name).await {
            Ok(()) => info!(model = %model.id, name, "Cached LLM-generated name"),
            Err(e) => warn!(model = %model.id, error = %e, "Failed to cache display name"),
        }
    }
}

/// Split models into same-id groups, keeping first-seen order of ids and of
/// members within each group.
fn group_by_id(models: &[CatalogModel]) -> Vec<Vec<CatalogModel>> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<Vec<CatalogModel>> = Vec::new();

    for model in models {
        match index.get(model.id.as_str()) {
            Some(&i) => groups[i].push(model.clone()),
            None => {
                index.insert(model.id.as_str(), groups.len());
                groups.push(vec![model.clone()]);
            }
        }
    }
    groups
}
