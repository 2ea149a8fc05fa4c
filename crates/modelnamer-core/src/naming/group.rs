use super::parse::{parse_response, ParsedLine};
use super::{empty_choices_message, failure_message, prompt, validate_name, Namer, Purpose};
use crate::fingerprint::cache_key;
use modelnamer_provider::{CatalogModel, GenerateOptions};
use modelnamer_storage::CacheKey;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};

impl Namer {
    /// Resolve names for models that share one id.
    ///
    /// Cached members are answered from the cache. The rest are named in a
    /// single generator request; members the response does not name validly
    /// fall back to their id and are not cached.
    pub async fn resolve_group(&self, models: &[CatalogModel]) -> HashMap<CacheKey, String> {
        let mut names = HashMap::with_capacity(models.len());
        let mut uncached = Vec::new();

        for model in models {
            match self.cache.get(model).await {
                Some(name) => {
                    names.insert(cache_key(model), name);
                }
                None => uncached.push(model),
            }
        }

        if uncached.is_empty() {
            debug!(members = models.len(), "All group members cached");
            return names;
        }

        // A lone uncached member gets the single-model prompt
        let generated: BTreeMap<usize, String> = match uncached.as_slice() {
            [only] => self
                .generate_single(only)
                .await
                .map(|name| (0, name))
                .into_iter()
                .collect(),
            members => self.generate_group(members).await,
        };

        for (&index, name) in &generated {
            names.insert(cache_key(uncached[index]), name.clone());
        }
        for model in &uncached {
            names
                .entry(cache_key(model))
                .or_insert_with(|| model.id.clone());
        }
        names
    }

    /// Name several uncached variants in one request.
    ///
    /// Returns accepted names by 0-based index into `members`, each already
    /// written through to the cache. Any request failure yields an empty map.
    async fn generate_group(&self, members: &[&CatalogModel]) -> BTreeMap<usize, String> {
        let prompt = prompt::group_prompt(members.iter().copied());
        let choices = match self
            .generator
            .complete(&prompt, &GenerateOptions::group())
            .await
        {
            Ok(choices) => choices,
            Err(e) => {
                debug!(members = members.len(), error = %e, "Group name generation failed");
                self.notifier.notify(&failure_message(&e, Purpose::Group));
                return BTreeMap::new();
            }
        };

        let Some(response) = choices.first() else {
            self.notifier.notify(&empty_choices_message(Purpose::Group));
            return BTreeMap::new();
        };

        let mut accepted = BTreeMap::new();
        for line in parse_response(response.trim()) {
            let ParsedLine::Matched { position, text } = line else {
                continue;
            };
            let index = position - 1;
            if index >= members.len() {
                debug!(position, members = members.len(), "Discarding out-of-range position");
                continue;
            }
            match validate_name(&text) {
                Some(name) => {
                    accepted.insert(index, name);
                }
                None => debug!(position, "Discarding invalid group name"),
            }
        }

        for (&index, name) in &accepted {
            self.remember(members[index], name).await;
        }

        info!(
            members = members.len(),
            named = accepted.len(),
            "Generated group display names"
        );
        accepted
    }
}
