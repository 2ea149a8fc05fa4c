use super::{empty_choices_message, failure_message, prompt, validate_name, NameSource, Namer, Purpose};
use modelnamer_provider::{CatalogModel, GenerateOptions};
use tracing::debug;

impl Namer {
    /// Resolve the display name of one model.
    ///
    /// Never fails: when neither the cache nor the generator produce a name
    /// the model id is returned, and nothing is cached.
    pub async fn resolve_one(&self, model: &CatalogModel) -> String {
        for source in NameSource::ORDER {
            let name = match source {
                NameSource::Cache => self.cache.get(model).await,
                NameSource::Generator => self.generate_single(model).await,
            };
            if let Some(name) = name {
                debug!(model = %model.id, ?source, "Resolved display name");
                return name;
            }
        }

        debug!(model = %model.id, "Falling back to model id");
        model.id.clone()
    }

    /// Ask the generator for one name and cache it on success.
    ///
    /// Every failure is reported to the notifier and yields `None`.
    pub(super) async fn generate_single(&self, model: &CatalogModel) -> Option<String> {
        let prompt = prompt::single_prompt(model);
        let choices = match self
            .generator
            .complete(&prompt, &GenerateOptions::single())
            .await
        {
            Ok(choices) => choices,
            Err(e) => {
                debug!(model = %model.id, error = %e, "Display name generation failed");
                self.notifier.notify(&failure_message(&e, Purpose::Single));
                return None;
            }
        };

        let Some(first) = choices.first() else {
            self.notifier.notify(&empty_choices_message(Purpose::Single));
            return None;
        };

        match validate_name(first) {
            Some(name) => {
                self.remember(model, &name).await;
                Some(name)
            }
            None => {
                let shown = first.trim().trim_matches(|c| c == '"' || c == '\'');
                self.notifier.notify(&format!(
                    "APIpie returned invalid display name format: '{shown}'"
                ));
                None
            }
        }
    }
}
