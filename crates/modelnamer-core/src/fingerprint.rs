//! Metadata fingerprints.
//!
//! The catalog reuses one model id for provider-, route- and pool-specific
//! variants. A fingerprint hashes every field that can tell two such variants
//! apart, so `(id, fingerprint)` identifies one variant and changes whenever
//! its metadata changes.

use modelnamer_provider::CatalogModel;
use modelnamer_storage::CacheKey;
use sha2::{Digest, Sha256};
use std::fmt;

/// SHA-256 over a model's differentiating metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// Lowercase hex rendering, 64 characters.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// The exact text that is hashed, `|`-separated in a fixed field order.
fn canonical_metadata(model: &CatalogModel) -> String {
    format!(
        "{}|{}|{}|{}|{}|{}|{}|{}|{}|{}|{}",
        model.description,
        model.provider,
        model.route,
        model.pool,
        model.subtype,
        model.instruct_type,
        model.quantization,
        model.model,
        model.input_modalities.join(","),
        model.output_modalities.join(","),
        model.max_tokens,
    )
}

/// Compute the fingerprint of a model.
pub fn fingerprint(model: &CatalogModel) -> Fingerprint {
    let digest = Sha256::digest(canonical_metadata(model).as_bytes());
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&digest);
    Fingerprint(bytes)
}

/// The cache key of a model: its id plus its fingerprint.
pub fn cache_key(model: &CatalogModel) -> CacheKey {
    CacheKey::new(model.id.clone(), fingerprint(model).to_hex())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> CatalogModel {
        CatalogModel {
            id: "gpt-4".into(),
            model: "gpt-4-0613".into(),
            provider: "openai".into(),
            route: "openai".into(),
            pool: "".into(),
            subtype: "chat".into(),
            instruct_type: "".into(),
            quantization: "".into(),
            description: "GPT-4 by OpenAI".into(),
            input_modalities: vec!["text".into()],
            output_modalities: vec!["text".into()],
            max_tokens: 8192,
            ..Default::default()
        }
    }

    #[test]
    fn identical_metadata_hashes_identically() {
        let mut other = base();
        // Fields outside the fingerprint do not matter
        other.enabled = 1;
        other.max_response_tokens = 1234;
        other.pricing.confirmed.input_cost = "0.1".into();

        assert_eq!(fingerprint(&base()), fingerprint(&other));
        assert_eq!(cache_key(&base()), cache_key(&other));
    }

    fn mutate(field: &str, m: &mut CatalogModel) {
        match field {
            "description" => m.description.push('!'),
            "provider" => m.provider = "azure".into(),
            "route" => m.route = "azure".into(),
            "pool" => m.pool = "shared".into(),
            "subtype" => m.subtype = "vision".into(),
            "instruct_type" => m.instruct_type = "chatml".into(),
            "quantization" => m.quantization = "fp8".into(),
            "model" => m.model = "gpt-4-0314".into(),
            "input_modalities" => m.input_modalities.push("image".into()),
            "output_modalities" => m.output_modalities.push("audio".into()),
            "max_tokens" => m.max_tokens = 32768,
            other => panic!("unknown field {other}"),
        }
    }

    #[test]
    fn every_differentiating_field_changes_the_hash() {
        let fields = [
            "description",
            "provider",
            "route",
            "pool",
            "subtype",
            "instruct_type",
            "quantization",
            "model",
            "input_modalities",
            "output_modalities",
            "max_tokens",
        ];

        let original = fingerprint(&base());
        for field in fields {
            let mut changed = base();
            mutate(field, &mut changed);
            assert_ne!(original, fingerprint(&changed), "{field} did not change the hash");
        }
    }

    #[test]
    fn modality_order_and_grouping_matter() {
        let mut a = base();
        a.input_modalities = vec!["text".into(), "image".into()];
        let mut b = base();
        b.input_modalities = vec!["image".into(), "text".into()];
        assert_ne!(fingerprint(&a), fingerprint(&b));
    }

    #[test]
    fn absent_fields_hash_as_empty() {
        let sparse = CatalogModel {
            id: "x".into(),
            ..Default::default()
        };
        let canonical = canonical_metadata(&sparse);
        assert_eq!(canonical, "||||||||||0");
        assert_eq!(fingerprint(&sparse).to_hex().len(), 64);
    }

    #[test]
    fn cache_key_embeds_id_and_hex() {
        let key = cache_key(&base());
        assert_eq!(key.model_id, "gpt-4");
        assert_eq!(key.fingerprint, fingerprint(&base()).to_string());
        assert!(key.fingerprint.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn id_is_not_part_of_fingerprint() {
        let mut renamed = base();
        renamed.id = "gpt-4-alias".into();
        assert_eq!(fingerprint(&base()), fingerprint(&renamed));
        assert_ne!(cache_key(&base()), cache_key(&renamed));
    }
}
