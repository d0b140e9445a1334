//! Turns the raw upstream feed into [`ProcessedModel`]s.
//!
//! Records that cannot be identified, have no usable mode, or carry neither
//! pricing nor limits are dropped silently. Nothing in here returns an error
//! for bad data; the only failures happen while fetching the feed.

use crate::{
    error::CatalogError,
    model::{ModelData, ProcessedModel, RawModelFeed},
};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Values at or above this are assumed to be quoted per million tokens.
pub const PER_MILLION_THRESHOLD: f64 = 0.001;
const PER_MILLION: f64 = 1_000_000.0;

/// Name and slug derived from a composite `provider/name` key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub slug: String,
}

/// Splits `key` on `/` and keeps the last segment. `None` if that segment is
/// blank.
pub fn derive_identity(key: &str) -> Option<Identity> {
    let name = key.rsplit('/').next().unwrap_or(key);
    if name.trim().is_empty() {
        return None;
    }
    Some(Identity {
        name: name.to_string(),
        slug: slugify(name),
    })
}

/// `:` and `@` become `-`, then lowercase.
pub fn slugify(name: &str) -> String {
    name.replace(&[':', '@'][..], "-").to_lowercase()
}

/// Rescales a per-million-token price to per-token.
///
/// This cannot tell a genuinely expensive per-token price from a per-million
/// one; anything `>= 0.001` is divided by a million.
pub fn normalize_cost(value: Option<f64>) -> Option<f64> {
    let cost = value.filter(|v| !v.is_nan())?;
    if cost >= PER_MILLION_THRESHOLD {
        Some(cost / PER_MILLION)
    } else {
        Some(cost)
    }
}

/// True when a record has any price, or a positive input/output/context limit.
pub fn has_useful_data(data: &ModelData) -> bool {
    data.has_pricing()
        || data.max_input_tokens.is_some_and(|n| n > 0)
        || data.max_output_tokens.is_some_and(|n| n > 0)
        || data.context_length.is_some_and(|n| n > 0)
}

// Blank means whitespace-only, but the `na` markers must match exactly
// (ignoring case), so `" na "` is kept.
fn has_usable_mode(mode: Option<&str>) -> bool {
    match mode {
        None => false,
        Some(mode) if mode.trim().is_empty() => false,
        Some(mode) => !mode.eq_ignore_ascii_case("na") && !mode.eq_ignore_ascii_case("n/a"),
    }
}

/// Normalizes a single feed entry, or `None` if it should not be shown.
pub fn process_entry(
    key: &str,
    value: &serde_json::Value,
    whitelist: Option<&dyn Fn(&str) -> bool>,
) -> Option<ProcessedModel> {
    let Some(identity) = derive_identity(key) else {
        debug!("Skipping {key:?}: no model name");
        return None;
    };

    let mut data = match ModelData::deserialize(value) {
        Ok(data) => data,
        Err(e) => {
            debug!("Skipping {key}: not a record ({e})");
            return None;
        }
    };

    let provider = match data.provider.as_deref() {
        Some(provider) => provider.to_string(),
        None => key.split('/').next().unwrap_or_default().to_string(),
    };

    if let Some(allowed) = whitelist {
        if !allowed(&provider) {
            return None;
        }
    }

    if !has_usable_mode(data.mode.as_deref()) {
        debug!("Skipping {key}: missing mode");
        return None;
    }

    data.input_cost_per_token = normalize_cost(data.input_cost_per_token);
    data.output_cost_per_token = normalize_cost(data.output_cost_per_token);

    if !has_useful_data(&data) {
        debug!("Skipping {key}: no pricing or limits");
        return None;
    }

    Some(ProcessedModel {
        id: key.to_string(),
        display_name: identity.name.clone(),
        name: identity.name,
        provider,
        slug: identity.slug,
        data,
    })
}

/// Normalizes the whole feed, preserving its order.
pub fn process(feed: &RawModelFeed, whitelist: Option<&dyn Fn(&str) -> bool>) -> Vec<ProcessedModel> {
    feed.iter()
        .filter_map(|(key, value)| process_entry(key, value, whitelist))
        .collect()
}

/// Finds a model by slug, optionally restricted to a provider. Both
/// comparisons ignore case; the first match in list order wins.
pub fn find_by_slug<'a>(
    models: &'a [ProcessedModel],
    slug: &str,
    provider: Option<&str>,
) -> Result<&'a ProcessedModel, CatalogError> {
    let slug_lower = slug.to_lowercase();
    models
        .iter()
        .find(|m| {
            m.slug == slug_lower
                && provider.is_none_or(|p| m.provider.eq_ignore_ascii_case(p))
        })
        .ok_or_else(|| CatalogError::ModelNotFound {
            provider: provider.map(str::to_string),
            slug: slug.to_string(),
        })
}

pub fn find_by_id<'a>(models: &'a [ProcessedModel], id: &str) -> Option<&'a ProcessedModel> {
    models.iter().find(|m| m.id == id)
}

pub fn models_by_provider<'a>(models: &'a [ProcessedModel], provider: &str) -> Vec<&'a ProcessedModel> {
    models
        .iter()
        .filter(|m| m.provider.eq_ignore_ascii_case(provider))
        .collect()
}

/// Exact mode match.
pub fn models_by_mode<'a, I>(models: I, mode: &str) -> Vec<&'a ProcessedModel>
where
    I: IntoIterator<Item = &'a ProcessedModel>,
{
    models.into_iter().filter(|m| m.mode() == mode).collect()
}

/// Case-insensitive match on name or display name.
pub fn models_by_name<'a, I>(models: I, name: &str) -> Vec<&'a ProcessedModel>
where
    I: IntoIterator<Item = &'a ProcessedModel>,
{
    let name = name.to_lowercase();
    models
        .into_iter()
        .filter(|m| m.name.to_lowercase() == name || m.display_name.to_lowercase() == name)
        .collect()
}

/// Sorted, distinct providers of the given models.
pub fn all_providers<'a, I>(models: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a ProcessedModel>,
{
    models
        .into_iter()
        .filter(|m| !m.provider.is_empty())
        .map(|m| m.provider.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Sorted, distinct non-blank modes of the given models.
pub fn all_modes<'a, I>(models: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a ProcessedModel>,
{
    models
        .into_iter()
        .map(|m| m.mode())
        .filter(|mode| !mode.trim().is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Aggregate figures for one provider's listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderStats {
    pub provider: String,
    pub model_count: usize,
    pub modes: Vec<String>,
    /// Mean per-token input price over models that have one.
    pub avg_input_cost_per_token: Option<f64>,
    pub avg_output_cost_per_token: Option<f64>,
}

impl ProviderStats {
    pub fn compute(provider: &str, models: &[&ProcessedModel]) -> Self {
        Self {
            provider: provider.to_string(),
            model_count: models.len(),
            modes: all_modes(models.iter().copied()),
            avg_input_cost_per_token: mean(models.iter().map(|m| m.data.input_cost_per_token)),
            avg_output_cost_per_token: mean(models.iter().map(|m| m.data.output_cost_per_token)),
        }
    }
}

// Zero prices are left out, matching how the listing pages count "priced" models.
fn mean(values: impl Iterator<Item = Option<f64>>) -> Option<f64> {
    let priced: Vec<f64> = values.flatten().filter(|v| *v != 0.0).collect();
    if priced.is_empty() {
        None
    } else {
        Some(priced.iter().sum::<f64>() / priced.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn feed(value: serde_json::Value) -> RawModelFeed {
        match value {
            serde_json::Value::Object(map) => map,
            _ => panic!("feed fixture must be an object"),
        }
    }

    #[test]
    fn test_derive_identity() {
        let identity = derive_identity("openai/gpt-4").unwrap();
        assert_eq!(identity.name, "gpt-4");
        assert_eq!(identity.slug, "gpt-4");

        let nested = derive_identity("bedrock/us-east-1/Anthropic.Claude:v2@latest").unwrap();
        assert_eq!(nested.name, "Anthropic.Claude:v2@latest");
        assert_eq!(nested.slug, "anthropic.claude-v2-latest");

        let bare = derive_identity("gpt-4o").unwrap();
        assert_eq!(bare.name, "gpt-4o");

        assert!(derive_identity("openai/").is_none());
        assert!(derive_identity("openai/   ").is_none());
        assert!(derive_identity("").is_none());
    }

    #[test]
    fn test_slug_has_no_reserved_characters() {
        for key in ["a/B:C", "a/x@y:z", "p/MiXeD@Case"] {
            let slug = derive_identity(key).unwrap().slug;
            assert!(!slug.contains(':') && !slug.contains('@'));
            assert_eq!(slug, slug.to_lowercase());
        }
    }

    #[test]
    fn test_normalize_cost_boundary() {
        assert_eq!(normalize_cost(None), None);
        assert_eq!(normalize_cost(Some(f64::NAN)), None);
        assert_eq!(normalize_cost(Some(0.001)), Some(0.001 / 1_000_000.0));
        assert_eq!(normalize_cost(Some(30.0)), Some(30.0 / 1_000_000.0));
        assert_eq!(normalize_cost(Some(0.000999)), Some(0.000999));
        assert_eq!(normalize_cost(Some(0.00002)), Some(0.00002));
        assert_eq!(normalize_cost(Some(0.0)), Some(0.0));
    }

    #[test]
    fn test_gpt4_scenario() {
        let raw = feed(json!({
            "openai/gpt-4": {
                "provider": "openai",
                "mode": "chat",
                "input_cost_per_token": 30,
                "max_input_tokens": 8192
            }
        }));
        let models = process(&raw, None);
        assert_eq!(models.len(), 1);
        let model = &models[0];
        assert_eq!(model.id, "openai/gpt-4");
        assert_eq!(model.slug, "gpt-4");
        assert_eq!(model.display_name, "gpt-4");
        assert_eq!(model.provider, "openai");
        let cost = model.data.input_cost_per_token.unwrap();
        assert!((cost - 0.00003).abs() < 1e-15);
    }

    #[test]
    fn test_na_modes_are_dropped() {
        let raw = feed(json!({
            "acme/x": { "provider": "acme", "mode": "na", "max_input_tokens": 10 },
            "acme/y": { "provider": "acme", "mode": "N/A", "max_input_tokens": 10 },
            "acme/z": { "provider": "acme", "mode": "  ", "max_input_tokens": 10 },
            "acme/w": { "provider": "acme", "max_input_tokens": 10 }
        }));
        assert!(process(&raw, None).is_empty());
    }

    #[test]
    fn test_padded_na_mode_is_kept() {
        let raw = feed(json!({
            "acme/x": { "provider": "acme", "mode": " na ", "max_input_tokens": 10 }
        }));
        let models = process(&raw, None);
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].mode(), " na ");
    }

    #[test]
    fn test_completeness_filter() {
        let bare = json!({ "provider": "acme", "mode": "chat" });
        assert!(process(&feed(json!({ "acme/x": bare })), None).is_empty());

        let zero_limits = json!({
            "provider": "acme", "mode": "chat",
            "max_input_tokens": 0, "max_output_tokens": 0, "context_length": 0
        });
        assert!(process(&feed(json!({ "acme/x": zero_limits })), None).is_empty());

        let with_cost = json!({ "provider": "acme", "mode": "chat", "input_cost_per_token": 0.000001 });
        assert_eq!(process(&feed(json!({ "acme/x": with_cost })), None).len(), 1);

        let with_limit = json!({ "provider": "acme", "mode": "chat", "max_input_tokens": 4096 });
        assert_eq!(process(&feed(json!({ "acme/x": with_limit })), None).len(), 1);

        let with_context = json!({ "provider": "acme", "mode": "chat", "context_length": 4096 });
        assert_eq!(process(&feed(json!({ "acme/x": with_context })), None).len(), 1);

        let ocr_only = json!({ "provider": "acme", "mode": "ocr", "ocr_cost_per_page": 0.01 });
        assert_eq!(process(&feed(json!({ "acme/x": ocr_only })), None).len(), 1);
    }

    #[test]
    fn test_malformed_records_are_skipped() {
        let raw = feed(json!({
            "acme/list": [1, 2, 3],
            "acme/str": "oops",
            "acme/ok": { "provider": "acme", "mode": "chat", "max_tokens": 1, "max_output_tokens": 5 }
        }));
        let models = process(&raw, None);
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].id, "acme/ok");
    }

    #[test]
    fn test_whitelist_predicate() {
        let raw = feed(json!({
            "openai/gpt-4o": { "provider": "openai", "mode": "chat", "max_input_tokens": 128000 },
            "fireworks_ai/llama": { "provider": "fireworks_ai", "mode": "chat", "max_input_tokens": 8192 }
        }));
        let only_openai = |p: &str| p == "openai";
        let models = process(&raw, Some(&only_openai));
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].provider, "openai");

        assert_eq!(process(&raw, None).len(), 2);
    }

    #[test]
    fn test_missing_provider_uses_key_prefix() {
        let raw = feed(json!({
            "groq/llama-3": { "mode": "chat", "max_input_tokens": 8192 }
        }));
        let models = process(&raw, None);
        assert_eq!(models[0].provider, "groq");
    }

    #[test]
    fn test_process_is_idempotent_and_ordered() {
        let raw = feed(json!({
            "z/last": { "provider": "z", "mode": "chat", "max_input_tokens": 1 },
            "a/first": { "provider": "a", "mode": "chat", "max_input_tokens": 1 },
            "m/middle": { "provider": "m", "mode": "embedding", "input_cost_per_token": 0.1 }
        }));
        let first = process(&raw, None);
        let second = process(&raw, None);
        assert_eq!(first, second);
        let ids: Vec<&str> = first.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["z/last", "a/first", "m/middle"]);
    }

    #[test]
    fn test_only_token_costs_are_rescaled() {
        let raw = feed(json!({
            "openai/dall-e-3": {
                "provider": "openai",
                "mode": "image_generation",
                "output_cost_per_image": 0.04,
                "output_cost_per_token": 60
            }
        }));
        let model = &process(&raw, None)[0];
        assert_eq!(model.data.output_cost_per_image, Some(0.04));
        assert_eq!(model.data.output_cost_per_token, Some(60.0 / 1_000_000.0));
    }

    fn sample_models() -> Vec<ProcessedModel> {
        let raw = feed(json!({
            "openai/gpt-4o": { "provider": "openai", "mode": "chat", "input_cost_per_token": 2.5, "output_cost_per_token": 10 },
            "azure/gpt-4o": { "provider": "azure", "mode": "chat", "input_cost_per_token": 5 },
            "openai/text-embedding-3-small": { "provider": "openai", "mode": "embedding", "input_cost_per_token": 0.02 },
            "vertex_ai/gemini@001": { "provider": "vertex_ai", "mode": "chat", "max_input_tokens": 32000 }
        }));
        process(&raw, None)
    }

    #[test]
    fn test_find_by_slug_keys_on_provider() {
        let models = sample_models();
        let azure = find_by_slug(&models, "gpt-4o", Some("Azure")).unwrap();
        assert_eq!(azure.id, "azure/gpt-4o");

        let any = find_by_slug(&models, "GPT-4O", None).unwrap();
        assert_eq!(any.id, "openai/gpt-4o");

        let gemini = find_by_slug(&models, "gemini-001", Some("vertex_ai")).unwrap();
        assert_eq!(gemini.name, "gemini@001");

        let missing = find_by_slug(&models, "gpt-4o", Some("groq"));
        assert!(matches!(missing, Err(CatalogError::ModelNotFound { .. })));
    }

    #[test]
    fn test_listings() {
        let models = sample_models();
        assert_eq!(models_by_provider(&models, "OPENAI").len(), 2);
        assert_eq!(models_by_mode(&models, "embedding").len(), 1);
        assert_eq!(models_by_name(&models, "GPT-4o").len(), 2);
        assert_eq!(all_providers(&models), vec!["azure", "openai", "vertex_ai"]);
        assert_eq!(all_modes(&models), vec!["chat", "embedding"]);
        assert!(find_by_id(&models, "azure/gpt-4o").is_some());
        assert!(find_by_id(&models, "azure/gpt-5").is_none());
    }

    #[test]
    fn test_provider_stats() {
        let models = sample_models();
        let openai = models_by_provider(&models, "openai");
        let stats = ProviderStats::compute("openai", &openai);
        assert_eq!(stats.model_count, 2);
        assert_eq!(stats.modes, vec!["chat", "embedding"]);
        let avg_input = stats.avg_input_cost_per_token.unwrap();
        assert!((avg_input - (2.5e-6 + 0.02e-6) / 2.0).abs() < 1e-15);
        assert!((stats.avg_output_cost_per_token.unwrap() - 10e-6).abs() < 1e-15);

        let vertex = models_by_provider(&models, "vertex_ai");
        let stats = ProviderStats::compute("vertex_ai", &vertex);
        assert_eq!(stats.avg_input_cost_per_token, None);
    }
}
