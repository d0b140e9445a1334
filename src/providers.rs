use crate::format::capitalize;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Display name and logo asset for a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderMetadata {
    pub display_name: String,
    pub logo: String,
}

const PROVIDER_METADATA: &[(&str, &str, &str)] = &[
    ("anthropic", "Anthropic", "anthropic.svg"),
    ("openai", "OpenAI", "openai.svg"),
    ("gemini", "Google Gemini", "google.svg"),
    ("azure", "Azure", "azure.svg"),
    ("azure_ai", "Azure AI", "azure.svg"),
    ("bedrock", "AWS Bedrock", "bedrock.svg"),
    ("bedrock_converse", "AWS Bedrock", "bedrock.svg"),
    ("vertex_ai", "Google Vertex AI", "vertex.svg"),
    ("together_ai", "Together AI", "together.svg"),
    ("fireworks_ai", "Fireworks AI", "fireworks.svg"),
    ("replicate", "Replicate", "replicate.svg"),
    ("groq", "Groq", "groq.svg"),
    ("deepseek", "DeepSeek", "deepseek.svg"),
    ("cohere", "Cohere", "cohere.svg"),
    ("mistral", "Mistral AI", "mistral.svg"),
    ("perplexity", "Perplexity", "perplexity.svg"),
    ("aws", "AWS", "aws.svg"),
    ("amazon_nova", "Amazon Nova", "aws.svg"),
    ("cerebras", "Cerebras", "cerebras.svg"),
    ("elevenlabs", "ElevenLabs", "elevenlabs.svg"),
    ("google", "Google", "google.svg"),
    ("huggingface", "Hugging Face", "huggingface.svg"),
    ("litellm", "LiteLLM", "litellm.svg"),
    ("ollama", "Ollama", "ollama.svg"),
    ("openrouter", "OpenRouter", "openrouter.svg"),
    ("xai", "xAI", "xai.svg"),
];

/// Providers shown when no whitelist is configured explicitly.
pub const DEFAULT_WHITELIST: [&str; 10] = [
    "openai",
    "anthropic",
    "gemini",
    "azure",
    "vertex_ai",
    "together_ai",
    "groq",
    "cohere",
    "mistral",
    "perplexity",
];

/// `" Together-AI "` -> `"together_ai"`.
pub fn normalize_provider(provider: &str) -> String {
    provider
        .trim()
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

pub fn provider_metadata(provider: &str) -> ProviderMetadata {
    let normalized = normalize_provider(provider);
    match PROVIDER_METADATA.iter().find(|(id, _, _)| *id == normalized) {
        Some((_, display_name, logo)) => ProviderMetadata {
            display_name: display_name.to_string(),
            logo: logo.to_string(),
        },
        None => ProviderMetadata {
            display_name: fallback_display_name(provider),
            logo: "unknown.svg".to_string(),
        },
    }
}

pub fn provider_display_name(provider: &str) -> String {
    provider_metadata(provider).display_name
}

pub fn provider_logo(provider: &str) -> String {
    format!("/provider-logo/{}", provider_metadata(provider).logo)
}

// Title-cases on `_`/`-`/space boundaries and upper-cases every "ai".
fn fallback_display_name(provider: &str) -> String {
    let titled = provider
        .replace(&['_', '-'][..], " ")
        .split(' ')
        .map(|word| capitalize(&word.to_lowercase()))
        .collect::<Vec<_>>()
        .join(" ");

    let mut out = String::with_capacity(titled.len());
    let mut rest = titled.as_str();
    while let Some(pos) = rest.to_ascii_lowercase().find("ai") {
        out.push_str(&rest[..pos]);
        out.push_str("AI");
        rest = &rest[pos + 2..];
    }
    out.push_str(rest);
    out
}

/// The set of providers eligible for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderWhitelist {
    providers: HashSet<String>,
}

impl ProviderWhitelist {
    pub fn new<I, S>(providers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            providers: providers.into_iter().map(Into::into).collect(),
        }
    }

    /// Exact, case-sensitive membership.
    pub fn is_whitelisted(&self, provider: &str) -> bool {
        self.providers.contains(provider)
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl Default for ProviderWhitelist {
    fn default() -> Self {
        Self::new(DEFAULT_WHITELIST)
    }
}
