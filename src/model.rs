use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

/// The upstream document: `"<provider>/<model-name>"` mapped to a record.
///
/// Backed by `serde_json`'s insertion-ordered map so processing follows the
/// order the feed was written in.
pub type RawModelFeed = Map<String, Value>;

/// A record as it arrives from the upstream feed.
///
/// Normalization produces the same shape with the two token costs rescaled,
/// so both sides of the pipeline share [`ModelData`].
pub type RawModelRecord = ModelData;

/// Metadata for a single model.
///
/// Every field is optional. A value of the wrong JSON type is read as absent
/// rather than rejecting the whole record; fields this struct does not name
/// are kept in `extra` and written back out unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelData {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,

    #[serde(default, deserialize_with = "lenient_cost", skip_serializing_if = "Option::is_none")]
    pub input_cost_per_token: Option<f64>,
    #[serde(default, deserialize_with = "lenient_cost", skip_serializing_if = "Option::is_none")]
    pub output_cost_per_token: Option<f64>,
    #[serde(default, deserialize_with = "lenient_cost", skip_serializing_if = "Option::is_none")]
    pub input_cost_per_image: Option<f64>,
    #[serde(default, deserialize_with = "lenient_cost", skip_serializing_if = "Option::is_none")]
    pub output_cost_per_image: Option<f64>,
    #[serde(default, deserialize_with = "lenient_cost", skip_serializing_if = "Option::is_none")]
    pub input_cost_per_second: Option<f64>,
    #[serde(default, deserialize_with = "lenient_cost", skip_serializing_if = "Option::is_none")]
    pub output_cost_per_second: Option<f64>,
    #[serde(default, deserialize_with = "lenient_cost", skip_serializing_if = "Option::is_none")]
    pub ocr_cost_per_page: Option<f64>,

    #[serde(default, deserialize_with = "lenient_count", skip_serializing_if = "Option::is_none")]
    pub max_input_tokens: Option<u64>,
    #[serde(default, deserialize_with = "lenient_count", skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u64>,
    #[serde(default, deserialize_with = "lenient_count", skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u64>,
    #[serde(default, deserialize_with = "lenient_count", skip_serializing_if = "Option::is_none")]
    pub max_query_tokens: Option<u64>,
    #[serde(default, deserialize_with = "lenient_count", skip_serializing_if = "Option::is_none")]
    pub context_length: Option<u64>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub supports_function_calling: Option<bool>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub supports_vision: Option<bool>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub supports_reasoning: Option<bool>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub supports_web_search: Option<bool>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub supports_audio_input: Option<bool>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub supports_audio_output: Option<bool>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub supports_tool_choice: Option<bool>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub supports_response_schema: Option<bool>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub supports_parallel_function_calling: Option<bool>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub supports_prompt_caching: Option<bool>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub supports_system_messages: Option<bool>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub supported_modalities: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub supported_output_modalities: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub supported_endpoints: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub modes: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub supported_modes: Option<Vec<String>>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub deprecation_date: Option<String>,

    /// Fields the feed carries that are not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ModelData {
    /// The mode string, or `""` when the record has none.
    pub fn mode_str(&self) -> &str {
        self.mode.as_deref().unwrap_or("")
    }

    /// The seven price dimensions in display priority order.
    pub fn cost_fields(&self) -> [Option<f64>; 7] {
        [
            self.input_cost_per_token,
            self.output_cost_per_token,
            self.input_cost_per_image,
            self.output_cost_per_image,
            self.input_cost_per_second,
            self.output_cost_per_second,
            self.ocr_cost_per_page,
        ]
    }

    /// True when any price dimension is present.
    pub fn has_pricing(&self) -> bool {
        self.cost_fields().iter().any(Option::is_some)
    }

    /// Whether the record carries a positive value for `capability`.
    pub fn supports(&self, capability: Capability) -> bool {
        let flag = match capability {
            Capability::FunctionCalling => self.supports_function_calling,
            Capability::Vision => self.supports_vision,
            Capability::Reasoning => self.supports_reasoning,
            Capability::WebSearch => self.supports_web_search,
            Capability::AudioInput => self.supports_audio_input,
            Capability::AudioOutput => self.supports_audio_output,
            Capability::ToolChoice => self.supports_tool_choice,
            Capability::ResponseSchema => self.supports_response_schema,
            Capability::ParallelFunctionCalling => self.supports_parallel_function_calling,
            Capability::PromptCaching => self.supports_prompt_caching,
            Capability::SystemMessages => self.supports_system_messages,
        };
        flag.unwrap_or(false)
    }

    /// Capabilities this model supports, in [`Capability::ALL`] order.
    pub fn capabilities(&self) -> Vec<Capability> {
        Capability::ALL
            .into_iter()
            .filter(|cap| self.supports(*cap))
            .collect()
    }
}

/// A normalized, display-ready model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedModel {
    /// The composite key from the feed, e.g. `openai/gpt-4`.
    pub id: String,
    /// Segment after the last `/` of `id`.
    pub name: String,
    pub provider: String,
    /// URL-safe form of `name`; unique only together with `provider`.
    pub slug: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
    pub data: ModelData,
}

impl ProcessedModel {
    pub fn mode(&self) -> &str {
        self.data.mode_str()
    }
}

/// Boolean capability flags a record may advertise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    FunctionCalling,
    Vision,
    Reasoning,
    WebSearch,
    AudioInput,
    AudioOutput,
    ToolChoice,
    ResponseSchema,
    ParallelFunctionCalling,
    PromptCaching,
    SystemMessages,
}

impl Capability {
    pub const ALL: [Capability; 11] = [
        Capability::FunctionCalling,
        Capability::Vision,
        Capability::Reasoning,
        Capability::WebSearch,
        Capability::AudioInput,
        Capability::AudioOutput,
        Capability::ToolChoice,
        Capability::ResponseSchema,
        Capability::ParallelFunctionCalling,
        Capability::PromptCaching,
        Capability::SystemMessages,
    ];

    /// Title-case label used in comparison tables.
    pub fn label(&self) -> &'static str {
        match self {
            Capability::FunctionCalling => "Function Calling",
            Capability::Vision => "Vision",
            Capability::Reasoning => "Reasoning",
            Capability::WebSearch => "Web Search",
            Capability::AudioInput => "Audio Input",
            Capability::AudioOutput => "Audio Output",
            Capability::ToolChoice => "Tool Choice",
            Capability::ResponseSchema => "Response Schema",
            Capability::ParallelFunctionCalling => "Parallel Function Calling",
            Capability::PromptCaching => "Prompt Caching",
            Capability::SystemMessages => "System Messages",
        }
    }
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn lenient_cost<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_f64().filter(|v| !v.is_nan()))
}

// Token limits occasionally arrive as floats (`8192.0`); anything negative or
// non-finite is treated as missing.
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value.as_u64() {
        Some(n) => Some(n),
        None => value
            .as_f64()
            .filter(|v| v.is_finite() && *v >= 0.0)
            .map(|v| v as u64),
    })
}
