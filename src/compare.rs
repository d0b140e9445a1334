//! Side-by-side comparison of two models.
//!
//! Comparison only makes sense within a [`ModeFamily`]; the selection state
//! below keeps the right-hand side inside the left model's family.

use crate::{
    format::{format_k, format_per_million, format_unit_cost, mode_display_name, round_half_up, MISSING},
    mode::ModeFamily,
    model::{Capability, ProcessedModel},
    providers::provider_display_name,
};
use serde::Serialize;
use std::cmp::Ordering;

const PER_MILLION: f64 = 1_000_000.0;

/// A headline price and how to print it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrimaryCost {
    pub value: Option<f64>,
    pub label: String,
    /// True when `value` is a per-token price.
    pub per_token: bool,
}

impl PrimaryCost {
    fn token(value: f64) -> Self {
        Self {
            value: Some(value),
            label: format_per_million(Some(value)),
            per_token: true,
        }
    }

    fn unit(value: f64, unit: &str) -> Self {
        Self {
            value: Some(value),
            label: format_unit_cost(Some(value), unit),
            per_token: false,
        }
    }

    fn missing() -> Self {
        Self {
            value: None,
            label: MISSING.to_string(),
            per_token: false,
        }
    }
}

/// First present of token, image, second, then OCR page price.
pub fn primary_input_cost(model: &ProcessedModel) -> PrimaryCost {
    let data = &model.data;
    if let Some(v) = data.input_cost_per_token {
        PrimaryCost::token(v)
    } else if let Some(v) = data.input_cost_per_image {
        PrimaryCost::unit(v, "image")
    } else if let Some(v) = data.input_cost_per_second {
        PrimaryCost::unit(v, "sec")
    } else if let Some(v) = data.ocr_cost_per_page {
        PrimaryCost::unit(v, "page")
    } else {
        PrimaryCost::missing()
    }
}

/// First present of token, image, then second price.
pub fn primary_output_cost(model: &ProcessedModel) -> PrimaryCost {
    let data = &model.data;
    if let Some(v) = data.output_cost_per_token {
        PrimaryCost::token(v)
    } else if let Some(v) = data.output_cost_per_image {
        PrimaryCost::unit(v, "image")
    } else if let Some(v) = data.output_cost_per_second {
        PrimaryCost::unit(v, "sec")
    } else {
        PrimaryCost::missing()
    }
}

/// `max_input_tokens`, falling back to `max_tokens`. Zero means unknown.
pub fn context_length(model: &ProcessedModel) -> u64 {
    model
        .data
        .max_input_tokens
        .filter(|n| *n > 0)
        .or(model.data.max_tokens.filter(|n| *n > 0))
        .unwrap_or(0)
}

pub fn family(model: &ProcessedModel) -> ModeFamily {
    ModeFamily::of(model.mode())
}

pub fn is_comparable(left: &ProcessedModel, right: &ProcessedModel) -> bool {
    family(left) == family(right)
}

/// Input modalities, inferred from the mode when the feed lists none.
pub fn input_modalities(model: &ProcessedModel) -> Vec<String> {
    if let Some(list) = model.data.supported_modalities.as_ref().filter(|l| !l.is_empty()) {
        return list.clone();
    }
    let inferred = match model.mode() {
        "image_generation" | "ocr" => "Image",
        "audio_transcription" | "audio_generation" | "audio_speech" | "voice" => "Audio",
        _ => "Text",
    };
    vec![inferred.to_string()]
}

/// Output modalities, inferred from the mode when the feed lists none.
pub fn output_modalities(model: &ProcessedModel) -> Vec<String> {
    if let Some(list) = model
        .data
        .supported_output_modalities
        .as_ref()
        .filter(|l| !l.is_empty())
    {
        return list.clone();
    }
    let inferred = match model.mode() {
        "image_generation" => "Image",
        "video_generation" => "Video",
        "audio_generation" | "audio_speech" | "voice" => "Audio",
        _ => "Text",
    };
    vec![inferred.to_string()]
}

/// Display names of the model's modes: the `modes` list, else
/// `supported_modes`, else the single mode. Duplicates are dropped.
pub fn modes_display(model: &ProcessedModel) -> String {
    let list = [&model.data.modes, &model.data.supported_modes]
        .into_iter()
        .flatten()
        .find(|l| !l.is_empty());

    match list {
        Some(modes) => {
            let mut unique: Vec<&String> = Vec::new();
            for mode in modes {
                if !unique.contains(&mode) {
                    unique.push(mode);
                }
            }
            unique
                .into_iter()
                .map(|m| mode_display_name(m))
                .collect::<Vec<_>>()
                .join(", ")
        }
        None => mode_display_name(model.mode()),
    }
}

/// One paragraph of comparison prose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Insight {
    pub title: String,
    pub content: String,
}

impl Insight {
    fn new(title: &str, content: String) -> Self {
        Self {
            title: title.to_string(),
            content,
        }
    }
}

// Ties go to the right-hand model, the same way a `<` test would pick.
fn lower_first<'a>(
    left: &'a ProcessedModel,
    right: &'a ProcessedModel,
    l: f64,
    r: f64,
) -> (&'a ProcessedModel, &'a ProcessedModel) {
    if l < r { (left, right) } else { (right, left) }
}

fn percent_difference(cheap: f64, expensive: f64) -> f64 {
    if cheap > 0.0 {
        (expensive - cheap) / cheap * 100.0
    } else {
        0.0
    }
}

/// Comparison insights for a pair of models, in a fixed order: context window,
/// input cost, output cost, output length, capabilities, provider. A section is
/// produced only when the two models actually differ on it.
pub fn comparison_delta(left: &ProcessedModel, right: &ProcessedModel) -> Vec<Insight> {
    let mut insights = Vec::new();

    if let Some(insight) = context_insight(left, right) {
        insights.push(insight);
    }
    if let Some(insight) = input_cost_insight(left, right) {
        insights.push(insight);
    }
    if let Some(insight) = output_cost_insight(left, right) {
        insights.push(insight);
    }
    if let Some(insight) = output_length_insight(left, right) {
        insights.push(insight);
    }
    if let Some(insight) = capability_insight(left, right) {
        insights.push(insight);
    }
    if left.provider != right.provider {
        insights.push(Insight::new(
            "Provider Considerations",
            format!(
                "These models are offered by different providers: {} and {}. Consider factors such as regional availability, API reliability, support quality, existing infrastructure integrations, and compliance requirements when choosing between providers.",
                provider_display_name(&left.provider),
                provider_display_name(&right.provider)
            ),
        ));
    }

    insights
}

fn context_insight(left: &ProcessedModel, right: &ProcessedModel) -> Option<Insight> {
    let (l, r) = (context_length(left), context_length(right));
    if l == 0 || r == 0 || l == r {
        return None;
    }
    let (larger, smaller) = if l > r { (left, right) } else { (right, left) };
    let (large, small) = (l.max(r), l.min(r));
    let ratio = round_half_up(large as f64 / small as f64, 1);

    let tier = if large >= 200_000 {
        "This substantial difference makes it significantly better suited for processing lengthy documents, extensive codebases, or maintaining long conversation histories."
    } else if large >= 100_000 {
        "This advantage allows for handling larger inputs such as comprehensive reports, extended dialogues, or substantial code repositories."
    } else {
        "This difference may be relevant when working with moderately sized documents or multi-turn conversations."
    };

    Some(Insight::new(
        "Context Window Capacity",
        format!(
            "{} offers a {}-token context window, which is {ratio:.1}x larger than {}'s {}-token capacity. {tier}",
            larger.display_name,
            format_k(large),
            smaller.display_name,
            format_k(small),
        ),
    ))
}

fn input_cost_insight(left: &ProcessedModel, right: &ProcessedModel) -> Option<Insight> {
    let l = primary_input_cost(left).value?;
    let r = primary_input_cost(right).value?;
    if l == r {
        return None;
    }
    let (cheaper, pricier) = lower_first(left, right, l, r);
    let (cheap, expensive) = (l.min(r), l.max(r));

    let mut content = if left.data.input_cost_per_token.is_some()
        || right.data.input_cost_per_token.is_some()
    {
        format!(
            "{} has more competitive input pricing at ${:.2} per million tokens, compared to {}'s ${:.2} per million tokens",
            cheaper.display_name,
            cheap * PER_MILLION,
            pricier.display_name,
            expensive * PER_MILLION
        )
    } else {
        format!(
            "{} offers lower input costs at {}, compared to {} at {}",
            cheaper.display_name,
            primary_input_cost(cheaper).label,
            pricier.display_name,
            primary_input_cost(pricier).label
        )
    };

    let pct = percent_difference(cheap, expensive);
    if pct > 0.0 {
        content.push_str(&format!(
            " — approximately {:.0}% more cost-effective",
            round_half_up(pct, 0)
        ));
    }
    content.push_str(". This difference becomes significant in high-volume applications or when processing large amounts of input data.");

    Some(Insight::new("Input Cost Comparison", content))
}

fn output_cost_insight(left: &ProcessedModel, right: &ProcessedModel) -> Option<Insight> {
    let l = primary_output_cost(left).value?;
    let r = primary_output_cost(right).value?;
    if l == r {
        return None;
    }
    let (cheaper, pricier) = lower_first(left, right, l, r);
    let (cheap, expensive) = (l.min(r), l.max(r));

    let mut content = if left.data.output_cost_per_token.is_some()
        || right.data.output_cost_per_token.is_some()
    {
        format!(
            "For generated content, {} is more economical at ${:.2} per million output tokens versus {}'s ${:.2} per million tokens",
            cheaper.display_name,
            cheap * PER_MILLION,
            pricier.display_name,
            expensive * PER_MILLION
        )
    } else {
        format!(
            "{} provides better value for output generation at {}, compared to {} at {}",
            cheaper.display_name,
            primary_output_cost(cheaper).label,
            pricier.display_name,
            primary_output_cost(pricier).label
        )
    };

    let pct = percent_difference(cheap, expensive);
    if pct > 0.0 {
        content.push_str(&format!(" ({:.0}% difference)", round_half_up(pct, 0)));
    }
    content.push_str(". Consider this when your use case involves generating substantial amounts of text or requires frequent model responses.");

    Some(Insight::new("Output Generation Costs", content))
}

fn output_length_insight(left: &ProcessedModel, right: &ProcessedModel) -> Option<Insight> {
    let l = left.data.max_output_tokens.filter(|n| *n > 0)?;
    let r = right.data.max_output_tokens.filter(|n| *n > 0)?;
    if l == r {
        return None;
    }
    let (larger, smaller) = if l > r { (left, right) } else { (right, left) };
    let (large, small) = (l.max(r), l.min(r));

    Some(Insight::new(
        "Maximum Output Length",
        format!(
            "{} supports generating up to {} tokens in a single response, while {} is limited to {} tokens. This {}-token advantage makes {} better suited for tasks requiring longer outputs such as comprehensive reports, detailed code generation, or extensive creative writing.",
            larger.display_name,
            format_k(large),
            smaller.display_name,
            format_k(small),
            format_k(large - small),
            larger.display_name
        ),
    ))
}

/// Capabilities weighed in the "Unique Capabilities" insight, with the phrase
/// used for each.
const DISTINGUISHING_CAPABILITIES: [(Capability, &str); 7] = [
    (Capability::FunctionCalling, "function calling"),
    (Capability::Vision, "vision processing"),
    (Capability::Reasoning, "advanced reasoning"),
    (Capability::WebSearch, "web search"),
    (Capability::AudioInput, "audio input"),
    (Capability::AudioOutput, "audio output"),
    (Capability::PromptCaching, "prompt caching"),
];

fn capability_insight(left: &ProcessedModel, right: &ProcessedModel) -> Option<Insight> {
    let only = |a: &ProcessedModel, b: &ProcessedModel| -> Vec<&'static str> {
        DISTINGUISHING_CAPABILITIES
            .iter()
            .filter(|(cap, _)| a.data.supports(*cap) && !b.data.supports(*cap))
            .map(|(_, phrase)| *phrase)
            .collect()
    };
    let left_only = only(left, right);
    let right_only = only(right, left);
    if left_only.is_empty() && right_only.is_empty() {
        return None;
    }

    let mut content = String::new();
    if !left_only.is_empty() {
        content.push_str(&format!(
            "{} uniquely offers {}, ",
            left.display_name,
            left_only.join(", ")
        ));
    }
    if !right_only.is_empty() {
        if !content.is_empty() {
            content.push_str("while ");
        }
        content.push_str(&format!(
            "{} provides {}",
            right.display_name,
            right_only.join(", ")
        ));
    }
    content.push_str(". These distinct capabilities may be decisive factors depending on your application requirements.");

    Some(Insight::new("Unique Capabilities", content))
}

/// A titled group of sentences about one model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FactGroup {
    pub category: String,
    pub items: Vec<String>,
}

/// Plain-language facts for a single model page. Empty groups are left out.
pub fn model_facts(model: &ProcessedModel) -> Vec<FactGroup> {
    let data = &model.data;
    let mut facts = Vec::new();

    let mut overview = vec![format!(
        "{} is a {} model provided by {}.",
        model.display_name,
        modes_display(model).to_lowercase(),
        provider_display_name(&model.provider)
    )];
    let context = context_length(model);
    if context > 0 {
        let size = format_k(context);
        overview.push(if context >= 1_000_000 {
            format!("This model offers an exceptional context window of {size} tokens, making it ideal for processing extensive documents, long conversations, or large codebases.")
        } else if context >= 100_000 {
            format!("With a context window of {size} tokens, this model can handle substantial inputs such as detailed documents or extended conversation histories.")
        } else if context >= 32_000 {
            format!("The model supports a {size}-token context window, suitable for moderate-sized documents and multi-turn conversations.")
        } else {
            format!("This model has a context capacity of {size} tokens.")
        });
    }
    facts.push(FactGroup {
        category: "Overview".to_string(),
        items: overview,
    });

    let mut pricing = Vec::new();
    if let Some(v) = data.input_cost_per_token {
        pricing.push(format!("Input processing costs ${:.2} per million tokens.", v * PER_MILLION));
    }
    if let Some(v) = data.output_cost_per_token {
        pricing.push(format!("Output generation costs ${:.2} per million tokens.", v * PER_MILLION));
    }
    if let Some(v) = data.input_cost_per_image {
        pricing.push(format!("Image input processing is priced at ${v:.4} per image."));
    }
    if let Some(v) = data.output_cost_per_image {
        pricing.push(format!("Image generation costs ${v:.4} per image."));
    }
    if let Some(v) = data.input_cost_per_second {
        pricing.push(format!("Audio input processing costs ${v:.4} per second."));
    }
    if let Some(v) = data.output_cost_per_second {
        pricing.push(format!("Audio or video output generation costs ${v:.4} per second."));
    }
    if let Some(v) = data.ocr_cost_per_page {
        pricing.push(format!("OCR processing is priced at ${v:.4} per page."));
    }
    push_group(&mut facts, "Pricing", pricing);

    let mut limits = Vec::new();
    if let Some(n) = data.max_output_tokens.filter(|n| *n > 0) {
        limits.push(format!(
            "The model can generate up to {} tokens in a single response.",
            format_k(n)
        ));
    }
    if let Some(n) = data.max_query_tokens.filter(|n| *n > 0) {
        limits.push(format!("Query operations support up to {} tokens.", format_k(n)));
    }
    push_group(&mut facts, "Output Capabilities", limits);

    let mut availability = Vec::new();
    if let Some(endpoints) = data.supported_endpoints.as_ref().filter(|e| !e.is_empty()) {
        availability.push(format!(
            "Available through the following endpoints: {}.",
            endpoints.join(", ")
        ));
    }
    if let Some(date) = data.deprecation_date.as_deref().filter(|d| !d.trim().is_empty()) {
        availability.push(format!(
            "Please note: This model is scheduled for deprecation on {date}."
        ));
    }
    push_group(&mut facts, "Availability", availability);

    facts
}

fn push_group(facts: &mut Vec<FactGroup>, category: &str, items: Vec<String>) {
    if !items.is_empty() {
        facts.push(FactGroup {
            category: category.to_string(),
            items,
        });
    }
}

fn capability_sentence(capability: Capability) -> &'static str {
    match capability {
        Capability::FunctionCalling => "Supports function calling, enabling integration with external tools and APIs for extended functionality.",
        Capability::Vision => "Includes vision capabilities to process and analyze images alongside text inputs.",
        Capability::Reasoning => "Features advanced reasoning capabilities for complex problem-solving and multi-step logical tasks.",
        Capability::WebSearch => "Provides web search integration for accessing real-time information and current data.",
        Capability::AudioInput => "Accepts audio input, allowing for voice-based interactions and audio processing.",
        Capability::AudioOutput => "Generates audio output for text-to-speech and voice response applications.",
        Capability::ToolChoice => "Allows explicit tool selection, giving developers fine-grained control over function execution.",
        Capability::ResponseSchema => "Supports structured response schemas for consistent, predictable output formatting.",
        Capability::ParallelFunctionCalling => "Enables parallel function calling to execute multiple operations simultaneously for improved efficiency.",
        Capability::PromptCaching => "Implements prompt caching to reduce costs and latency for repeated or similar queries.",
        Capability::SystemMessages => "Supports system messages for customizing model behavior and setting operational parameters.",
    }
}

/// One sentence per supported capability.
pub fn capability_rows(model: &ProcessedModel) -> Vec<String> {
    model
        .data
        .capabilities()
        .into_iter()
        .map(|cap| capability_sentence(cap).to_string())
        .collect()
}

fn canonical_key(model: &ProcessedModel) -> String {
    format!(
        "{}_{}",
        model.provider.to_lowercase(),
        model.slug.to_lowercase()
    )
}

/// Orders a pair so that "A vs B" and "B vs A" share one URL. Returns the pair
/// in canonical order and whether the input was already in that order.
pub fn canonical_order<'a>(
    a: &'a ProcessedModel,
    b: &'a ProcessedModel,
) -> (&'a ProcessedModel, &'a ProcessedModel, bool) {
    let in_order = canonical_key(a).cmp(&canonical_key(b)) == Ordering::Less;
    if in_order { (a, b, true) } else { (b, a, false) }
}

/// `/compare/<provider>/<slug>[?compare=<provider>/<slug>]`.
pub fn compare_path(model: &ProcessedModel, other: Option<&ProcessedModel>) -> String {
    let path = format!(
        "/compare/{}/{}",
        urlencoding::encode(&model.provider),
        model.slug
    );
    match other {
        Some(other) => format!(
            "{path}?compare={}/{}",
            urlencoding::encode(&other.provider),
            other.slug
        ),
        None => path,
    }
}

/// [`compare_path`] with the pair in canonical order.
pub fn canonical_compare_path(a: &ProcessedModel, b: &ProcessedModel) -> String {
    let (first, second, _) = canonical_order(a, b);
    compare_path(first, Some(second))
}

/// Which two models are on screen. Transitions return the path to navigate to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComparisonSelection {
    pub left: Option<String>,
    pub right: Option<String>,
}

fn find<'a>(models: &'a [ProcessedModel], id: Option<&str>) -> Option<&'a ProcessedModel> {
    let id = id?;
    models.iter().find(|m| m.id == id)
}

fn option_label(model: &ProcessedModel) -> String {
    format!("{} {} {}", model.display_name, model.id, model.provider).to_lowercase()
}

fn matches_query(model: &ProcessedModel, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    query.is_empty() || option_label(model).contains(&query)
}

impl ComparisonSelection {
    pub fn new(left: Option<String>, right: Option<String>) -> Self {
        Self { left, right }
    }

    pub fn left_model<'a>(&self, models: &'a [ProcessedModel]) -> Option<&'a ProcessedModel> {
        find(models, self.left.as_deref())
    }

    pub fn right_model<'a>(&self, models: &'a [ProcessedModel]) -> Option<&'a ProcessedModel> {
        find(models, self.right.as_deref())
    }

    /// Both sides resolve and share a mode family.
    pub fn is_comparable(&self, models: &[ProcessedModel]) -> bool {
        match (self.left_model(models), self.right_model(models)) {
            (Some(left), Some(right)) => is_comparable(left, right),
            _ => false,
        }
    }

    /// Picks a new left model. The right side is kept only when it is a
    /// different model in the same family.
    pub fn select_left(&mut self, models: &[ProcessedModel], id: &str) -> Option<String> {
        self.left = Some(id.to_string());
        let left = find(models, Some(id))?;

        let right = self
            .right_model(models)
            .filter(|right| right.id != left.id && is_comparable(left, right));
        if right.is_none() {
            self.right = None;
        }
        Some(compare_path(left, right))
    }

    /// Picks a right model, or fills the left side first when it is empty.
    pub fn select_right(&mut self, models: &[ProcessedModel], id: &str) -> Option<String> {
        let Some(left) = self.left_model(models) else {
            self.left = Some(id.to_string());
            return find(models, Some(id)).map(|m| compare_path(m, None));
        };
        self.right = Some(id.to_string());
        let right = find(models, Some(id))?;
        Some(compare_path(left, Some(right)))
    }

    pub fn clear_right(&mut self, models: &[ProcessedModel]) -> Option<String> {
        self.right = None;
        self.left_model(models).map(|left| compare_path(left, None))
    }

    /// Candidates for the left picker: everything except the right model.
    pub fn left_options<'a>(&self, models: &'a [ProcessedModel], query: &str) -> Vec<&'a ProcessedModel> {
        models
            .iter()
            .filter(|m| self.right.as_deref() != Some(m.id.as_str()))
            .filter(|m| matches_query(m, query))
            .collect()
    }

    /// Candidates for the right picker: same family as the left model,
    /// excluding the left model itself.
    pub fn right_options<'a>(&self, models: &'a [ProcessedModel], query: &str) -> Vec<&'a ProcessedModel> {
        let left_family = self.left_model(models).map(family);
        models
            .iter()
            .filter(|m| self.left.as_deref() != Some(m.id.as_str()))
            .filter(|m| left_family.is_none_or(|f| family(m) == f))
            .filter(|m| matches_query(m, query))
            .collect()
    }
}

/// Everything a comparison page shows for one side.
#[derive(Debug, Clone, Serialize)]
pub struct ModelDetails<'a> {
    pub model: &'a ProcessedModel,
    pub provider_display_name: String,
    pub mode_display_name: String,
    pub modes: String,
    pub family: ModeFamily,
    pub context_length: u64,
    pub primary_input_cost: PrimaryCost,
    pub primary_output_cost: PrimaryCost,
    pub input_modalities: Vec<String>,
    pub output_modalities: Vec<String>,
    pub facts: Vec<FactGroup>,
    /// Short names for the capability table, e.g. `Function Calling`.
    pub capability_labels: Vec<&'static str>,
    pub capabilities: Vec<String>,
}

impl<'a> ModelDetails<'a> {
    pub fn new(model: &'a ProcessedModel) -> Self {
        Self {
            provider_display_name: provider_display_name(&model.provider),
            mode_display_name: mode_display_name(model.mode()),
            modes: modes_display(model),
            family: family(model),
            context_length: context_length(model),
            primary_input_cost: primary_input_cost(model),
            primary_output_cost: primary_output_cost(model),
            input_modalities: input_modalities(model),
            output_modalities: output_modalities(model),
            facts: model_facts(model),
            capability_labels: model
                .data
                .capabilities()
                .iter()
                .map(Capability::label)
                .collect(),
            capabilities: capability_rows(model),
            model,
        }
    }
}

/// A right-hand picker entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateOption {
    pub id: String,
    pub label: String,
    pub href: String,
}

/// The full comparison payload.
#[derive(Debug, Clone, Serialize)]
pub struct Comparison<'a> {
    pub left: ModelDetails<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<ModelDetails<'a>>,
    pub comparable: bool,
    pub insights: Vec<Insight>,
    pub canonical_path: String,
    pub candidates: Vec<CandidateOption>,
}

impl<'a> Comparison<'a> {
    /// Builds the payload for `left` and an optional `right`. Insights are
    /// only produced for a comparable pair.
    pub fn build(
        models: &'a [ProcessedModel],
        left: &'a ProcessedModel,
        right: Option<&'a ProcessedModel>,
    ) -> Self {
        let selection = ComparisonSelection::new(Some(left.id.clone()), right.map(|r| r.id.clone()));
        let comparable = right.is_some_and(|r| is_comparable(left, r));
        let insights = match right {
            Some(right) if comparable => comparison_delta(left, right),
            _ => Vec::new(),
        };
        let canonical_path = match right {
            Some(right) => canonical_compare_path(left, right),
            None => compare_path(left, None),
        };
        let candidates = selection
            .right_options(models, "")
            .into_iter()
            .map(|m| CandidateOption {
                id: m.id.clone(),
                label: format!("{}: {}", provider_display_name(&m.provider), m.display_name),
                href: compare_path(left, Some(m)),
            })
            .collect();

        Self {
            left: ModelDetails::new(left),
            right: right.map(ModelDetails::new),
            comparable,
            insights,
            canonical_path,
            candidates,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelData;

    fn model(provider: &str, name: &str, mode: &str, data: ModelData) -> ProcessedModel {
        ProcessedModel {
            id: format!("{provider}/{name}"),
            name: name.to_string(),
            provider: provider.to_string(),
            slug: name.to_lowercase(),
            display_name: name.to_string(),
            data: ModelData {
                provider: Some(provider.to_string()),
                mode: Some(mode.to_string()),
                ..data
            },
        }
    }

    fn titles(insights: &[Insight]) -> Vec<&str> {
        insights.iter().map(|i| i.title.as_str()).collect()
    }

    #[test]
    fn test_primary_costs() {
        let chat = model(
            "openai",
            "gpt-4",
            "chat",
            ModelData {
                input_cost_per_token: Some(0.00003),
                input_cost_per_image: Some(0.01),
                ..Default::default()
            },
        );
        let input = primary_input_cost(&chat);
        assert_eq!(input.value, Some(0.00003));
        assert_eq!(input.label, "$30.00/M");
        assert!(input.per_token);
        assert_eq!(primary_output_cost(&chat).label, MISSING);

        let ocr = model(
            "mistral",
            "ocr",
            "ocr",
            ModelData {
                ocr_cost_per_page: Some(0.001),
                ..Default::default()
            },
        );
        assert_eq!(primary_input_cost(&ocr).label, "$0.0010/page");
        assert_eq!(primary_output_cost(&ocr).value, None);

        let voice = model(
            "x",
            "v",
            "voice",
            ModelData {
                output_cost_per_second: Some(0.002),
                ..Default::default()
            },
        );
        assert_eq!(primary_output_cost(&voice).label, "$0.0020/sec");
    }

    #[test]
    fn test_context_length_fallback() {
        let both = model(
            "a",
            "b",
            "chat",
            ModelData {
                max_input_tokens: Some(0),
                max_tokens: Some(4096),
                ..Default::default()
            },
        );
        assert_eq!(context_length(&both), 4096);
        assert_eq!(context_length(&model("a", "c", "chat", ModelData::default())), 0);
    }

    #[test]
    fn test_context_ratio_and_tier() {
        let big = model(
            "openai",
            "big",
            "chat",
            ModelData {
                max_input_tokens: Some(128_000),
                ..Default::default()
            },
        );
        let small = model(
            "openai",
            "small",
            "chat",
            ModelData {
                max_input_tokens: Some(32_000),
                ..Default::default()
            },
        );
        let insights = comparison_delta(&small, &big);
        assert_eq!(titles(&insights), vec!["Context Window Capacity"]);
        assert_eq!(
            insights[0].content,
            "big offers a 128K-token context window, which is 4.0x larger than small's 32K-token capacity. This advantage allows for handling larger inputs such as comprehensive reports, extended dialogues, or substantial code repositories."
        );
    }

    #[test]
    fn test_context_ratio_rounds_half_up() {
        let larger = model(
            "openai",
            "a",
            "chat",
            ModelData {
                max_input_tokens: Some(160_000),
                ..Default::default()
            },
        );
        let smaller = model(
            "openai",
            "b",
            "chat",
            ModelData {
                max_input_tokens: Some(128_000),
                ..Default::default()
            },
        );
        let insights = comparison_delta(&larger, &smaller);
        assert!(insights[0]
            .content
            .starts_with("a offers a 160K-token context window, which is 1.3x larger than b's 128K-token capacity."));
    }

    #[test]
    fn test_equal_input_costs_produce_no_input_insight() {
        let data = ModelData {
            input_cost_per_token: Some(0.000005),
            output_cost_per_token: Some(0.000015),
            ..Default::default()
        };
        let a = model("openai", "a", "chat", data.clone());
        let b = model(
            "openai",
            "b",
            "chat",
            ModelData {
                output_cost_per_token: Some(0.00003),
                ..data
            },
        );
        let insights = comparison_delta(&a, &b);
        assert_eq!(titles(&insights), vec!["Output Generation Costs"]);
        assert_eq!(
            insights[0].content,
            "For generated content, a is more economical at $15.00 per million output tokens versus b's $30.00 per million tokens (100% difference). Consider this when your use case involves generating substantial amounts of text or requires frequent model responses."
        );
    }

    #[test]
    fn test_input_cost_wording() {
        let cheap = model(
            "openai",
            "cheap",
            "chat",
            ModelData {
                input_cost_per_token: Some(0.000001),
                ..Default::default()
            },
        );
        let pricey = model(
            "openai",
            "pricey",
            "chat",
            ModelData {
                input_cost_per_token: Some(0.000003),
                ..Default::default()
            },
        );
        let insights = comparison_delta(&pricey, &cheap);
        assert_eq!(
            insights[0].content,
            "cheap has more competitive input pricing at $1.00 per million tokens, compared to pricey's $3.00 per million tokens — approximately 200% more cost-effective. This difference becomes significant in high-volume applications or when processing large amounts of input data."
        );

        let free = model(
            "openai",
            "free",
            "chat",
            ModelData {
                input_cost_per_token: Some(0.0),
                ..Default::default()
            },
        );
        let insights = comparison_delta(&free, &cheap);
        assert!(!insights[0].content.contains("approximately"));
    }

    #[test]
    fn test_unit_cost_wording_for_images() {
        let a = model(
            "openai",
            "dall-e-2",
            "image_generation",
            ModelData {
                output_cost_per_image: Some(0.02),
                ..Default::default()
            },
        );
        let b = model(
            "openai",
            "dall-e-3",
            "image_generation",
            ModelData {
                output_cost_per_image: Some(0.04),
                ..Default::default()
            },
        );
        let insights = comparison_delta(&a, &b);
        assert_eq!(
            insights[0].content,
            "dall-e-2 provides better value for output generation at $0.0200/image, compared to dall-e-3 at $0.0400/image (100% difference). Consider this when your use case involves generating substantial amounts of text or requires frequent model responses."
        );
    }

    #[test]
    fn test_output_length_capabilities_and_provider() {
        let a = model(
            "openai",
            "a",
            "chat",
            ModelData {
                max_output_tokens: Some(16_384),
                supports_vision: Some(true),
                supports_tool_choice: Some(true),
                ..Default::default()
            },
        );
        let b = model(
            "anthropic",
            "b",
            "chat",
            ModelData {
                max_output_tokens: Some(4_096),
                supports_reasoning: Some(true),
                supports_prompt_caching: Some(true),
                ..Default::default()
            },
        );
        let insights = comparison_delta(&a, &b);
        assert_eq!(
            titles(&insights),
            vec![
                "Maximum Output Length",
                "Unique Capabilities",
                "Provider Considerations"
            ]
        );
        assert_eq!(
            insights[0].content,
            "a supports generating up to 16K tokens in a single response, while b is limited to 4K tokens. This 12K-token advantage makes a better suited for tasks requiring longer outputs such as comprehensive reports, detailed code generation, or extensive creative writing."
        );
        assert_eq!(
            insights[1].content,
            "a uniquely offers vision processing, while b provides advanced reasoning, prompt caching. These distinct capabilities may be decisive factors depending on your application requirements."
        );
        assert!(insights[2].content.starts_with(
            "These models are offered by different providers: OpenAI and Anthropic."
        ));
    }

    #[test]
    fn test_identical_models_have_no_insights() {
        let data = ModelData {
            input_cost_per_token: Some(0.000001),
            max_input_tokens: Some(8192),
            ..Default::default()
        };
        let a = model("openai", "a", "chat", data.clone());
        let b = model("openai", "b", "chat", data);
        assert!(comparison_delta(&a, &b).is_empty());
    }

    #[test]
    fn test_model_facts() {
        let m = model(
            "openai",
            "gpt-4o",
            "chat",
            ModelData {
                input_cost_per_token: Some(0.0000025),
                max_input_tokens: Some(128_000),
                max_output_tokens: Some(16_384),
                supported_endpoints: Some(vec!["/v1/chat/completions".to_string()]),
                deprecation_date: Some("2026-01-01".to_string()),
                ..Default::default()
            },
        );
        let facts = model_facts(&m);
        let categories: Vec<&str> = facts.iter().map(|f| f.category.as_str()).collect();
        assert_eq!(
            categories,
            vec!["Overview", "Pricing", "Output Capabilities", "Availability"]
        );
        assert_eq!(facts[0].items[0], "gpt-4o is a chat model provided by OpenAI.");
        assert!(facts[0].items[1].starts_with("With a context window of 128K tokens"));
        assert_eq!(facts[1].items, vec!["Input processing costs $2.50 per million tokens."]);
        assert_eq!(
            facts[3].items[1],
            "Please note: This model is scheduled for deprecation on 2026-01-01."
        );
    }

    #[test]
    fn test_modes_display_prefers_lists() {
        let m = model(
            "openai",
            "multi",
            "chat",
            ModelData {
                modes: Some(vec![
                    "chat".to_string(),
                    "image_generation".to_string(),
                    "chat".to_string(),
                ]),
                ..Default::default()
            },
        );
        assert_eq!(modes_display(&m), "Chat, Image Generation");
        assert_eq!(input_modalities(&m), vec!["Text"]);
    }

    #[test]
    fn test_capability_rows() {
        let m = model(
            "openai",
            "a",
            "chat",
            ModelData {
                supports_function_calling: Some(true),
                supports_system_messages: Some(true),
                supports_vision: Some(false),
                ..Default::default()
            },
        );
        let rows = capability_rows(&m);
        assert_eq!(rows.len(), 2);
        assert!(rows[0].starts_with("Supports function calling"));
        assert!(rows[1].starts_with("Supports system messages"));

        let details = ModelDetails::new(&m);
        assert_eq!(details.capability_labels, vec!["Function Calling", "System Messages"]);
    }

    #[test]
    fn test_canonical_order_and_paths() {
        let a = model("openai", "gpt-4o", "chat", ModelData::default());
        let b = model("anthropic", "claude-3", "chat", ModelData::default());
        let (first, second, in_order) = canonical_order(&a, &b);
        assert_eq!(first.id, "anthropic/claude-3");
        assert_eq!(second.id, "openai/gpt-4o");
        assert!(!in_order);
        assert_eq!(
            canonical_compare_path(&a, &b),
            "/compare/anthropic/claude-3?compare=openai/gpt-4o"
        );

        let spaced = model("vertex ai", "gemini", "chat", ModelData::default());
        assert_eq!(compare_path(&spaced, None), "/compare/vertex%20ai/gemini");
    }

    fn selection_catalog() -> Vec<ProcessedModel> {
        vec![
            model("openai", "gpt-4o", "chat", ModelData::default()),
            model("anthropic", "claude-3", "chat", ModelData::default()),
            model("openai", "gpt-3.5-turbo-instruct", "completion", ModelData::default()),
            model("openai", "text-embedding-3-small", "embedding", ModelData::default()),
        ]
    }

    #[test]
    fn test_select_left_clears_incompatible_right() {
        let models = selection_catalog();
        let mut selection =
            ComparisonSelection::new(Some("openai/gpt-4o".into()), Some("anthropic/claude-3".into()));

        let path = selection.select_left(&models, "openai/gpt-3.5-turbo-instruct");
        assert_eq!(selection.right.as_deref(), Some("anthropic/claude-3"));
        assert_eq!(
            path.as_deref(),
            Some("/compare/openai/gpt-3.5-turbo-instruct?compare=anthropic/claude-3")
        );

        let path = selection.select_left(&models, "openai/text-embedding-3-small");
        assert_eq!(selection.right, None);
        assert_eq!(path.as_deref(), Some("/compare/openai/text-embedding-3-small"));
    }

    #[test]
    fn test_select_left_same_as_right_clears_right() {
        let models = selection_catalog();
        let mut selection =
            ComparisonSelection::new(Some("openai/gpt-4o".into()), Some("anthropic/claude-3".into()));
        selection.select_left(&models, "anthropic/claude-3");
        assert_eq!(selection.left.as_deref(), Some("anthropic/claude-3"));
        assert_eq!(selection.right, None);
    }

    #[test]
    fn test_select_right_fills_empty_left() {
        let models = selection_catalog();
        let mut selection = ComparisonSelection::default();
        let path = selection.select_right(&models, "openai/gpt-4o");
        assert_eq!(selection.left.as_deref(), Some("openai/gpt-4o"));
        assert_eq!(selection.right, None);
        assert_eq!(path.as_deref(), Some("/compare/openai/gpt-4o"));

        let path = selection.select_right(&models, "anthropic/claude-3");
        assert_eq!(selection.right.as_deref(), Some("anthropic/claude-3"));
        assert_eq!(
            path.as_deref(),
            Some("/compare/openai/gpt-4o?compare=anthropic/claude-3")
        );
        assert!(selection.is_comparable(&models));

        assert_eq!(
            selection.clear_right(&models).as_deref(),
            Some("/compare/openai/gpt-4o")
        );
        assert_eq!(selection.right, None);
    }

    #[test]
    fn test_option_lists() {
        let models = selection_catalog();
        let selection =
            ComparisonSelection::new(Some("openai/gpt-4o".into()), Some("anthropic/claude-3".into()));

        let right: Vec<&str> = selection
            .right_options(&models, "")
            .iter()
            .map(|m| m.id.as_str())
            .collect();
        assert_eq!(right, vec!["anthropic/claude-3", "openai/gpt-3.5-turbo-instruct"]);

        let left: Vec<&str> = selection
            .left_options(&models, " EMBEDDING ")
            .iter()
            .map(|m| m.id.as_str())
            .collect();
        assert_eq!(left, vec!["openai/text-embedding-3-small"]);

        assert_eq!(selection.left_options(&models, "").len(), 3);
    }

    #[test]
    fn test_comparison_payload() {
        let models = selection_catalog();
        let comparison = Comparison::build(&models, &models[0], Some(&models[3]));
        assert!(!comparison.comparable);
        assert!(comparison.insights.is_empty());
        assert_eq!(comparison.candidates.len(), 2);
        assert_eq!(
            comparison.canonical_path,
            "/compare/openai/gpt-4o?compare=openai/text-embedding-3-small"
        );
        assert_eq!(comparison.left.family, ModeFamily::Text);
    }
}
