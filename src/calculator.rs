//! Usage-based cost estimate for a single model.

use crate::{mode::KnownMode, model::ModelData};
use serde::{Deserialize, Serialize};

/// Usage quantities. Absent or zero quantities contribute nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculationInput {
    pub input_tokens: f64,
    pub output_tokens: f64,
    pub images: f64,
    pub seconds: f64,
    pub pages: f64,
}

/// Per-component costs. A component is present only when it was priced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Breakdown {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ocr: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CalculationResult {
    pub input_cost: f64,
    pub output_cost: f64,
    pub total_cost: f64,
    pub breakdown: Breakdown,
}

// Price times quantity, but only when both are non-zero.
fn charge(price: Option<f64>, quantity: f64) -> Option<f64> {
    match price {
        Some(p) if p != 0.0 && quantity != 0.0 => Some(p * quantity),
        _ => None,
    }
}

fn add(slot: &mut Option<f64>, amount: f64) {
    *slot = Some(slot.unwrap_or(0.0) + amount);
}

/// Estimates the cost of `usage` on a model, using the pricing rules of the
/// model's mode. Modes without rules cost nothing.
pub fn calculate_cost(data: &ModelData, usage: &CalculationInput) -> CalculationResult {
    let mut input_cost = 0.0;
    let mut output_cost = 0.0;
    let mut breakdown = Breakdown::default();

    let token_input = charge(data.input_cost_per_token, usage.input_tokens);
    let token_output = charge(data.output_cost_per_token, usage.output_tokens);

    match KnownMode::parse(data.mode_str()) {
        Some(KnownMode::Chat | KnownMode::Responses) => {
            if let Some(cost) = token_input {
                input_cost = cost;
                breakdown.input = Some(cost);
            }
            if let Some(cost) = token_output {
                output_cost = cost;
                breakdown.output = Some(cost);
            }
            // Vision input.
            if let Some(cost) = charge(data.input_cost_per_image, usage.images) {
                input_cost += cost;
                breakdown.images = Some(cost);
            }
        }
        Some(KnownMode::Completion | KnownMode::Rerank) => {
            if let Some(cost) = token_input {
                input_cost = cost;
                breakdown.input = Some(cost);
            }
            if let Some(cost) = token_output {
                output_cost = cost;
                breakdown.output = Some(cost);
            }
        }
        Some(KnownMode::ImageGeneration) => {
            if let Some(cost) = token_input {
                input_cost = cost;
                breakdown.input = Some(cost);
            }
            if let Some(cost) = charge(data.output_cost_per_image, usage.images) {
                output_cost = cost;
                breakdown.images = Some(cost);
            }
        }
        Some(KnownMode::AudioTranscription) => {
            let token_priced = data.input_cost_per_token.is_some_and(|p| p != 0.0)
                || data.output_cost_per_token.is_some_and(|p| p != 0.0);
            if token_priced {
                if let Some(cost) = token_input {
                    input_cost = cost;
                    breakdown.input = Some(cost);
                }
                if let Some(cost) = token_output {
                    output_cost = cost;
                    breakdown.output = Some(cost);
                }
            } else {
                (input_cost, output_cost) = per_second(data, usage, &mut breakdown);
            }
        }
        Some(KnownMode::AudioGeneration | KnownMode::Voice) => {
            (input_cost, output_cost) = per_second(data, usage, &mut breakdown);
        }
        Some(KnownMode::VideoGeneration) => {
            if let Some(cost) = token_input {
                input_cost = cost;
                breakdown.input = Some(cost);
            }
            if let Some(cost) = charge(data.output_cost_per_second, usage.seconds) {
                output_cost = cost;
                breakdown.video = Some(cost);
            }
        }
        Some(KnownMode::Ocr) => {
            if let Some(cost) = charge(data.ocr_cost_per_page, usage.pages) {
                input_cost = cost;
                breakdown.ocr = Some(cost);
            }
            if let Some(cost) = token_input {
                input_cost += cost;
                add(&mut breakdown.input, cost);
            }
            if let Some(cost) = token_output {
                output_cost = cost;
                breakdown.output = Some(cost);
            }
        }
        Some(KnownMode::Embedding) => {
            if let Some(cost) = token_input {
                input_cost = cost;
                breakdown.input = Some(cost);
            }
        }
        Some(KnownMode::AudioSpeech) => {
            if let Some(cost) = token_input {
                input_cost = cost;
                breakdown.input = Some(cost);
            }
            if let Some(cost) = token_output {
                output_cost += cost;
                add(&mut breakdown.output, cost);
            }
            if let Some(cost) = charge(data.output_cost_per_second, usage.seconds) {
                output_cost += cost;
                breakdown.audio = Some(cost);
            }
        }
        None => {}
    }

    CalculationResult {
        input_cost,
        output_cost,
        total_cost: input_cost + output_cost,
        breakdown,
    }
}

// Both directions are billed on the same duration.
fn per_second(data: &ModelData, usage: &CalculationInput, breakdown: &mut Breakdown) -> (f64, f64) {
    let mut input_cost = 0.0;
    let mut output_cost = 0.0;
    if let Some(cost) = charge(data.input_cost_per_second, usage.seconds) {
        input_cost = cost;
        breakdown.audio = Some(cost);
    }
    if let Some(cost) = charge(data.output_cost_per_second, usage.seconds) {
        output_cost = cost;
        add(&mut breakdown.audio, cost);
    }
    (input_cost, output_cost)
}
