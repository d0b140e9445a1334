//! Display formatting for prices, token counts and mode names.
//!
//! All output is locale independent so the same input always renders the same
//! string.

use crate::model::ModelData;

/// Placeholder shown for a missing value.
pub const MISSING: &str = "—";

/// `1234567` -> `"1,234,567"`.
pub fn format_number(num: u64) -> String {
    let digits = num.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Token counts of 100k and above are abbreviated (`128k`), smaller ones get
/// comma separators (`32,768`).
pub fn format_token_count(tokens: u64) -> String {
    if tokens >= 100_000 {
        format!("{}k", tokens / 1000)
    } else {
        format_number(tokens)
    }
}

/// Rounds to `decimals` places with halves going up, so `2.5` becomes `3`
/// and `1.25` becomes `1.3`. `format!`'s own rounding sends exact halves to
/// the even neighbour instead.
pub fn round_half_up(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// Like [`format_token_count`] but switches to millions with one decimal.
pub fn format_compact_number(num: u64) -> String {
    if num >= 1_000_000 {
        format!("{:.1}M", round_half_up(num as f64 / 1_000_000.0, 1))
    } else {
        format_token_count(num)
    }
}

/// Thousands with a capital `K`, used in comparison prose. Zero is missing.
pub fn format_k(value: u64) -> String {
    if value == 0 {
        MISSING.to_string()
    } else if value >= 1000 {
        format!("{:.0}K", round_half_up(value as f64 / 1000.0, 0))
    } else {
        format_number(value)
    }
}

/// Dollar amount with precision chosen by magnitude, never abbreviated.
pub fn format_currency(amount: f64) -> String {
    if amount < 0.000001 {
        format!("${amount:.10}")
    } else if amount < 0.001 {
        format!("${amount:.8}")
    } else if amount < 1.0 {
        format!("${amount:.6}")
    } else {
        format!("${amount:.2}")
    }
}

/// A per-token price shown per million tokens, e.g. `$30.00/M`.
pub fn format_per_million(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("${:.2}/M", v * 1_000_000.0),
        None => MISSING.to_string(),
    }
}

/// A flat unit price, e.g. `$0.0400/image`.
pub fn format_unit_cost(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) if unit.is_empty() => format!("${v:.4}"),
        Some(v) => format!("${v:.4}/{unit}"),
        None => MISSING.to_string(),
    }
}

/// Price lines for a listing row.
///
/// Token prices win; image prices are shown only when there are no token
/// prices, then per-second prices, then the OCR page price.
pub fn pricing_lines(data: &ModelData) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(cost) = data.input_cost_per_token {
        lines.push(format!("Input {} / 1M tokens", format_currency(cost * 1_000_000.0)));
    }
    if let Some(cost) = data.output_cost_per_token {
        lines.push(format!("Output {} / 1M tokens", format_currency(cost * 1_000_000.0)));
    }

    if lines.is_empty() {
        if let Some(cost) = data.input_cost_per_image {
            lines.push(format!("Input {} / image", format_currency(cost)));
        }
        if let Some(cost) = data.output_cost_per_image {
            lines.push(format!("Output {} / image", format_currency(cost)));
        }
    }

    if lines.is_empty() {
        if let Some(cost) = data.input_cost_per_second {
            lines.push(format!("Input {} / second", format_currency(cost)));
        }
        if let Some(cost) = data.output_cost_per_second {
            lines.push(format!("Output {} / second", format_currency(cost)));
        }
    }

    if lines.is_empty() {
        if let Some(cost) = data.ocr_cost_per_page {
            lines.push(format!("{} / page", format_currency(cost)));
        }
    }

    lines
}

const ACRONYMS: [&str; 7] = ["ocr", "api", "ai", "llm", "nlp", "gpt", "claude"];
const CAPITALIZED: [&str; 3] = ["transcription", "generation", "completion"];

/// Sentence-case label for a raw mode: `image_generation` -> `Image Generation`,
/// `ocr` -> `OCR`, `audio_speech` -> `Audio speech`.
pub fn mode_display_name(mode: &str) -> String {
    let spaced = mode.replace(&['_', '-'][..], " ");
    let words: Vec<&str> = spaced.split_whitespace().collect();
    if words.is_empty() {
        return mode.to_string();
    }

    words
        .iter()
        .enumerate()
        .map(|(index, word)| {
            let lower = word.to_lowercase();
            if ACRONYMS.contains(&lower.as_str()) && word.len() <= 5 {
                word.to_uppercase()
            } else if index == 0 || CAPITALIZED.contains(&lower.as_str()) {
                capitalize(&lower)
            } else {
                lower
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub(crate) fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
