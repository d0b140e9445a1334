//! Search, filter, sort and paginate over a processed model list.

use crate::{
    compare::context_length,
    format::{format_compact_number, mode_display_name, pricing_lines, MISSING},
    model::ProcessedModel,
    normalize::{all_modes, all_providers, models_by_name},
    providers::provider_display_name,
};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Filter value meaning "do not filter on this field".
pub const ALL: &str = "all";
pub const DEFAULT_PAGE_SIZE: usize = 100;

const MAX_SUGGESTIONS: usize = 10;
const MAX_MODEL_SUGGESTIONS: usize = 8;
const MAX_PROVIDER_SUGGESTIONS: usize = 3;
const MAX_MODE_SUGGESTIONS: usize = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    #[default]
    Name,
    Provider,
    Price,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

/// Everything a listing view can ask for. Every field has a default, so an
/// empty query string yields the first page of all models sorted by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryConfig {
    pub search_text: String,
    pub selected_provider: String,
    pub selected_mode: String,
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
    pub page_size: usize,
    pub page_number: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            search_text: String::new(),
            selected_provider: ALL.to_string(),
            selected_mode: ALL.to_string(),
            sort_by: SortBy::default(),
            sort_order: SortOrder::default(),
            page_size: DEFAULT_PAGE_SIZE,
            page_number: 1,
        }
    }
}

impl QueryConfig {
    /// True when any search text or filter narrows the list.
    pub fn is_active(&self) -> bool {
        !self.search_text.trim().is_empty()
            || !is_all(&self.selected_provider)
            || !is_all(&self.selected_mode)
    }

    /// Clicking a column header: same column flips the order, a new column
    /// starts ascending.
    pub fn sort_on(&mut self, column: SortBy) {
        if self.sort_by == column {
            self.sort_order = self.sort_order.toggled();
        } else {
            self.sort_by = column;
            self.sort_order = SortOrder::Asc;
        }
    }
}

fn is_all(value: &str) -> bool {
    value.is_empty() || value == ALL
}

/// True when `model` passes the search text and both filters.
pub fn matches(model: &ProcessedModel, config: &QueryConfig) -> bool {
    let query = config.search_text.trim().to_lowercase();
    let matches_search = query.is_empty()
        || model.display_name.to_lowercase().contains(&query)
        || model.provider.to_lowercase().contains(&query)
        || model.mode().to_lowercase().contains(&query)
        || model.id.to_lowercase().contains(&query);

    let matches_provider =
        is_all(&config.selected_provider) || model.provider == config.selected_provider;
    let matches_mode = is_all(&config.selected_mode) || model.mode() == config.selected_mode;

    matches_search && matches_provider && matches_mode
}

pub fn filter<'a>(models: &'a [ProcessedModel], config: &QueryConfig) -> Vec<&'a ProcessedModel> {
    models.iter().filter(|m| matches(m, config)).collect()
}

/// First present price in table order, or `+inf` for unpriced models.
pub fn sortable_price(model: &ProcessedModel) -> f64 {
    model
        .data
        .cost_fields()
        .into_iter()
        .flatten()
        .next()
        .unwrap_or(f64::INFINITY)
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Stable sort. Descending order reverses the comparison, so equal keys keep
/// their original relative order either way.
pub fn sort(models: &mut [&ProcessedModel], sort_by: SortBy, sort_order: SortOrder) {
    models.sort_by(|a, b| {
        let ordering = match sort_by {
            SortBy::Name => compare_text(&a.display_name, &b.display_name),
            SortBy::Provider => compare_text(&a.provider, &b.provider),
            SortBy::Price => sortable_price(a).total_cmp(&sortable_price(b)),
        };
        match sort_order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-indexed page actually returned after clamping.
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total: self.total,
            total_pages: self.total_pages,
        }
    }
}

/// Slices `[(page-1)*size, page*size)` with `page` clamped into
/// `1..=max(1, ceil(total/size))`.
pub fn paginate<T: Clone>(items: &[T], page_size: usize, page_number: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total = items.len();
    let total_pages = total.div_ceil(page_size).max(1);
    let page = page_number.clamp(1, total_pages);
    let start = ((page - 1) * page_size).min(total);
    let end = (page * page_size).min(total);

    Page {
        items: items[start..end].to_vec(),
        page,
        page_size,
        total,
        total_pages,
    }
}

/// Filter, sort, paginate.
pub fn run_query<'a>(models: &'a [ProcessedModel], config: &QueryConfig) -> Page<&'a ProcessedModel> {
    let mut matched = filter(models, config);
    sort(&mut matched, config.sort_by, config.sort_order);
    paginate(&matched, config.page_size, config.page_number)
}

/// A listing row with its display strings precomputed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelRow {
    #[serde(flatten)]
    pub model: ProcessedModel,
    pub provider_display_name: String,
    pub mode_display_name: String,
    /// Context window for the listing column, e.g. `128k` or `1.0M`.
    pub context_window: String,
    pub pricing: Vec<String>,
}

impl From<&ProcessedModel> for ModelRow {
    fn from(model: &ProcessedModel) -> Self {
        let context = context_length(model);
        Self {
            provider_display_name: provider_display_name(&model.provider),
            mode_display_name: mode_display_name(model.mode()),
            context_window: if context == 0 {
                MISSING.to_string()
            } else {
                format_compact_number(context)
            },
            pricing: pricing_lines(&model.data),
            model: model.clone(),
        }
    }
}

/// Distinct providers and modes for filter dropdowns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Facets {
    pub providers: Vec<String>,
    pub modes: Vec<String>,
}

pub fn facets(models: &[ProcessedModel]) -> Facets {
    Facets {
        providers: all_providers(models),
        modes: all_modes(models),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Model,
    Provider,
    Mode,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    pub kind: SuggestionKind,
    pub value: String,
    pub display: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// `/compare/...` path for model suggestions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

/// Type-ahead suggestions: models first (every variant that shares a display
/// name is listed, each with a provider and mode subtitle), then providers,
/// then modes.
pub fn build_suggestions(models: &[ProcessedModel], query: &str) -> Vec<Suggestion> {
    if query.trim().is_empty() {
        return Vec::new();
    }
    let query = query.to_lowercase();

    let mut model_matches = Vec::new();
    let mut seen_names: Vec<String> = Vec::new();
    for model in models.iter().filter(|m| {
        m.display_name.to_lowercase().contains(&query) || m.id.to_lowercase().contains(&query)
    }) {
        let key = model.display_name.to_lowercase();
        if seen_names.contains(&key) {
            continue;
        }
        seen_names.push(key);
        for variant in models_by_name(models, &model.display_name) {
            model_matches.push(Suggestion {
                kind: SuggestionKind::Model,
                value: variant.display_name.clone(),
                display: variant.display_name.clone(),
                subtitle: Some(format!(
                    "{} • {}",
                    provider_display_name(&variant.provider),
                    mode_display_name(variant.mode())
                )),
                href: Some(crate::compare::compare_path(variant, None)),
            });
        }
    }

    let mut suggestions: Vec<Suggestion> = model_matches
        .into_iter()
        .take(MAX_MODEL_SUGGESTIONS)
        .collect();

    let Facets { providers, modes } = facets(models);
    suggestions.extend(
        providers
            .into_iter()
            .filter(|p| p.to_lowercase().contains(&query))
            .take(MAX_PROVIDER_SUGGESTIONS)
            .map(|provider| Suggestion {
                kind: SuggestionKind::Provider,
                display: provider_display_name(&provider),
                value: provider,
                subtitle: None,
                href: None,
            }),
    );
    suggestions.extend(
        modes
            .into_iter()
            .filter(|m| m.to_lowercase().contains(&query))
            .take(MAX_MODE_SUGGESTIONS)
            .map(|mode| Suggestion {
                kind: SuggestionKind::Mode,
                display: mode_display_name(&mode),
                value: mode,
                subtitle: None,
                href: None,
            }),
    );

    suggestions.truncate(MAX_SUGGESTIONS);
    suggestions
}
