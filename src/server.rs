use crate::{
    cache::CatalogCache,
    calculator::{calculate_cost, CalculationInput},
    compare::{compare_path, Comparison},
    error::CatalogError,
    model::ProcessedModel,
    normalize::{all_providers, find_by_slug, models_by_mode, models_by_provider, ProviderStats},
    providers::{provider_display_name, provider_logo},
    query::{build_suggestions, paginate, run_query, ModelRow, Page, QueryConfig, SortBy, SortOrder, ALL},
    sitemap::{render_sitemap, sitemap_entries},
};
use actix_web::{
    get,
    http::header::{self, ContentType},
    web, HttpResponse,
};
use serde::{Deserialize, Serialize};

/// Cache policy for the full model list, which front-ends use as a search index.
pub const MODELS_CACHE_CONTROL: &str = "public, s-maxage=300, stale-while-revalidate=3600";

/// Represents the application state shared across HTTP request handlers.
pub struct AppState {
    /// Processed catalog, fetched on demand
    pub catalog: CatalogCache,
    /// Origin used for absolute URLs in the sitemap
    pub base_url: String,
    /// Rows per page when a request does not ask for a size
    pub page_size: usize,
}

/// Registers every route. Shared by `main` and the integration tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| CatalogError::BadRequest(err.to_string()).into()),
    )
    .service(health)
    .service(list_models)
    .service(search_models)
    .service(suggestions)
    .service(list_providers)
    .service(provider_listing)
    .service(compare_pair)
    .service(compare_model)
    .service(calculate)
    .service(legacy_model_redirect)
    .service(provider_model_redirect)
    .service(sitemap);
}

fn permanent_redirect(location: &str) -> HttpResponse {
    HttpResponse::PermanentRedirect()
        .insert_header((header::LOCATION, location))
        .finish()
}

#[get("/health")]
async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

#[derive(Deserialize)]
struct ModelsParams {
    provider: Option<String>,
}

/// The full processed list, optionally narrowed to one provider (exact match).
#[get("/api/models")]
async fn list_models(
    data: web::Data<AppState>,
    params: web::Query<ModelsParams>,
) -> Result<HttpResponse, CatalogError> {
    let models = data.catalog.models().await?;
    let body: Vec<&ProcessedModel> = match params.provider.as_deref() {
        Some(provider) => models.iter().filter(|m| m.provider == provider).collect(),
        None => models.iter().collect(),
    };

    Ok(HttpResponse::Ok()
        .insert_header((header::CACHE_CONTROL, MODELS_CACHE_CONTROL))
        .json(body))
}

#[derive(Deserialize)]
struct SearchParams {
    q: Option<String>,
    provider: Option<String>,
    mode: Option<String>,
    sort: Option<SortBy>,
    order: Option<SortOrder>,
    page: Option<usize>,
    page_size: Option<usize>,
}

impl SearchParams {
    fn into_query(self, default_page_size: usize) -> Result<QueryConfig, CatalogError> {
        let page_size = self.page_size.unwrap_or(default_page_size);
        if page_size == 0 {
            return Err(CatalogError::BadRequest("page_size must be at least 1".to_string()));
        }
        Ok(QueryConfig {
            search_text: self.q.unwrap_or_default(),
            selected_provider: self.provider.unwrap_or_else(|| ALL.to_string()),
            selected_mode: self.mode.unwrap_or_else(|| ALL.to_string()),
            sort_by: self.sort.unwrap_or_default(),
            sort_order: self.order.unwrap_or_default(),
            page_size,
            page_number: self.page.unwrap_or(1),
        })
    }
}

#[get("/api/search")]
async fn search_models(
    data: web::Data<AppState>,
    params: web::Query<SearchParams>,
) -> Result<HttpResponse, CatalogError> {
    let query = params.into_inner().into_query(data.page_size)?;
    let models = data.catalog.models().await?;
    let page = run_query(&models, &query).map(ModelRow::from);
    Ok(HttpResponse::Ok().json(page))
}

#[derive(Deserialize)]
struct SuggestionParams {
    #[serde(default)]
    q: String,
}

#[get("/api/suggestions")]
async fn suggestions(
    data: web::Data<AppState>,
    params: web::Query<SuggestionParams>,
) -> Result<HttpResponse, CatalogError> {
    let models = data.catalog.models().await?;
    Ok(HttpResponse::Ok().json(build_suggestions(&models, &params.q)))
}

#[derive(Serialize)]
struct ProviderSummary {
    id: String,
    display_name: String,
    logo: String,
    #[serde(flatten)]
    stats: ProviderStats,
}

impl ProviderSummary {
    fn new(provider: &str, models: &[&ProcessedModel]) -> Self {
        Self {
            id: provider.to_string(),
            display_name: provider_display_name(provider),
            logo: provider_logo(provider),
            stats: ProviderStats::compute(provider, models),
        }
    }
}

#[get("/api/providers")]
async fn list_providers(data: web::Data<AppState>) -> Result<HttpResponse, CatalogError> {
    let models = data.catalog.models().await?;
    let summaries: Vec<ProviderSummary> = all_providers(models.iter())
        .iter()
        .map(|provider| ProviderSummary::new(provider, &models_by_provider(&models, provider)))
        .collect();
    Ok(HttpResponse::Ok().json(summaries))
}

#[derive(Deserialize)]
struct ProviderParams {
    mode: Option<String>,
    page: Option<usize>,
}

#[derive(Serialize)]
struct ProviderListing {
    provider: ProviderSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    mode: Option<String>,
    models: Page<ModelRow>,
}

/// One provider's models. An unknown provider is a 404; a mode filter that
/// matches nothing is just an empty page.
#[get("/api/providers/{provider}")]
async fn provider_listing(
    data: web::Data<AppState>,
    path: web::Path<String>,
    params: web::Query<ProviderParams>,
) -> Result<HttpResponse, CatalogError> {
    let provider = path.into_inner();
    let models = data.catalog.models().await?;
    let provider_models = models_by_provider(&models, &provider);
    if provider_models.is_empty() {
        return Err(CatalogError::ProviderNotFound(provider));
    }

    let params = params.into_inner();
    let filtered: Vec<&ProcessedModel> = match params.mode.as_deref() {
        Some(mode) => models_by_mode(provider_models.iter().copied(), mode),
        None => provider_models.clone(),
    };

    let listing = ProviderListing {
        provider: ProviderSummary::new(&provider, &filtered),
        mode: params.mode,
        models: paginate(&filtered, data.page_size, params.page.unwrap_or(1)).map(ModelRow::from),
    };
    Ok(HttpResponse::Ok().json(listing))
}

#[derive(Deserialize)]
struct CompareParams {
    compare: Option<String>,
}

/// `provider/slug`, split at the first `/`.
fn parse_model_ref(value: &str) -> Option<(&str, &str)> {
    value
        .split_once('/')
        .filter(|(provider, slug)| !provider.is_empty() && !slug.is_empty())
}

/// Comparison page for one model, with an optional `?compare=provider/slug`
/// counterpart. A counterpart that cannot be found is ignored.
#[get("/api/compare/{provider}/{slug}")]
async fn compare_model(
    data: web::Data<AppState>,
    path: web::Path<(String, String)>,
    params: web::Query<CompareParams>,
) -> Result<HttpResponse, CatalogError> {
    let (provider, slug) = path.into_inner();
    let models = data.catalog.models().await?;
    let left = find_by_slug(&models, &slug, Some(&provider))?;
    let right = params
        .compare
        .as_deref()
        .and_then(parse_model_ref)
        .and_then(|(p, s)| find_by_slug(&models, s, Some(p)).ok());

    Ok(HttpResponse::Ok().json(Comparison::build(&models, left, right)))
}

#[get("/api/compare/{provider}/{slug}/vs/{provider2}/{slug2}")]
async fn compare_pair(
    data: web::Data<AppState>,
    path: web::Path<(String, String, String, String)>,
) -> Result<HttpResponse, CatalogError> {
    let (provider, slug, provider2, slug2) = path.into_inner();
    let models = data.catalog.models().await?;
    let left = find_by_slug(&models, &slug, Some(&provider))?;
    let right = find_by_slug(&models, &slug2, Some(&provider2))?;

    Ok(HttpResponse::Ok().json(Comparison::build(&models, left, Some(right))))
}

/// Cost estimate for one model. Quantities come from the query string and
/// default to zero.
#[get("/api/calculate/{provider}/{slug}")]
async fn calculate(
    data: web::Data<AppState>,
    path: web::Path<(String, String)>,
    usage: web::Query<CalculationInput>,
) -> Result<HttpResponse, CatalogError> {
    let (provider, slug) = path.into_inner();
    let models = data.catalog.models().await?;
    let model = find_by_slug(&models, &slug, Some(&provider))?;
    Ok(HttpResponse::Ok().json(calculate_cost(&model.data, &usage)))
}

/// Old single-model URLs. Unknown slugs go home rather than 404.
#[get("/model/{slug}")]
async fn legacy_model_redirect(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, CatalogError> {
    let slug = path.into_inner();
    let models = data.catalog.models().await?;
    let location = match find_by_slug(&models, &slug, None) {
        Ok(model) => compare_path(model, None),
        Err(_) => "/".to_string(),
    };
    Ok(permanent_redirect(&location))
}

#[get("/provider/{provider}/model/{slug}")]
async fn provider_model_redirect(
    data: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, CatalogError> {
    let (provider, slug) = path.into_inner();
    let models = data.catalog.models().await?;
    let model = find_by_slug(&models, &slug, Some(&provider))?;
    Ok(permanent_redirect(&compare_path(model, None)))
}

#[get("/sitemap.xml")]
async fn sitemap(data: web::Data<AppState>) -> Result<HttpResponse, CatalogError> {
    let models = data.catalog.models().await?;
    let xml = render_sitemap(&sitemap_entries(&data.base_url, &models));
    Ok(HttpResponse::Ok().content_type(ContentType::xml()).body(xml))
}
