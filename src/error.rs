use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use reqwest::Error as ReqwestError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Error from HTTP client: {0}")]
    Http(#[from] ReqwestError),
    #[error("Upstream feed returned {status}: {reason}")]
    UpstreamStatus { status: u16, reason: String },
    #[error("Failed to serialize or deserialize JSON: {0}")]
    SerdeJson(#[from] serde_json::Error),
    #[error("Model not found: {}", display_model(.provider, .slug))]
    ModelNotFound {
        provider: Option<String>,
        slug: String,
    },
    #[error("Provider not found: {0}")]
    ProviderNotFound(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
}

fn display_model(provider: &Option<String>, slug: &str) -> String {
    match provider {
        Some(provider) => format!("{provider}/{slug}"),
        None => slug.to_string(),
    }
}

impl CatalogError {
    pub fn error_type(&self) -> &'static str {
        match self {
            CatalogError::Http(_) => "upstream_error",
            CatalogError::UpstreamStatus { .. } => "upstream_error",
            CatalogError::SerdeJson(_) => "upstream_error",
            CatalogError::ModelNotFound { .. } => "not_found_error",
            CatalogError::ProviderNotFound(_) => "not_found_error",
            CatalogError::BadRequest(_) => "invalid_request_error",
        }
    }

    pub fn error_code(&self) -> Option<&'static str> {
        match self {
            CatalogError::Http(e) if e.is_timeout() => Some("upstream_timeout"),
            CatalogError::Http(_) => Some("network_error"),
            CatalogError::UpstreamStatus { .. } => Some("upstream_status"),
            CatalogError::SerdeJson(_) => Some("invalid_feed"),
            CatalogError::ModelNotFound { .. } => Some("model_not_found"),
            CatalogError::ProviderNotFound(_) => Some("provider_not_found"),
            CatalogError::BadRequest(_) => Some("bad_request"),
        }
    }
}

impl ResponseError for CatalogError {
    fn status_code(&self) -> StatusCode {
        match self {
            CatalogError::Http(e) if e.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
            CatalogError::Http(_) => StatusCode::BAD_GATEWAY,
            CatalogError::UpstreamStatus { .. } => StatusCode::BAD_GATEWAY,
            CatalogError::SerdeJson(_) => StatusCode::BAD_GATEWAY,
            CatalogError::ModelNotFound { .. } => StatusCode::NOT_FOUND,
            CatalogError::ProviderNotFound(_) => StatusCode::NOT_FOUND,
            CatalogError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": {
                "message": self.to_string(),
                "type": self.error_type(),
                "code": self.error_code()
            }
        }))
    }
}
