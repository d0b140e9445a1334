use crate::{client::DEFAULT_FEED_URL, providers::DEFAULT_WHITELIST, query::DEFAULT_PAGE_SIZE};
use serde::{Deserialize, Serialize};

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host binding
    pub host: String,
    /// Server port
    pub port: u16,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            log_level: "info".to_string(),
        }
    }
}

/// Where the catalog comes from and how it is served
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Upstream model feed
    pub upstream_url: String,
    /// Public origin used for absolute sitemap URLs
    pub base_url: String,
    /// Seconds a fetched catalog is served before it is fetched again
    pub revalidate_seconds: u64,
    /// Upstream request timeout in seconds
    pub request_timeout_seconds: u64,
    /// Rows per listing page
    pub page_size: usize,
    /// Providers to show. `None` or an empty list shows every provider.
    pub whitelist: Option<Vec<String>>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            upstream_url: DEFAULT_FEED_URL.to_string(),
            base_url: "http://localhost:8000".to_string(),
            revalidate_seconds: 3600,
            request_timeout_seconds: 30,
            page_size: DEFAULT_PAGE_SIZE,
            whitelist: Some(DEFAULT_WHITELIST.iter().map(|p| p.to_string()).collect()),
        }
    }
}
