use crate::{error::CatalogError, model::RawModelFeed};
use log::{error, info};
use reqwest::Client;
use std::time::Duration;

/// Default location of the model datasheet.
pub const DEFAULT_FEED_URL: &str = "https://getbifrost.ai/datasheet";

impl From<Client> for FeedClient {
    fn from(value: Client) -> Self {
        Self {
            client: value,
            url: None,
        }
    }
}

/// A client for the upstream model feed.
///
/// Wraps a reqwest::Client. Can be created with `FeedClient::new()`, pointed
/// somewhere else with `FeedClient::with_url()`, or converted from an existing
/// reqwest::Client.
#[derive(Clone)]
pub struct FeedClient {
    pub client: Client,
    pub url: Option<String>,
}

impl Default for FeedClient {
    fn default() -> Self {
        Self {
            client: Client::new(),
            url: None,
        }
    }
}

impl FeedClient {
    /// Creates a client for the default feed URL.
    pub fn new() -> FeedClient {
        FeedClient::default()
    }

    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: Some(url.into()),
        }
    }

    /// Builds a client whose requests give up after `timeout`.
    ///
    /// # Arguments
    ///
    /// * `url` - Feed location
    /// * `timeout` - Whole-request timeout
    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self, CatalogError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: Some(url.into()),
        })
    }

    pub fn url(&self) -> &str {
        self.url.as_deref().unwrap_or(DEFAULT_FEED_URL)
    }

    /// Fetches the raw feed once. There is no retry; a non-2xx status becomes
    /// [`CatalogError::UpstreamStatus`].
    ///
    /// # Returns
    ///
    /// The feed as an ordered map of composite key to record.
    pub async fn fetch_feed(&self) -> Result<RawModelFeed, CatalogError> {
        let url = self.url();
        let response = self.client.get(url).send().await.map_err(|e| {
            error!("Failed to reach model feed at {url}: {e}");
            CatalogError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            error!("Model feed at {url} returned {status}");
            return Err(CatalogError::UpstreamStatus {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("unknown").to_string(),
            });
        }

        let body = response.bytes().await?;
        let feed: RawModelFeed = serde_json::from_slice(&body)?;
        info!("Fetched {} records from {url}", feed.len());
        Ok(feed)
    }
}
