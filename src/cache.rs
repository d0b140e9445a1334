use crate::{
    client::FeedClient,
    error::CatalogError,
    model::{ProcessedModel, RawModelFeed},
    normalize::process,
    providers::ProviderWhitelist,
};
use log::{debug, info, warn};
use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::{Mutex, RwLock};

pub const DEFAULT_REVALIDATE: Duration = Duration::from_secs(3600);

struct Snapshot {
    models: Arc<Vec<ProcessedModel>>,
    fetched_at: Instant,
}

/// Processed catalog shared by all requests.
///
/// Each snapshot is immutable; a refresh swaps in a new `Arc`. Callers that
/// find the snapshot missing or stale queue on `refresh` so that only one
/// upstream fetch is in flight at a time.
pub struct CatalogCache {
    client: FeedClient,
    whitelist: Option<ProviderWhitelist>,
    revalidate: Duration,
    snapshot: RwLock<Option<Snapshot>>,
    refresh: Mutex<()>,
}

impl CatalogCache {
    pub fn new(client: FeedClient, whitelist: Option<ProviderWhitelist>, revalidate: Duration) -> Self {
        Self {
            client,
            whitelist,
            revalidate,
            snapshot: RwLock::new(None),
            refresh: Mutex::new(()),
        }
    }

    /// A cache that never fetches and never expires.
    pub fn from_models(models: Vec<ProcessedModel>) -> Self {
        Self {
            client: FeedClient::new(),
            whitelist: None,
            revalidate: Duration::MAX,
            snapshot: RwLock::new(Some(Snapshot {
                models: Arc::new(models),
                fetched_at: Instant::now(),
            })),
            refresh: Mutex::new(()),
        }
    }

    /// Runs the feed through normalization with this cache's whitelist.
    pub fn process_feed(&self, feed: &RawModelFeed) -> Vec<ProcessedModel> {
        match &self.whitelist {
            Some(whitelist) => {
                let allowed: &dyn Fn(&str) -> bool = &|provider| whitelist.is_whitelisted(provider);
                process(feed, Some(allowed))
            }
            None => process(feed, None),
        }
    }

    async fn fresh(&self) -> Option<Arc<Vec<ProcessedModel>>> {
        let snapshot = self.snapshot.read().await;
        snapshot
            .as_ref()
            .filter(|s| s.fetched_at.elapsed() < self.revalidate)
            .map(|s| Arc::clone(&s.models))
    }

    async fn stale(&self) -> Option<Arc<Vec<ProcessedModel>>> {
        let snapshot = self.snapshot.read().await;
        snapshot.as_ref().map(|s| Arc::clone(&s.models))
    }

    /// The current model list, fetching and processing the feed when the
    /// snapshot is missing or older than the revalidation window.
    ///
    /// A failed refresh keeps serving the previous snapshot if there is one;
    /// with a cold cache the error is returned.
    pub async fn models(&self) -> Result<Arc<Vec<ProcessedModel>>, CatalogError> {
        if let Some(models) = self.fresh().await {
            return Ok(models);
        }

        let _guard = self.refresh.lock().await;
        // Another caller may have refreshed while we waited.
        if let Some(models) = self.fresh().await {
            debug!("Catalog refreshed by a concurrent request");
            return Ok(models);
        }

        match self.client.fetch_feed().await {
            Ok(feed) => {
                let models = Arc::new(self.process_feed(&feed));
                info!(
                    "Processed {} of {} feed records",
                    models.len(),
                    feed.len()
                );
                *self.snapshot.write().await = Some(Snapshot {
                    models: Arc::clone(&models),
                    fetched_at: Instant::now(),
                });
                Ok(models)
            }
            Err(e) => match self.stale().await {
                Some(models) => {
                    warn!("Catalog refresh failed, serving previous snapshot: {e}");
                    Ok(models)
                }
                None => Err(e),
            },
        }
    }

    /// Drops the snapshot so the next call fetches again.
    pub async fn invalidate(&self) {
        *self.snapshot.write().await = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_from_models_serves_snapshot() {
        let model = ProcessedModel {
            id: "openai/gpt-4o".to_string(),
            name: "gpt-4o".to_string(),
            provider: "openai".to_string(),
            slug: "gpt-4o".to_string(),
            display_name: "gpt-4o".to_string(),
            data: Default::default(),
        };
        let cache = CatalogCache::from_models(vec![model.clone()]);
        let first = cache.models().await.unwrap();
        let second = cache.models().await.unwrap();
        assert_eq!(first.as_slice(), &[model]);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_process_feed_applies_whitelist() {
        let feed: RawModelFeed = serde_json::from_value(json!({
            "openai/gpt-4o": { "provider": "openai", "mode": "chat", "input_cost_per_token": 0.0000025 },
            "fireworks_ai/llama": { "provider": "fireworks_ai", "mode": "chat", "input_cost_per_token": 0.0000009 }
        }))
        .unwrap();

        let whitelisted = CatalogCache::new(
            FeedClient::new(),
            Some(ProviderWhitelist::default()),
            DEFAULT_REVALIDATE,
        );
        let ids: Vec<String> = whitelisted
            .process_feed(&feed)
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, vec!["openai/gpt-4o"]);

        let open = CatalogCache::new(FeedClient::new(), None, DEFAULT_REVALIDATE);
        assert_eq!(open.process_feed(&feed).len(), 2);
    }
}
