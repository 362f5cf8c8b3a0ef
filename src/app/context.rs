use std::sync::Arc;

use url::Url;

use crate::app::error::{Result, TributaryError};
use crate::config::SyncConfig;
use crate::domain::Feed;
use crate::fetcher::{Fetcher, HttpFetcher};
use crate::notify::{ChangeEvent, Notifier};
use crate::store::FeedStore;

/// Wires the store, fetcher, and notifier together and exposes the
/// user-facing operations.
///
/// Everything lives behind `Arc`s so the scheduler and any number of
/// independent contexts can share or not share state as they choose; no
/// module-level singletons.
pub struct AppContext {
    pub store: Arc<FeedStore>,
    pub fetcher: Arc<dyn Fetcher + Send + Sync>,
    pub notifier: Arc<Notifier>,
    pub config: SyncConfig,
}

impl AppContext {
    pub fn new(config: SyncConfig) -> Self {
        let fetcher: Arc<dyn Fetcher + Send + Sync> =
            Arc::new(HttpFetcher::with_timeout(config.fetch_timeout()));
        Self::with_fetcher(config, fetcher)
    }

    /// Build a context around any fetcher, the seam tests use.
    pub fn with_fetcher(config: SyncConfig, fetcher: Arc<dyn Fetcher + Send + Sync>) -> Self {
        let notifier = Arc::new(Notifier::new());
        let store = Arc::new(FeedStore::new(notifier.clone()));
        Self {
            store,
            fetcher,
            notifier,
            config,
        }
    }

    /// Subscribe to a feed URL.
    ///
    /// The URL is validated and reserved before any network call, so a
    /// concurrent subscribe for the same URL fails fast instead of
    /// racing the fetch. Exactly one authoritative outcome is published
    /// per attempt via [`ChangeEvent::ValidationChanged`].
    pub async fn subscribe(&self, url: &str) -> Result<Feed> {
        if let Err(err) = validate_url(url) {
            self.publish_outcome(&err);
            return Err(err);
        }

        if let Err(err) = self.store.reserve_url(url) {
            self.publish_outcome(&err);
            return Err(err);
        }

        let fetched = match self.fetcher.fetch(url).await {
            Ok(fetched) => fetched,
            Err(err) => {
                self.store.release_url(url);
                self.publish_outcome(&err);
                return Err(err);
            }
        };

        let feed = self.store.add_feed(url, fetched.meta, fetched.posts)?;
        self.notifier.notify(&ChangeEvent::ValidationChanged {
            message: "success".into(),
        });
        tracing::info!(url, feed_id = feed.id, "subscribed to feed");
        Ok(feed)
    }

    pub fn mark_read(&self, post_id: i64) -> Result<()> {
        self.store.mark_post_read(post_id)
    }

    fn publish_outcome(&self, err: &TributaryError) {
        let message = match err {
            TributaryError::Validation(reason) if reason == "empty url" => "empty url",
            TributaryError::Validation(_) => "invalid url",
            TributaryError::DuplicateFeed(_) => "already subscribed",
            TributaryError::Network(_) => "network error",
            _ => "invalid feed",
        };
        self.notifier.notify(&ChangeEvent::ValidationChanged {
            message: message.into(),
        });
    }
}

fn validate_url(raw: &str) -> Result<()> {
    if raw.trim().is_empty() {
        return Err(TributaryError::Validation("empty url".into()));
    }
    let url = Url::parse(raw)?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(TributaryError::Validation(format!(
            "unsupported scheme: {}",
            url.scheme()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_and_https() {
        assert!(validate_url("https://example.com/rss").is_ok());
        assert!(validate_url("http://example.com/rss").is_ok());
    }

    #[test]
    fn rejects_empty_and_garbage() {
        assert!(matches!(
            validate_url("").unwrap_err(),
            TributaryError::Validation(_)
        ));
        assert!(matches!(
            validate_url("   ").unwrap_err(),
            TributaryError::Validation(_)
        ));
        assert!(matches!(
            validate_url("not a url").unwrap_err(),
            TributaryError::Validation(_)
        ));
    }

    #[test]
    fn rejects_non_http_schemes() {
        assert!(matches!(
            validate_url("ftp://example.com/rss").unwrap_err(),
            TributaryError::Validation(_)
        ));
    }
}
