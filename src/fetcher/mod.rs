pub mod http;

use async_trait::async_trait;

use crate::app::Result;
use crate::domain::{FeedMeta, RawPost};

pub use http::HttpFetcher;

/// One fetched-and-parsed feed: the content adapter's output.
#[derive(Debug, Clone, Default)]
pub struct FetchedFeed {
    pub meta: FeedMeta,
    pub posts: Vec<RawPost>,
}

/// Boundary to the feed source. Fails with
/// [`TributaryError::Network`](crate::app::TributaryError::Network) for
/// transport problems and
/// [`TributaryError::InvalidFeed`](crate::app::TributaryError::InvalidFeed)
/// for content that fetched but did not parse.
#[async_trait]
pub trait Fetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedFeed>;
}
