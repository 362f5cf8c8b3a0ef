use thiserror::Error;

#[derive(Error, Debug)]
pub enum TributaryError {
    /// Malformed or empty URL, caught before any network call.
    #[error("invalid url: {0}")]
    Validation(String),

    /// The URL is already subscribed (or a subscription is in flight).
    #[error("already subscribed: {0}")]
    DuplicateFeed(String),

    /// Transport failure reaching the feed source.
    #[error("network error: {0}")]
    Network(String),

    /// Content fetched but not parseable as a feed.
    #[error("invalid feed: {0}")]
    InvalidFeed(String),

    #[error("feed not found: {0}")]
    FeedNotFound(i64),

    #[error("post not found: {0}")]
    PostNotFound(i64),

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for TributaryError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

impl From<url::ParseError> for TributaryError {
    fn from(err: url::ParseError) -> Self {
        Self::Validation(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TributaryError>;
