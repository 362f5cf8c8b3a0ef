use serde::{Deserialize, Serialize};

/// A subscribed feed and its descriptive metadata.
///
/// Feeds are created once, when their URL is first successfully
/// subscribed, and only ever updated in place afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feed {
    pub id: i64,
    pub url: String,
    pub title: String,
    pub description: String,
    /// Raw publication timestamp from the source, refreshed on every
    /// successful poll.
    pub last_published_at: String,
}

impl Feed {
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            &self.url
        } else {
            &self.title
        }
    }
}

/// Descriptive fields of a feed as produced by the content adapter,
/// before any identity has been assigned.
#[derive(Debug, Clone, Default)]
pub struct FeedMeta {
    pub title: String,
    pub description: String,
    pub published_at: String,
}
