use serde::{Deserialize, Serialize};

/// A single article belonging to a feed.
///
/// Posts are created once, on first discovery, and never updated or
/// removed afterwards except for the `is_read` flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub feed_id: i64,
    pub title: String,
    pub link: String,
    pub description: String,
    /// Raw publication timestamp from the source. Kept verbatim; the
    /// diff engine parses it only for ordering.
    pub published_at: String,
    pub is_read: bool,
}

impl Post {
    pub fn key(&self) -> PostKey {
        PostKey {
            title: self.title.clone(),
            link: self.link.clone(),
            description: self.description.clone(),
            published_at: self.published_at.clone(),
        }
    }

    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            "(Untitled)"
        } else {
            &self.title
        }
    }
}

/// An article as produced by the content adapter, before identity
/// assignment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawPost {
    pub title: String,
    pub link: String,
    pub description: String,
    pub published_at: String,
}

impl RawPost {
    pub fn key(&self) -> PostKey {
        PostKey {
            title: self.title.clone(),
            link: self.link.clone(),
            description: self.description.clone(),
            published_at: self.published_at.clone(),
        }
    }

    pub fn into_post(self, id: i64, feed_id: i64) -> Post {
        Post {
            id,
            feed_id,
            title: self.title,
            link: self.link,
            description: self.description,
            published_at: self.published_at,
            is_read: false,
        }
    }
}

/// Structural identity of a post: two posts with the same key are the
/// same post, regardless of assigned id or read state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PostKey {
    pub title: String,
    pub link: String,
    pub description: String,
    pub published_at: String,
}
