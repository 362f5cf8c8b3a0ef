use std::ops::Range;

/// Issues new, globally unique, strictly increasing identifiers for
/// feeds and posts.
///
/// The counters are explicit rather than derived from the last stored
/// record, so identifier order never depends on collection order.
/// Callers must consult the assigner only when committing records;
/// rejected content never burns ids, though holes from failed commits
/// are harmless.
#[derive(Debug)]
pub struct IdAssigner {
    next_feed: i64,
    next_post: i64,
}

impl Default for IdAssigner {
    fn default() -> Self {
        Self::new()
    }
}

impl IdAssigner {
    pub fn new() -> Self {
        Self {
            next_feed: 1,
            next_post: 1,
        }
    }

    /// Next feed id, strictly greater than every id issued before.
    pub fn next_feed_id(&mut self) -> i64 {
        let id = self.next_feed;
        self.next_feed += 1;
        id
    }

    /// `count` consecutive post ids, all strictly greater than every
    /// post id issued before.
    pub fn next_post_ids(&mut self, count: usize) -> Range<i64> {
        let start = self.next_post;
        self.next_post += count as i64;
        start..self.next_post
    }
}
