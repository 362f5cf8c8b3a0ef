//! The single authoritative in-memory collection of feeds and posts.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use crate::app::{Result, TributaryError};
use crate::diff;
use crate::domain::{Feed, FeedMeta, Post, RawPost};
use crate::ids::IdAssigner;
use crate::notify::{ChangeEvent, Notifier};

/// In-memory merge store.
///
/// Every mutation takes the inner lock exactly once, so readers only
/// ever observe post-commit snapshots. Change events are emitted after
/// the lock is released, which lets subscribers read the store from
/// their callbacks.
pub struct FeedStore {
    inner: Mutex<StoreInner>,
    notifier: Arc<Notifier>,
}

struct StoreInner {
    feeds: Vec<Feed>,
    posts: Vec<Post>,
    /// URLs claimed by an in-flight subscription, before its fetch has
    /// resolved. Keeps a second subscribe for the same URL from racing
    /// the first.
    reserved_urls: HashSet<String>,
    ids: IdAssigner,
}

impl FeedStore {
    pub fn new(notifier: Arc<Notifier>) -> Self {
        Self {
            inner: Mutex::new(StoreInner {
                feeds: Vec::new(),
                posts: Vec::new(),
                reserved_urls: HashSet::new(),
                ids: IdAssigner::new(),
            }),
            notifier,
        }
    }

    pub fn notifier(&self) -> &Arc<Notifier> {
        &self.notifier
    }

    /// Atomically claim `url` before starting the asynchronous fetch.
    ///
    /// Fails with [`TributaryError::DuplicateFeed`] if the URL is
    /// already subscribed or already claimed. The claim must be
    /// consumed by [`FeedStore::add_feed`] or returned via
    /// [`FeedStore::release_url`].
    pub fn reserve_url(&self, url: &str) -> Result<()> {
        let mut inner = self.lock();
        let taken = inner.feeds.iter().any(|feed| feed.url == url)
            || !inner.reserved_urls.insert(url.to_string());
        if taken {
            return Err(TributaryError::DuplicateFeed(url.to_string()));
        }
        Ok(())
    }

    /// Give back a reservation whose fetch failed.
    pub fn release_url(&self, url: &str) {
        self.lock().reserved_urls.remove(url);
    }

    /// Commit a brand-new feed together with all of its posts.
    ///
    /// On first add every raw post is novel, so the whole candidate set
    /// is date-sorted and given consecutive ids. The feed and its posts
    /// are inserted together; nothing is committed on rejection.
    pub fn add_feed(&self, url: &str, meta: FeedMeta, raw_posts: Vec<RawPost>) -> Result<Feed> {
        let feed = {
            let mut inner = self.lock();
            if inner.feeds.iter().any(|feed| feed.url == url) {
                return Err(TributaryError::DuplicateFeed(url.to_string()));
            }
            inner.reserved_urls.remove(url);

            let feed_id = inner.ids.next_feed_id();
            let feed = Feed {
                id: feed_id,
                url: url.to_string(),
                title: meta.title,
                description: meta.description,
                last_published_at: meta.published_at,
            };

            let sorted = diff::diff([], raw_posts);
            let ids = inner.ids.next_post_ids(sorted.len());
            let posts: Vec<Post> = sorted
                .into_iter()
                .zip(ids)
                .map(|(raw, id)| raw.into_post(id, feed_id))
                .collect();

            inner.feeds.push(feed.clone());
            inner.posts.extend(posts);
            feed
        };

        self.notifier.notify(&ChangeEvent::FeedAdded { feed_id: feed.id });
        Ok(feed)
    }

    /// Merge a fresh fetch into an existing feed.
    ///
    /// Novel posts get new ids and are appended; the feed's descriptive
    /// fields are refreshed in place either way. A fetch with nothing
    /// new is a no-op and emits no event.
    pub fn update_feed(
        &self,
        feed_id: i64,
        meta: FeedMeta,
        raw_posts: Vec<RawPost>,
    ) -> Result<Vec<Post>> {
        let new_posts = {
            let mut inner = self.lock();
            let feed_index = inner
                .feeds
                .iter()
                .position(|feed| feed.id == feed_id)
                .ok_or(TributaryError::FeedNotFound(feed_id))?;

            let existing = inner.posts.iter().filter(|post| post.feed_id == feed_id);
            let novel = diff::diff(existing, raw_posts);

            let ids = inner.ids.next_post_ids(novel.len());
            let new_posts: Vec<Post> = novel
                .into_iter()
                .zip(ids)
                .map(|(raw, id)| raw.into_post(id, feed_id))
                .collect();

            let feed = &mut inner.feeds[feed_index];
            feed.title = meta.title;
            feed.description = meta.description;
            feed.last_published_at = meta.published_at;

            inner.posts.extend(new_posts.iter().cloned());
            new_posts
        };

        if !new_posts.is_empty() {
            self.notifier.notify(&ChangeEvent::PostsUpdated {
                feed_id,
                new_posts: new_posts.iter().map(|post| post.id).collect(),
            });
        }
        Ok(new_posts)
    }

    /// Mark a post read. Idempotent; the event fires only on the first
    /// transition.
    pub fn mark_post_read(&self, post_id: i64) -> Result<()> {
        let transitioned = {
            let mut inner = self.lock();
            let post = inner
                .posts
                .iter_mut()
                .find(|post| post.id == post_id)
                .ok_or(TributaryError::PostNotFound(post_id))?;
            let transitioned = !post.is_read;
            post.is_read = true;
            transitioned
        };

        if transitioned {
            self.notifier.notify(&ChangeEvent::PostRead { post_id });
        }
        Ok(())
    }

    pub fn feeds(&self) -> Vec<Feed> {
        self.lock().feeds.clone()
    }

    pub fn feed_by_url(&self, url: &str) -> Option<Feed> {
        self.lock().feeds.iter().find(|feed| feed.url == url).cloned()
    }

    pub fn posts(&self) -> Vec<Post> {
        self.lock().posts.clone()
    }

    pub fn posts_for_feed(&self, feed_id: i64) -> Vec<Post> {
        self.lock()
            .posts
            .iter()
            .filter(|post| post.feed_id == feed_id)
            .cloned()
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StoreInner> {
        self.inner.lock().expect("store mutex poisoned")
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex as StdMutex;

    use super::*;
    use crate::notify::EventKind;

    fn store() -> FeedStore {
        FeedStore::new(Arc::new(Notifier::new()))
    }

    fn meta(title: &str) -> FeedMeta {
        FeedMeta {
            title: title.into(),
            description: format!("{title} description"),
            published_at: "Wed, 01 Jan 2020 00:00:00 GMT".into(),
        }
    }

    fn raw(title: &str, published_at: &str) -> RawPost {
        RawPost {
            title: title.into(),
            link: format!("https://example.com/{title}"),
            description: format!("about {title}"),
            published_at: published_at.into(),
        }
    }

    #[test]
    fn add_feed_assigns_ids_in_date_order() {
        let store = store();
        let feed = store
            .add_feed(
                "https://example.com/rss",
                meta("Example"),
                vec![
                    raw("A", "Thu, 02 Jan 2020 00:00:00 GMT"),
                    raw("B", "Wed, 01 Jan 2020 00:00:00 GMT"),
                ],
            )
            .unwrap();

        assert_eq!(feed.id, 1);

        let posts = store.posts_for_feed(feed.id);
        let by_title = |title: &str| posts.iter().find(|p| p.title == title).unwrap().id;
        // Earlier post gets the lower id.
        assert_eq!(by_title("B"), 1);
        assert_eq!(by_title("A"), 2);
    }

    #[test]
    fn duplicate_url_is_rejected_without_commit() {
        let store = store();
        store
            .add_feed("https://example.com/rss", meta("One"), vec![])
            .unwrap();

        let err = store
            .add_feed("https://example.com/rss", meta("Two"), vec![raw("X", "")])
            .unwrap_err();
        assert!(matches!(err, TributaryError::DuplicateFeed(_)));
        assert_eq!(store.feeds().len(), 1);
        assert!(store.posts().is_empty());
    }

    #[test]
    fn update_appends_only_novel_posts() {
        let store = store();
        let feed = store
            .add_feed(
                "https://example.com/rss",
                meta("Example"),
                vec![
                    raw("A", "Thu, 02 Jan 2020 00:00:00 GMT"),
                    raw("B", "Wed, 01 Jan 2020 00:00:00 GMT"),
                ],
            )
            .unwrap();

        let new_posts = store
            .update_feed(
                feed.id,
                meta("Example"),
                vec![
                    raw("A", "Thu, 02 Jan 2020 00:00:00 GMT"),
                    raw("B", "Wed, 01 Jan 2020 00:00:00 GMT"),
                    raw("C", "Fri, 03 Jan 2020 00:00:00 GMT"),
                ],
            )
            .unwrap();

        assert_eq!(new_posts.len(), 1);
        assert_eq!(new_posts[0].title, "C");
        assert_eq!(new_posts[0].id, 3);
        assert_eq!(store.posts_for_feed(feed.id).len(), 3);
    }

    #[test]
    fn identical_update_is_a_silent_noop() {
        let notifier = Arc::new(Notifier::new());
        let updates = Arc::new(StdMutex::new(0u32));
        let counter = updates.clone();
        notifier.subscribe(EventKind::PostsUpdated, move |_| {
            *counter.lock().unwrap() += 1;
        });

        let store = FeedStore::new(notifier);
        let posts = vec![
            raw("A", "Thu, 02 Jan 2020 00:00:00 GMT"),
            raw("B", "Wed, 01 Jan 2020 00:00:00 GMT"),
        ];
        let feed = store
            .add_feed("https://example.com/rss", meta("Example"), posts.clone())
            .unwrap();

        let new_posts = store.update_feed(feed.id, meta("Example"), posts).unwrap();
        assert!(new_posts.is_empty());
        assert_eq!(*updates.lock().unwrap(), 0);
        assert_eq!(store.posts().len(), 2);
    }

    #[test]
    fn update_refreshes_feed_meta_in_place() {
        let store = store();
        let feed = store
            .add_feed("https://example.com/rss", meta("Old"), vec![])
            .unwrap();

        let refreshed = FeedMeta {
            title: "New".into(),
            description: "new description".into(),
            published_at: "Sat, 04 Jan 2020 00:00:00 GMT".into(),
        };
        store.update_feed(feed.id, refreshed, vec![]).unwrap();

        let feed = store.feed_by_url("https://example.com/rss").unwrap();
        assert_eq!(feed.title, "New");
        assert_eq!(feed.last_published_at, "Sat, 04 Jan 2020 00:00:00 GMT");
        // Same feed, same id.
        assert_eq!(store.feeds().len(), 1);
    }

    #[test]
    fn update_unknown_feed_fails() {
        let store = store();
        let err = store.update_feed(42, meta("X"), vec![]).unwrap_err();
        assert!(matches!(err, TributaryError::FeedNotFound(42)));
    }

    #[test]
    fn post_ids_stay_monotonic_across_feeds() {
        let store = store();
        let one = store
            .add_feed(
                "https://example.com/one",
                meta("One"),
                vec![raw("A", "Wed, 01 Jan 2020 00:00:00 GMT")],
            )
            .unwrap();
        let two = store
            .add_feed(
                "https://example.com/two",
                meta("Two"),
                vec![raw("B", "Wed, 01 Jan 2020 00:00:00 GMT")],
            )
            .unwrap();
        let newer = store
            .update_feed(
                one.id,
                meta("One"),
                vec![
                    raw("A", "Wed, 01 Jan 2020 00:00:00 GMT"),
                    raw("C", "Thu, 02 Jan 2020 00:00:00 GMT"),
                ],
            )
            .unwrap();

        let max_before = store
            .posts_for_feed(two.id)
            .iter()
            .chain(store.posts_for_feed(one.id).iter())
            .filter(|post| post.title != "C")
            .map(|post| post.id)
            .max()
            .unwrap();
        assert!(newer[0].id > max_before);
    }

    #[test]
    fn mark_read_is_idempotent_and_fires_once() {
        let notifier = Arc::new(Notifier::new());
        let reads = Arc::new(StdMutex::new(0u32));
        let counter = reads.clone();
        notifier.subscribe(EventKind::PostRead, move |_| {
            *counter.lock().unwrap() += 1;
        });

        let store = FeedStore::new(notifier);
        let feed = store
            .add_feed(
                "https://example.com/rss",
                meta("Example"),
                vec![raw("A", "Wed, 01 Jan 2020 00:00:00 GMT")],
            )
            .unwrap();
        let post_id = store.posts_for_feed(feed.id)[0].id;

        store.mark_post_read(post_id).unwrap();
        store.mark_post_read(post_id).unwrap();

        assert!(store.posts_for_feed(feed.id)[0].is_read);
        assert_eq!(*reads.lock().unwrap(), 1);
    }

    #[test]
    fn mark_read_unknown_post_fails() {
        let store = store();
        let err = store.mark_post_read(99).unwrap_err();
        assert!(matches!(err, TributaryError::PostNotFound(99)));
    }

    #[test]
    fn reservation_blocks_second_subscribe() {
        let store = store();
        store.reserve_url("https://example.com/rss").unwrap();

        let err = store.reserve_url("https://example.com/rss").unwrap_err();
        assert!(matches!(err, TributaryError::DuplicateFeed(_)));

        // A failed fetch gives the URL back.
        store.release_url("https://example.com/rss");
        store.reserve_url("https://example.com/rss").unwrap();
    }

    #[test]
    fn add_feed_consumes_reservation() {
        let store = store();
        store.reserve_url("https://example.com/rss").unwrap();
        store
            .add_feed("https://example.com/rss", meta("Example"), vec![])
            .unwrap();

        // Committed feeds stay blocked through the feed list itself.
        let err = store.reserve_url("https://example.com/rss").unwrap_err();
        assert!(matches!(err, TributaryError::DuplicateFeed(_)));
    }

    #[test]
    fn no_two_posts_share_a_structural_key() {
        let store = store();
        let feed = store
            .add_feed(
                "https://example.com/rss",
                meta("Example"),
                vec![
                    raw("A", "Wed, 01 Jan 2020 00:00:00 GMT"),
                    raw("A", "Wed, 01 Jan 2020 00:00:00 GMT"),
                ],
            )
            .unwrap();

        // The source repeated the item; only one copy may land, and a
        // repeat update must not add more.
        store
            .update_feed(
                feed.id,
                meta("Example"),
                vec![raw("A", "Wed, 01 Jan 2020 00:00:00 GMT")],
            )
            .unwrap();

        let posts = store.posts_for_feed(feed.id);
        assert_eq!(posts.len(), 1);
    }
}
