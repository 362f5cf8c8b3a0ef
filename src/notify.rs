//! Typed change notification for store mutations.
//!
//! Consumers register interest in a named mutation class and receive
//! each matching event synchronously, in registration order, before the
//! mutating caller proceeds. There is no queueing and no coalescing:
//! three feeds picking up new posts in one round fire three independent
//! [`ChangeEvent::PostsUpdated`] events, so subscribers must be
//! idempotent under repeated delivery.

use std::sync::Mutex;

/// A single mutation of the store, tagged by class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
    FeedAdded { feed_id: i64 },
    PostsUpdated { feed_id: i64, new_posts: Vec<i64> },
    PostRead { post_id: i64 },
    ValidationChanged { message: String },
}

impl ChangeEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::FeedAdded { .. } => EventKind::FeedAdded,
            Self::PostsUpdated { .. } => EventKind::PostsUpdated,
            Self::PostRead { .. } => EventKind::PostRead,
            Self::ValidationChanged { .. } => EventKind::ValidationChanged,
        }
    }
}

/// Subscription address: the class of mutation a consumer wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    FeedAdded,
    PostsUpdated,
    PostRead,
    ValidationChanged,
}

type Callback = Box<dyn Fn(&ChangeEvent) + Send + Sync>;

#[derive(Default)]
pub struct Notifier {
    subscribers: Mutex<Vec<(EventKind, Callback)>>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for every future event of class `kind`.
    pub fn subscribe<F>(&self, kind: EventKind, callback: F)
    where
        F: Fn(&ChangeEvent) + Send + Sync + 'static,
    {
        self.subscribers
            .lock()
            .expect("notifier mutex poisoned")
            .push((kind, Box::new(callback)));
    }

    /// Deliver `event` to every matching subscriber, in registration
    /// order, on the calling thread.
    pub fn notify(&self, event: &ChangeEvent) {
        let subscribers = self.subscribers.lock().expect("notifier mutex poisoned");
        for (kind, callback) in subscribers.iter() {
            if *kind == event.kind() {
                callback(event);
            }
        }
    }
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self
            .subscribers
            .lock()
            .map(|subs| subs.len())
            .unwrap_or(0);
        f.debug_struct("Notifier").field("subscribers", &count).finish()
    }
}
