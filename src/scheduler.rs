//! Drives repeated, concurrent polling of every subscribed feed.
//!
//! The loop alternates between two states: a round in flight, and an
//! idle delay. A round snapshots the feed list, fetches and merges
//! every feed concurrently (bounded by a worker semaphore), and only
//! finishes once every per-feed task has settled. Individual failures
//! are logged and counted, never propagated to sibling feeds. Feeds
//! subscribed mid-round are picked up by the next round's snapshot,
//! which also guarantees a feed never has two in-flight updates.

use std::sync::Arc;

use tokio::sync::{watch, Semaphore};
use tokio::task::JoinHandle;

use crate::app::{AppContext, Result};
use crate::domain::Feed;

/// Outcome of one complete pass over the subscribed feeds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoundSummary {
    pub feeds_polled: usize,
    pub new_posts: usize,
    pub failures: usize,
}

pub struct Scheduler {
    ctx: Arc<AppContext>,
    semaphore: Arc<Semaphore>,
}

impl Scheduler {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        let workers = ctx.config.workers.max(1);
        Self {
            ctx,
            semaphore: Arc::new(Semaphore::new(workers)),
        }
    }

    /// Run one round: poll every currently subscribed feed and wait for
    /// all of them to settle.
    pub async fn run_round(&self) -> RoundSummary {
        let feeds = self.ctx.store.feeds();
        let mut summary = RoundSummary {
            feeds_polled: feeds.len(),
            ..RoundSummary::default()
        };

        let mut handles = Vec::with_capacity(feeds.len());
        for feed in feeds {
            let ctx = self.ctx.clone();
            let semaphore = self.semaphore.clone();

            let handle: JoinHandle<(Feed, Result<usize>)> = tokio::spawn(async move {
                let _permit = semaphore.acquire().await.expect("semaphore closed");
                let result = poll_feed(&ctx, &feed).await;
                (feed, result)
            });
            handles.push(handle);
        }

        for handle in handles {
            match handle.await {
                Ok((feed, Ok(count))) => {
                    summary.new_posts += count;
                    if count > 0 {
                        tracing::info!(url = %feed.url, count, "new posts");
                    }
                }
                Ok((feed, Err(err))) => {
                    summary.failures += 1;
                    tracing::warn!(url = %feed.url, error = %err, "feed update failed");
                }
                Err(err) => {
                    summary.failures += 1;
                    tracing::error!(error = %err, "feed update task panicked");
                }
            }
        }

        tracing::debug!(
            feeds = summary.feeds_polled,
            new_posts = summary.new_posts,
            failures = summary.failures,
            "round complete"
        );
        summary
    }

    /// Start the polling loop: an immediate first round, then one round
    /// per interval elapsed after the previous round completed.
    pub fn spawn(self) -> SchedulerHandle {
        let (stop_tx, mut stop_rx) = watch::channel(false);
        let interval = self.ctx.config.poll_interval();

        let join = tokio::spawn(async move {
            loop {
                self.run_round().await;

                tokio::select! {
                    _ = stop_rx.changed() => break,
                    _ = tokio::time::sleep(interval) => {}
                }
            }
            tracing::debug!("scheduler stopped");
        });

        SchedulerHandle { stop_tx, join }
    }
}

async fn poll_feed(ctx: &AppContext, feed: &Feed) -> Result<usize> {
    let fetched = ctx.fetcher.fetch(&feed.url).await?;
    let new_posts = ctx.store.update_feed(feed.id, fetched.meta, fetched.posts)?;
    Ok(new_posts.len())
}

/// Cancellation handle for a spawned scheduler. Stopping lets an
/// in-flight round finish; it only interrupts the idle delay.
pub struct SchedulerHandle {
    stop_tx: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl SchedulerHandle {
    pub async fn stop(self) {
        let _ = self.stop_tx.send(true);
        let _ = self.join.await;
    }
}
