use std::sync::Arc;

use crate::app::AppContext;
use crate::notify::{ChangeEvent, EventKind};
use crate::scheduler::Scheduler;

/// Subscribe to each URL, reporting failures without aborting the rest.
pub async fn subscribe_all(ctx: &Arc<AppContext>, urls: &[String]) {
    for url in urls {
        match ctx.subscribe(url).await {
            Ok(feed) => println!("subscribed: {} ({})", feed.display_title(), feed.url),
            Err(err) => eprintln!("skipping {url}: {err}"),
        }
    }
}

/// Subscribe, run one round, and print what arrived.
pub async fn run_once(ctx: Arc<AppContext>, urls: &[String]) {
    subscribe_all(&ctx, urls).await;

    let summary = Scheduler::new(ctx.clone()).run_round().await;
    println!(
        "round complete: {} feeds, {} new posts, {} failures",
        summary.feeds_polled, summary.new_posts, summary.failures
    );

    for post in ctx.store.posts() {
        println!("  [{}] {} ({})", post.id, post.display_title(), post.published_at);
    }
}

/// Subscribe and poll until Ctrl-C.
pub async fn watch(ctx: Arc<AppContext>, urls: &[String]) -> anyhow::Result<()> {
    ctx.notifier.subscribe(EventKind::PostsUpdated, |event| {
        if let ChangeEvent::PostsUpdated { feed_id, new_posts } = event {
            println!("feed {feed_id}: {} new posts", new_posts.len());
        }
    });

    subscribe_all(&ctx, urls).await;

    let handle = Scheduler::new(ctx).spawn();
    tokio::signal::ctrl_c().await?;
    handle.stop().await;
    Ok(())
}
