use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use tributary::app::AppContext;
use tributary::cli::{commands, Cli, Commands};
use tributary::config::SyncConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut config = SyncConfig::default();
    if let Some(interval) = cli.interval {
        config.poll_interval_secs = interval;
    }
    if let Some(workers) = cli.workers {
        config.workers = workers;
    }

    let ctx = Arc::new(AppContext::new(config));

    match cli.command {
        Commands::Once { urls } => {
            commands::run_once(ctx, &urls).await;
        }
        Commands::Watch { urls } => {
            commands::watch(ctx, &urls).await?;
        }
    }

    Ok(())
}
