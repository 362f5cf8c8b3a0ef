pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tributary")]
#[command(about = "An in-memory RSS/Atom feed synchronization engine", long_about = None)]
pub struct Cli {
    /// Seconds between poll rounds
    #[arg(short, long, global = true)]
    pub interval: Option<u64>,

    /// Number of feeds fetched concurrently within a round
    #[arg(short, long, global = true)]
    pub workers: Option<usize>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Subscribe to the given feeds and run a single poll round
    Once {
        /// Feed URLs to subscribe to
        urls: Vec<String>,
    },
    /// Subscribe to the given feeds and poll them until interrupted
    Watch {
        /// Feed URLs to subscribe to
        urls: Vec<String>,
    },
}
