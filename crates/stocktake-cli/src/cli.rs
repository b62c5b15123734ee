use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "stocktake")]
#[command(about = "Inspect the on-device offline cache and pending-change queue")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Optional path to the local cache database file
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show sync status (pending count and last successful sync)
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Inspect or clear the pending-change queue
    Queue {
        #[command(subcommand)]
        command: QueueCommands,
    },
    /// Inspect cached domain snapshots
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },
}

#[derive(Subcommand)]
pub enum QueueCommands {
    /// List queued changes, oldest first
    List {
        /// Maximum number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete the whole queue
    Clear,
}

#[derive(Subcommand)]
pub enum CacheCommands {
    /// Dump a cached snapshot (items, categories, suppliers, rooms, counts)
    Show {
        /// Domain name
        domain: String,
    },
}
