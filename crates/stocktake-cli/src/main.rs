//! Stocktake CLI - inspect the on-device offline cache and pending queue
//!
//! Read-only helpers for support and debugging: show sync status, list or
//! clear the pending-change queue, and dump cached domain snapshots.

mod cli;
mod commands;
mod error;

use clap::Parser;

use cli::{CacheCommands, Cli, Commands, QueueCommands};
use error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("stocktake=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let db_path = commands::resolve_db_path(cli.db_path);

    match cli.command {
        Commands::Status { json } => commands::status::run_status(json, &db_path).await?,
        Commands::Queue { command } => match command {
            QueueCommands::List { limit, json } => {
                commands::queue::run_list(limit, json, &db_path).await?;
            }
            QueueCommands::Clear => commands::queue::run_clear(&db_path).await?,
        },
        Commands::Cache { command } => match command {
            CacheCommands::Show { domain } => commands::cache::run_show(&domain, &db_path).await?,
        },
    }

    Ok(())
}
