use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::commands::common::open_cache;
use crate::error::CliError;

#[derive(Serialize)]
struct StatusOutput {
    pending: usize,
    last_sync: Option<DateTime<Utc>>,
}

pub async fn run_status(as_json: bool, db_path: &Path) -> Result<(), CliError> {
    let cache = open_cache(db_path)?;
    let output = StatusOutput {
        pending: cache.pending_count().await,
        last_sync: cache.last_sync().await,
    };

    if as_json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("Pending changes: {}", output.pending);
        match output.last_sync {
            Some(time) => println!("Last sync: {}", time.to_rfc3339()),
            None => println!("Last sync: never"),
        }
    }

    Ok(())
}
