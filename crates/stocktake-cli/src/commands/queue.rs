use std::path::Path;

use crate::commands::common::{format_change_line, open_cache};
use crate::error::CliError;

pub async fn run_list(limit: usize, as_json: bool, db_path: &Path) -> Result<(), CliError> {
    let cache = open_cache(db_path)?;
    let mut changes = cache.pending_changes().await;
    changes.truncate(limit);

    if as_json {
        println!("{}", serde_json::to_string_pretty(&changes)?);
    } else if changes.is_empty() {
        println!("Queue is empty");
    } else {
        for change in &changes {
            println!("{}", format_change_line(change));
        }
    }

    Ok(())
}

pub async fn run_clear(db_path: &Path) -> Result<(), CliError> {
    let cache = open_cache(db_path)?;
    let count = cache.pending_count().await;
    cache.clear_pending().await;
    println!("Cleared {count} pending changes");
    Ok(())
}
