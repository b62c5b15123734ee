use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use stocktake_core::storage::SqliteStorage;
use stocktake_core::{CacheStore, PendingChange};

use crate::error::CliError;

/// Resolve the cache database path: explicit flag, then environment, then
/// the platform data directory.
pub fn resolve_db_path(cli_path: Option<PathBuf>) -> PathBuf {
    if let Some(path) = cli_path {
        return path;
    }
    if let Ok(path) = env::var("STOCKTAKE_DB_PATH") {
        return PathBuf::from(path);
    }
    dirs::data_dir().map_or_else(
        || PathBuf::from("stocktake-cache.db"),
        |dir| dir.join("stocktake").join("cache.db"),
    )
}

/// Open the cache store backing the CLI commands.
pub fn open_cache(db_path: &Path) -> Result<CacheStore, CliError> {
    tracing::debug!(path = %db_path.display(), "opening cache database");
    let storage = SqliteStorage::open(db_path)?;
    Ok(CacheStore::new(Arc::new(storage)))
}

/// One human-readable line per queued change.
pub fn format_change_line(change: &PendingChange) -> String {
    let queued_at = Utc
        .timestamp_millis_opt(change.queued_at)
        .single()
        .map_or_else(|| change.queued_at.to_string(), |t| t.to_rfc3339());
    format!(
        "{queued_at}  {id}  {kind:<13} {table}",
        id = change.id,
        kind = change.op.kind(),
        table = change.op.table(),
    )
}
