//! Sync status surface consumed by UI layers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Point-in-time sync status, assembled on demand from the cache store and
/// the engine's replay guard. Intended for polling by banners/indicators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncStatus {
    /// Time of the most recent successful replay, if any
    pub last_sync: Option<DateTime<Utc>>,
    /// Number of queued changes not yet applied remotely
    pub pending: usize,
    /// Whether a replay is currently in flight
    pub syncing: bool,
}
