//! Sync conflict model

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How a detected conflict was resolved.
///
/// The policy is fixed: the remote record wins only when its timestamp is
/// strictly newer than the local one, so `server_newer` is currently the only
/// resolution ever produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictResolution {
    ServerNewer,
}

/// A detected divergence between a locally held record and the remote
/// version of the same record, matched by identifier.
///
/// Transient: produced by `check_conflicts`, consumed by `resolve_conflicts`,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conflict {
    /// Record identifier shared by both sides
    pub id: String,
    /// The local copy
    pub local: Value,
    /// The remote copy
    pub remote: Value,
    /// Resolution applied during merge
    pub resolution: ConflictResolution,
}
