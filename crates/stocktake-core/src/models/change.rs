//! Pending change model
//!
//! A `PendingChange` is one queued mutation that has not yet been confirmed
//! applied to the remote store. It survives process restarts in the local
//! cache store and is removed only after its remote application succeeds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// A unique identifier for a queued change, using UUID v7 (time-sortable)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChangeId(Uuid);

impl ChangeId {
    /// Create a new unique change ID using UUID v7
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for ChangeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ChangeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ChangeId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// One per-item count record inside an `upsert_counts` payload.
///
/// `item_id` identifies the counted inventory item; all remaining columns
/// (count, unit, notes, ...) ride along untyped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountRow {
    pub item_id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl CountRow {
    /// Build the remote insert row, injecting the owning room's id.
    #[must_use]
    pub fn to_row(&self, room_id: &str) -> Value {
        let mut row = self.fields.clone();
        row.insert("item_id".to_string(), Value::String(self.item_id.clone()));
        row.insert("room_id".to_string(), Value::String(room_id.to_string()));
        Value::Object(row)
    }
}

/// The mutation carried by a pending change, tagged by `type` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChangeOp {
    /// Insert a new record into `table`
    Insert {
        table: String,
        fields: Map<String, Value>,
    },
    /// Patch the record identified by `id` in `table`
    Update {
        table: String,
        id: String,
        fields: Map<String, Value>,
    },
    /// Delete the record identified by `id` from `table`
    Delete { table: String, id: String },
    /// Replace a room's item counts: delete the count rows for exactly the
    /// item ids present in `items`, then insert the new rows
    UpsertCounts {
        table: String,
        room_id: String,
        items: Vec<CountRow>,
    },
}

impl ChangeOp {
    /// Target table of this mutation.
    #[must_use]
    pub fn table(&self) -> &str {
        match self {
            Self::Insert { table, .. }
            | Self::Update { table, .. }
            | Self::Delete { table, .. }
            | Self::UpsertCounts { table, .. } => table,
        }
    }

    /// Wire name of this mutation kind, for logging.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Insert { .. } => "insert",
            Self::Update { .. } => "update",
            Self::Delete { .. } => "delete",
            Self::UpsertCounts { .. } => "upsert_counts",
        }
    }
}

/// A queued mutation awaiting remote application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingChange {
    /// Unique identifier (wire key `change_id`; plain `id` names the target
    /// record inside update/delete payloads)
    #[serde(rename = "change_id")]
    pub id: ChangeId,
    /// The mutation itself
    #[serde(flatten)]
    pub op: ChangeOp,
    /// Enqueue timestamp (Unix ms)
    pub queued_at: i64,
}

impl PendingChange {
    /// Wrap a mutation with a fresh id and the current enqueue time.
    #[must_use]
    pub fn new(op: ChangeOp) -> Self {
        Self {
            id: ChangeId::new(),
            op,
            queued_at: chrono::Utc::now().timestamp_millis(),
        }
    }
}
