//! Read-time conflict detection and resolution
//!
//! Replay order cannot be guaranteed across devices, so divergence between a
//! cached collection and a freshly fetched remote collection is detected by
//! comparing record timestamps. The policy is whole-record last-write-wins:
//! a remote record replaces the local one only when its timestamp is
//! strictly newer. No field-level merge exists.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::models::{Conflict, ConflictResolution};

/// Compare a local and a remote collection, matched by `id_field`.
///
/// A conflict is flagged only when both sides carry a usable timestamp
/// (`updated_at`, falling back to `created_at`) and the remote one is
/// strictly newer. Records present on only one side are not conflicts, and
/// timestamp-less records are never flagged.
#[must_use]
pub fn check_conflicts(local: &[Value], remote: &[Value], id_field: &str) -> Vec<Conflict> {
    let by_id: HashMap<String, &Value> = local
        .iter()
        .filter_map(|record| Some((record_id(record, id_field)?, record)))
        .collect();

    let mut conflicts = Vec::new();
    for remote_record in remote {
        let Some(id) = record_id(remote_record, id_field) else {
            continue;
        };
        let Some(local_record) = by_id.get(&id) else {
            continue;
        };
        let (Some(local_ts), Some(remote_ts)) = (
            record_timestamp(local_record),
            record_timestamp(remote_record),
        ) else {
            continue;
        };
        if local_ts < remote_ts {
            tracing::debug!(%id, %local_ts, %remote_ts, "remote record is newer");
            conflicts.push(Conflict {
                id,
                local: (*local_record).clone(),
                remote: remote_record.clone(),
                resolution: ConflictResolution::ServerNewer,
            });
        }
    }
    conflicts
}

/// Apply a remote-wins merge for the flagged identifiers only.
///
/// Non-conflicting local records are preserved verbatim in their original
/// relative order; the remote version of each conflicted record is appended
/// at the end.
#[must_use]
pub fn resolve_conflicts(conflicts: &[Conflict], local: &[Value], id_field: &str) -> Vec<Value> {
    if conflicts.is_empty() {
        return local.to_vec();
    }

    let conflicted: HashSet<&str> = conflicts.iter().map(|c| c.id.as_str()).collect();
    let mut merged: Vec<Value> = local
        .iter()
        .filter(|record| {
            record_id(record, id_field)
                .is_none_or(|id| !conflicted.contains(id.as_str()))
        })
        .cloned()
        .collect();
    merged.extend(conflicts.iter().map(|c| c.remote.clone()));
    merged
}

/// Extract a record's identifier as a string (string or integer ids).
fn record_id(record: &Value, id_field: &str) -> Option<String> {
    match record.get(id_field)? {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

/// A record's modification time: `updated_at`, falling back to `created_at`.
///
/// Accepts RFC 3339 strings or Unix-millisecond integers; anything else
/// counts as "no timestamp".
fn record_timestamp(record: &Value) -> Option<DateTime<Utc>> {
    parse_timestamp(record.get("updated_at"))
        .or_else(|| parse_timestamp(record.get("created_at")))
}

fn parse_timestamp(value: Option<&Value>) -> Option<DateTime<Utc>> {
    match value? {
        Value::String(raw) => DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|time| time.with_timezone(&Utc)),
        Value::Number(ms) => Utc.timestamp_millis_opt(ms.as_i64()?).single(),
        _ => None,
    }
}
