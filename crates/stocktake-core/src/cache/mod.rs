//! Local cache store
//!
//! Durable, namespaced persistence for cached domain snapshots and the
//! pending-change queue. This layer is the durability floor: every operation
//! is best-effort, and a corrupt or unavailable local store degrades to
//! "nothing cached" rather than surfacing an error to the caller. Failures
//! are logged via `tracing` and swallowed.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::models::{Domain, PendingChange};
use crate::storage::KeyValueStorage;

/// Key holding the pending-change queue (JSON array).
const PENDING_CHANGES_KEY: &str = "pending_changes";

/// Key holding the last successful sync time (RFC 3339).
const LAST_SYNC_KEY: &str = "last_sync";

/// JSON cache over a durable key/value storage backend.
#[derive(Clone)]
pub struct CacheStore {
    storage: Arc<dyn KeyValueStorage>,
}

impl CacheStore {
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// Overwrite a domain's cached snapshot wholesale.
    ///
    /// A caching failure must never abort the write path that triggered it,
    /// so errors are logged and dropped here.
    pub async fn cache_snapshot<T: Serialize + ?Sized>(&self, domain: Domain, rows: &T) {
        let payload = match serde_json::to_string(rows) {
            Ok(payload) => payload,
            Err(error) => {
                tracing::warn!(%domain, %error, "failed to serialize snapshot");
                return;
            }
        };
        self.write(domain.key(), &payload).await;
    }

    /// Read a domain's cached snapshot.
    ///
    /// Returns `None` when the key is absent or its value fails to decode;
    /// decode failures are logged, not raised.
    pub async fn snapshot<T: DeserializeOwned>(&self, domain: Domain) -> Option<T> {
        let raw = self.read(domain.key()).await?;
        match serde_json::from_str(&raw) {
            Ok(rows) => Some(rows),
            Err(error) => {
                tracing::warn!(%domain, %error, "discarding corrupt cached snapshot");
                None
            }
        }
    }

    /// Convenience form of [`Self::snapshot`] for untyped rows.
    pub async fn snapshot_rows(&self, domain: Domain) -> Vec<Value> {
        self.snapshot(domain).await.unwrap_or_default()
    }

    /// Append a change to the pending queue (read-modify-write, never a
    /// blind overwrite — previously queued entries are preserved).
    pub async fn save_pending(&self, change: &PendingChange) {
        let mut queue = self.pending_changes().await;
        queue.push(change.clone());
        self.write_queue(&queue).await;
    }

    /// Current pending queue, in enqueue order.
    ///
    /// Entries are decoded individually: a corrupt or unrecognized entry is
    /// logged and skipped rather than poisoning the whole queue, and gets
    /// purged on the next queue rewrite.
    pub async fn pending_changes(&self) -> Vec<PendingChange> {
        let Some(raw) = self.read(PENDING_CHANGES_KEY).await else {
            return Vec::new();
        };
        let entries: Vec<Value> = match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(error) => {
                tracing::warn!(%error, "discarding corrupt pending-change queue");
                return Vec::new();
            }
        };
        entries
            .into_iter()
            .filter_map(|entry| match serde_json::from_value(entry) {
                Ok(change) => Some(change),
                Err(error) => {
                    tracing::warn!(%error, "dropping undecodable pending change");
                    None
                }
            })
            .collect()
    }

    /// Number of queued changes.
    pub async fn pending_count(&self) -> usize {
        self.pending_changes().await.len()
    }

    /// Rewrite the queue to contain exactly `changes` (the still-failed
    /// survivors of a replay). An empty slice removes the key.
    pub async fn replace_pending(&self, changes: &[PendingChange]) {
        if changes.is_empty() {
            self.clear_pending().await;
        } else {
            self.write_queue(changes).await;
        }
    }

    /// Delete the queue key entirely.
    pub async fn clear_pending(&self) {
        if let Err(error) = self.storage.remove_item(PENDING_CHANGES_KEY).await {
            tracing::warn!(%error, "failed to clear pending-change queue");
        }
    }

    /// Record now as the last successful sync time.
    pub async fn update_last_sync(&self) {
        self.write(LAST_SYNC_KEY, &Utc::now().to_rfc3339()).await;
    }

    /// Time of the last successful sync, if recorded.
    pub async fn last_sync(&self) -> Option<DateTime<Utc>> {
        let raw = self.read(LAST_SYNC_KEY).await?;
        match DateTime::parse_from_rfc3339(&raw) {
            Ok(time) => Some(time.with_timezone(&Utc)),
            Err(error) => {
                tracing::warn!(%error, "discarding corrupt last-sync marker");
                None
            }
        }
    }

    async fn write_queue(&self, changes: &[PendingChange]) {
        match serde_json::to_string(changes) {
            Ok(payload) => self.write(PENDING_CHANGES_KEY, &payload).await,
            Err(error) => {
                tracing::error!(%error, "failed to serialize pending-change queue");
            }
        }
    }

    async fn read(&self, key: &str) -> Option<String> {
        match self.storage.get_item(key).await {
            Ok(value) => value,
            Err(error) => {
                tracing::warn!(key, %error, "local storage read failed");
                None
            }
        }
    }

    async fn write(&self, key: &str, value: &str) {
        if let Err(error) = self.storage.set_item(key, value).await {
            tracing::warn!(key, %error, "local storage write failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChangeOp;
    use crate::storage::MemoryStorage;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn store() -> (Arc<MemoryStorage>, CacheStore) {
        let storage = Arc::new(MemoryStorage::new());
        let cache = CacheStore::new(storage.clone());
        (storage, cache)
    }

    fn delete_change(id: &str) -> PendingChange {
        PendingChange::new(ChangeOp::Delete {
            table: "rooms".to_string(),
            id: id.to_string(),
        })
    }

    #[tokio::test]
    async fn test_snapshot_roundtrip() {
        let (_, cache) = store();
        let rows = vec![json!({"id": "r1", "name": "Cooler"})];
        cache.cache_snapshot(Domain::Rooms, &rows).await;
        assert_eq!(cache.snapshot_rows(Domain::Rooms).await, rows);
    }

    #[tokio::test]
    async fn test_snapshot_missing_key_is_empty() {
        let (_, cache) = store();
        assert!(cache.snapshot_rows(Domain::Items).await.is_empty());
        assert_eq!(cache.snapshot::<Vec<Value>>(Domain::Items).await, None);
    }

    #[tokio::test]
    async fn test_snapshot_corrupt_value_is_empty() {
        let (storage, cache) = store();
        storage
            .set_item(Domain::Items.key(), "{not json")
            .await
            .unwrap();
        assert!(cache.snapshot_rows(Domain::Items).await.is_empty());
    }

    #[tokio::test]
    async fn test_save_pending_preserves_existing_entries() {
        let (_, cache) = store();
        let first = delete_change("r1");
        let second = delete_change("r2");

        cache.save_pending(&first).await;
        cache.save_pending(&second).await;

        assert_eq!(cache.pending_changes().await, vec![first, second]);
        assert_eq!(cache.pending_count().await, 2);
    }

    #[tokio::test]
    async fn test_undecodable_queue_entries_are_dropped() {
        let (storage, cache) = store();
        let keeper = delete_change("r1");
        let queue = json!([
            serde_json::to_value(&keeper).unwrap(),
            {"id": "not-a-change", "type": "truncate", "queued_at": 0},
        ]);
        storage
            .set_item("pending_changes", &queue.to_string())
            .await
            .unwrap();

        assert_eq!(cache.pending_changes().await, vec![keeper]);
    }

    #[tokio::test]
    async fn test_corrupt_queue_is_empty() {
        let (storage, cache) = store();
        storage.set_item("pending_changes", "oops").await.unwrap();
        assert!(cache.pending_changes().await.is_empty());
    }

    #[tokio::test]
    async fn test_replace_pending_empty_removes_key() {
        let (storage, cache) = store();
        cache.save_pending(&delete_change("r1")).await;
        cache.replace_pending(&[]).await;

        assert_eq!(storage.get_item("pending_changes").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_replace_pending_keeps_survivors_only() {
        let (_, cache) = store();
        let first = delete_change("r1");
        let second = delete_change("r2");
        cache.save_pending(&first).await;
        cache.save_pending(&second).await;

        cache.replace_pending(std::slice::from_ref(&second)).await;
        assert_eq!(cache.pending_changes().await, vec![second]);
    }

    #[tokio::test]
    async fn test_last_sync_roundtrip() {
        let (_, cache) = store();
        assert_eq!(cache.last_sync().await, None);

        let before = Utc::now();
        cache.update_last_sync().await;
        let recorded = cache.last_sync().await.unwrap();
        assert!(recorded >= before - chrono::Duration::seconds(1));
    }

    #[tokio::test]
    async fn test_corrupt_last_sync_is_none() {
        let (storage, cache) = store();
        storage.set_item("last_sync", "yesterday").await.unwrap();
        assert_eq!(cache.last_sync().await, None);
    }
}
