//! Remote data-access seam
//!
//! The hosted backend is an external collaborator; callers provide the
//! implementation (SDK wrapper in the apps, mocks in tests). The engine
//! treats any error as a per-change failure.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// Table-scoped operations against the hosted relational backend.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Insert `rows` into `table`.
    async fn insert(&self, table: &str, rows: Vec<Value>) -> Result<()>;

    /// Patch the record identified by `id` in `table`.
    async fn update(&self, table: &str, id: &str, patch: Value) -> Result<()>;

    /// Delete the record identified by `id` from `table`.
    async fn delete(&self, table: &str, id: &str) -> Result<()>;

    /// Delete the count rows for `room_id` restricted to exactly `item_ids`.
    ///
    /// Used by the `upsert_counts` replace pattern: the backend has no
    /// "replace rows matching a composite key" primitive, so a room's counts
    /// are replaced by deleting the about-to-be-reinserted item set and
    /// inserting fresh rows. Stale counts for items outside `item_ids` must
    /// be left untouched.
    async fn delete_counts(&self, table: &str, room_id: &str, item_ids: &[String]) -> Result<()>;
}

#[async_trait]
impl<T: RemoteStore + ?Sized> RemoteStore for std::sync::Arc<T> {
    async fn insert(&self, table: &str, rows: Vec<Value>) -> Result<()> {
        (**self).insert(table, rows).await
    }

    async fn update(&self, table: &str, id: &str, patch: Value) -> Result<()> {
        (**self).update(table, id, patch).await
    }

    async fn delete(&self, table: &str, id: &str) -> Result<()> {
        (**self).delete(table, id).await
    }

    async fn delete_counts(&self, table: &str, room_id: &str, item_ids: &[String]) -> Result<()> {
        (**self).delete_counts(table, room_id, item_ids).await
    }
}
