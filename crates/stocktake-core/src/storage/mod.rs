//! Durable key/value storage layer
//!
//! The cache store sits on top of a minimal string-valued key/value API so
//! that the same sync logic runs against SQLite on device and an in-memory
//! map in tests.

mod memory;
mod sqlite;

use async_trait::async_trait;

use crate::error::Result;

pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

/// Minimal async key/value contract mirrored on the host platform's durable
/// storage. Values are opaque strings; the cache store layers JSON on top.
#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    /// Read the value at `key`, `None` if absent.
    async fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Write `value` under `key`, overwriting any prior value.
    async fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Delete `key` entirely. Deleting an absent key is not an error.
    async fn remove_item(&self, key: &str) -> Result<()>;
}
