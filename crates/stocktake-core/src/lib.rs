//! stocktake-core - Core library for Stocktake
//!
//! Offline-tolerant stock-count synchronization: a durable local cache of
//! domain snapshots, a pending-mutation queue for writes taken while offline,
//! and a sync engine that replays the queue against the remote store and
//! resolves read-time conflicts by timestamp.

pub mod cache;
pub mod error;
pub mod models;
pub mod storage;
pub mod sync;

pub use cache::CacheStore;
pub use error::{Error, Result};
pub use models::{
    ChangeId, ChangeOp, Conflict, ConflictResolution, CountRow, Domain, PendingChange, SyncStatus,
};
pub use sync::{
    check_conflicts, resolve_conflicts, run_auto_sync, ChangeFailure, RemoteStore, SyncEngine,
    SyncReport, WriteOutcome,
};
