//! Sync engine
//!
//! Replays the pending-change queue against the remote store, maintains the
//! last-sync marker, and exposes the status surface polled by UI layers.
//! Each queued change is applied independently: a failure is recorded and
//! retained for a future attempt, never aborting the batch.

mod conflict;
mod monitor;
mod remote;

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use crate::cache::CacheStore;
use crate::error::{Error, Result};
use crate::models::{ChangeOp, PendingChange, SyncStatus};

pub use conflict::{check_conflicts, resolve_conflicts};
pub use monitor::run_auto_sync;
pub use remote::RemoteStore;

/// Default bound on a single remote apply. A hung transport call becomes a
/// per-change failure instead of stalling the whole replay.
const DEFAULT_REMOTE_TIMEOUT: Duration = Duration::from_secs(30);

/// Outcome of one replay attempt.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SyncReport {
    /// Changes applied and removed from the queue
    pub synced: usize,
    /// Changes that failed and remain queued
    pub failed: usize,
    /// The failed changes with their error messages
    pub errors: Vec<ChangeFailure>,
}

/// One change that failed to apply during a replay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeFailure {
    pub change: PendingChange,
    pub error: String,
}

/// Result of an online-first write attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOutcome {
    /// The remote write succeeded immediately
    Applied,
    /// The remote write failed; the mutation was queued for replay
    Queued(PendingChange),
}

/// Orchestrates queueing, replay, and sync status.
pub struct SyncEngine<R: RemoteStore> {
    cache: CacheStore,
    remote: R,
    syncing: AtomicBool,
    remote_timeout: Duration,
}

/// Clears the replay flag on every exit path, including panics.
struct ReplayGuard<'a>(&'a AtomicBool);

impl Drop for ReplayGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl<R: RemoteStore> SyncEngine<R> {
    #[must_use]
    pub fn new(cache: CacheStore, remote: R) -> Self {
        Self {
            cache,
            remote,
            syncing: AtomicBool::new(false),
            remote_timeout: DEFAULT_REMOTE_TIMEOUT,
        }
    }

    /// Override the per-call remote timeout.
    #[must_use]
    pub const fn with_remote_timeout(mut self, timeout: Duration) -> Self {
        self.remote_timeout = timeout;
        self
    }

    /// The cache store backing this engine.
    #[must_use]
    pub const fn cache(&self) -> &CacheStore {
        &self.cache
    }

    /// Whether a replay is currently in flight.
    pub fn is_syncing(&self) -> bool {
        self.syncing.load(Ordering::SeqCst)
    }

    /// Queue a mutation taken while offline.
    pub async fn enqueue(&self, op: ChangeOp) -> PendingChange {
        let change = PendingChange::new(op);
        self.cache.save_pending(&change).await;
        tracing::debug!(change = %change.id, kind = change.op.kind(), "queued offline change");
        change
    }

    /// Attempt the remote write immediately; fall back to the queue on any
    /// failure. This is the UI write path.
    pub async fn apply_or_queue(&self, op: ChangeOp) -> WriteOutcome {
        let change = PendingChange::new(op);
        match self.apply_with_timeout(&change).await {
            Ok(()) => WriteOutcome::Applied,
            Err(error) => {
                tracing::info!(
                    change = %change.id,
                    kind = change.op.kind(),
                    %error,
                    "remote write failed, queueing for replay"
                );
                self.cache.save_pending(&change).await;
                WriteOutcome::Queued(change)
            }
        }
    }

    /// Replay the pending queue against the remote store.
    ///
    /// Returns `None` when a replay is already in progress (the call is a
    /// no-op, not queued). Otherwise applies every queued change in FIFO
    /// order, rewrites the queue with only the still-failed changes when at
    /// least one succeeded, and updates the last-sync marker.
    pub async fn sync_pending(&self) -> Option<SyncReport> {
        if self
            .syncing
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::debug!("replay already in progress, skipping");
            return None;
        }
        let _guard = ReplayGuard(&self.syncing);

        let queue = self.cache.pending_changes().await;
        if queue.is_empty() {
            return Some(SyncReport::default());
        }

        tracing::info!(pending = queue.len(), "replaying pending changes");
        let mut synced = 0usize;
        let mut errors = Vec::new();
        for change in queue {
            match self.apply_with_timeout(&change).await {
                Ok(()) => synced += 1,
                Err(error) => {
                    tracing::warn!(
                        change = %change.id,
                        kind = change.op.kind(),
                        %error,
                        "pending change failed to apply"
                    );
                    errors.push(ChangeFailure {
                        change,
                        error: error.to_string(),
                    });
                }
            }
        }

        // Partial success must be durable: successes are dropped from the
        // queue even when other changes failed mid-replay.
        if synced > 0 {
            let survivors: Vec<PendingChange> =
                errors.iter().map(|failure| failure.change.clone()).collect();
            self.cache.replace_pending(&survivors).await;
            self.cache.update_last_sync().await;
        }

        let report = SyncReport {
            synced,
            failed: errors.len(),
            errors,
        };
        tracing::info!(synced = report.synced, failed = report.failed, "replay finished");
        Some(report)
    }

    /// Current sync status for UI polling.
    pub async fn status(&self) -> SyncStatus {
        SyncStatus {
            last_sync: self.cache.last_sync().await,
            pending: self.cache.pending_count().await,
            syncing: self.is_syncing(),
        }
    }

    async fn apply_with_timeout(&self, change: &PendingChange) -> Result<()> {
        match tokio::time::timeout(self.remote_timeout, self.apply_change(change)).await {
            Ok(result) => result,
            Err(_) => Err(Error::RemoteTimeout {
                seconds: self.remote_timeout.as_secs(),
            }),
        }
    }

    /// Apply one change to the remote store.
    async fn apply_change(&self, change: &PendingChange) -> Result<()> {
        match &change.op {
            ChangeOp::Insert { table, fields } => {
                self.remote
                    .insert(table, vec![Value::Object(fields.clone())])
                    .await
            }
            ChangeOp::Update { table, id, fields } => {
                self.remote
                    .update(table, id, Value::Object(fields.clone()))
                    .await
            }
            ChangeOp::Delete { table, id } => self.remote.delete(table, id).await,
            ChangeOp::UpsertCounts {
                table,
                room_id,
                items,
            } => {
                // Replace pattern: delete exactly the item-id set about to be
                // reinserted, leaving stale counts for other items untouched.
                // Either half failing fails the whole change.
                let item_ids: Vec<String> =
                    items.iter().map(|row| row.item_id.clone()).collect();
                self.remote.delete_counts(table, room_id, &item_ids).await?;
                let rows = items.iter().map(|row| row.to_row(room_id)).collect();
                self.remote.insert(table, rows).await
            }
        }
    }
}
