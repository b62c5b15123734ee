//! Data models for Stocktake

mod change;
mod conflict;
mod domain;
mod status;

pub use change::{ChangeId, ChangeOp, CountRow, PendingChange};
pub use conflict::{Conflict, ConflictResolution};
pub use domain::Domain;
pub use status::SyncStatus;
