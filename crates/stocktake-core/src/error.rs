//! Error types for stocktake-core

use thiserror::Error;

/// Result type alias using stocktake-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in stocktake-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// SQLite error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Remote store rejected an operation
    #[error("Remote store error: {0}")]
    Remote(String),

    /// Remote call exceeded the configured timeout
    #[error("Remote call timed out after {seconds}s")]
    RemoteTimeout { seconds: u64 },

    /// Malformed or unrecognized change payload
    #[error("Invalid change: {0}")]
    InvalidChange(String),
}
