//! Error types for the sealbin store.

use thiserror::Error;

/// Storage errors.
///
/// `Unavailable` is the backend-down channel. Callers must never conflate it
/// with a missing paste, which is an ordinary `None` result.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("migration failed: {0}")]
    Migration(String),
}

/// Convenience result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
