//! Error types for the paste engine.

use sealbin_core::CoreError;
use sealbin_store::StoreError;
use thiserror::Error;

/// Errors that can occur during engine operations.
///
/// Access denials are not errors; they travel as outcome values like
/// [`RevealOutcome`](crate::engine::RevealOutcome). These variants cover
/// genuine failures the caller must fix or may retry.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Core primitive error (password digest derivation).
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Content was empty.
    #[error("content is empty")]
    EmptyContent,

    /// Content exceeded the configured cap.
    #[error("content is {len} bytes, limit is {max}")]
    ContentTooLarge { len: usize, max: usize },

    /// A freshly minted identifier or token collided with an existing
    /// record.
    #[error("identifier collision on create")]
    IdCollision,
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
