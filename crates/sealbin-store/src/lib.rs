//! # Sealbin Store
//!
//! Persistence layer for pastes.
//!
//! ## Backends
//!
//! - [`SqliteStore`] - Primary backend: rusqlite with bundled SQLite,
//!   wrapped in async via `spawn_blocking`.
//! - [`MemoryStore`] - Reference semantics and test backend.
//!
//! ## Design Notes
//!
//! - **Atomic creation**: a record and both its token-index entries become
//!   visible together or not at all.
//! - **Capability-scoped lookup**: read bodies resolve only under the read
//!   index, write bodies only under the write index. A prefix-flipped token
//!   is well-formed but matches nothing.
//! - **Burn CAS**: `mark_revealed` is a compare-and-set; exactly one of any
//!   number of racing callers observes `Burned`.
//! - **Lazy expiry**: reads never consult the clock here. Expired rows
//!   linger until `purge_expired` or caller-driven deletion reclaims them.

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{BurnResult, CreateOutcome, PastePatch, Store};
