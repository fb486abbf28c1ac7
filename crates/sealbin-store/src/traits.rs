//! Store trait: the abstract interface for paste persistence.
//!
//! This trait keeps the engine storage-agnostic. Implementations include
//! SQLite (primary) and in-memory (for tests).

use async_trait::async_trait;
use bytes::Bytes;

use sealbin_core::{
    Capability, PasteId, PasteMeta, PasteRecord, PasswordDigest, TokenBody, Visibility,
};

use crate::error::Result;

/// Result of creating a paste.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    /// The record was stored.
    Created,
    /// The id or one of the token bodies is already taken.
    AlreadyExists,
}

/// Result of the burn compare-and-set on `revealed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BurnResult {
    /// This caller flipped `revealed` and owns the delivery.
    Burned,
    /// Another caller already flipped it.
    AlreadyBurned,
    /// No such paste.
    Missing,
}

/// A partial update to a paste. `None` fields stay untouched.
///
/// The burn flag and the expiration policy are immutable after creation and
/// deliberately have no patch field.
#[derive(Debug, Clone, Default)]
pub struct PastePatch {
    /// Replace the content.
    pub content: Option<Bytes>,
    /// Replace the listing visibility.
    pub visibility: Option<Visibility>,
    /// Touch the password gate: `Some(Some(d))` sets a digest,
    /// `Some(None)` clears it.
    pub password: Option<Option<PasswordDigest>>,
}

impl PastePatch {
    /// True if applying this patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self.content.is_none() && self.visibility.is_none() && self.password.is_none()
    }
}

/// The Store trait: async interface for paste persistence.
///
/// All methods are async to support both sync (SQLite) and async backends.
/// For SQLite, `spawn_blocking` is used internally to avoid blocking the
/// runtime.
///
/// # Design Notes
///
/// - **Atomic creation**: `create` makes the record, content and both token
///   index entries visible together or not at all.
/// - **Capability-scoped lookup**: `get_by_token` only finds a body under
///   the index of its own capability, so a prefix-flipped token resolves to
///   nothing.
/// - **Burn CAS**: `mark_revealed` is the one atomically observable
///   false-to-true transition; concurrent callers get exactly one `Burned`.
/// - **Lazy expiry**: the store never consults the clock on reads; expired
///   rows linger until `purge_expired` or caller-driven deletion.
#[async_trait]
pub trait Store: Send + Sync {
    // ─────────────────────────────────────────────────────────────────────────
    // Record Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Store a freshly sealed record.
    ///
    /// Returns `AlreadyExists` when the id or either token body collides
    /// with a stored record, leaving the store untouched.
    async fn create(&self, record: &PasteRecord) -> Result<CreateOutcome>;

    /// Get a paste by id.
    async fn get(&self, id: &PasteId) -> Result<Option<PasteRecord>>;

    /// Get a paste through its capability index.
    async fn get_by_token(
        &self,
        capability: Capability,
        body: &TokenBody,
    ) -> Result<Option<PasteRecord>>;

    /// Apply a patch and return the updated record, or None if absent.
    async fn update(&self, id: &PasteId, patch: PastePatch) -> Result<Option<PasteRecord>>;

    /// Delete a paste and its token index entries. False if absent.
    async fn delete(&self, id: &PasteId) -> Result<bool>;

    // ─────────────────────────────────────────────────────────────────────────
    // Reveal Bookkeeping
    // ─────────────────────────────────────────────────────────────────────────

    /// Compare-and-set `revealed` from false to true.
    async fn mark_revealed(&self, id: &PasteId) -> Result<BurnResult>;

    /// Bump the view counter, returning the new count, or None if absent.
    async fn increment_views(&self, id: &PasteId) -> Result<Option<u64>>;

    // ─────────────────────────────────────────────────────────────────────────
    // Lifecycle Maintenance
    // ─────────────────────────────────────────────────────────────────────────

    /// Delete every record whose expiration instant is at or before `now`.
    /// Returns how many were reclaimed.
    async fn purge_expired(&self, now: i64) -> Result<u64>;

    /// Newest-first metadata of public pastes that are neither expired at
    /// `now` nor consumed.
    async fn list_public(&self, now: i64, limit: usize) -> Result<Vec<PasteMeta>>;
}
