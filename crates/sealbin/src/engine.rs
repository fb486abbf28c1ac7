//! The paste engine: unified API for paste storage and access.
//!
//! The engine brings together token issuance, storage, and the access
//! evaluator into a cohesive interface for building paste services.

use std::sync::Arc;

use bytes::Bytes;

use sealbin_core::{
    Capability, CapabilityToken, Expiry, LifecycleState, PasswordDigest, PasteBuilder, PasteId,
    PasteMeta, PasteRecord, TokenPair, Visibility,
};
use sealbin_policy::{evaluate, Decision, DenyReason};
use sealbin_store::{BurnResult, CreateOutcome, PastePatch, Store};

use crate::error::{EngineError, Result};

/// Configuration for the paste engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Base URL prepended to share links.
    pub base_url: String,
    /// Maximum accepted content size in bytes.
    pub max_content_len: usize,
    /// Whether an access that finds a record expired deletes it. When
    /// disabled, reclamation is left entirely to [`PasteEngine::sweep_expired`].
    pub reap_expired_on_access: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            max_content_len: 1024 * 1024,
            reap_expired_on_access: true,
        }
    }
}

/// Options accepted when creating a paste.
///
/// Defaults match [`PasteBuilder`]: unlisted, no password, permanent, no
/// burn.
#[derive(Debug, Clone)]
pub struct PasteOptions {
    /// Listing visibility.
    pub visibility: Visibility,
    /// Plaintext password to gate reads with, if any.
    pub password: Option<String>,
    /// Expiration policy.
    pub expiry: Expiry,
    /// Self-destruct after the first successful reveal.
    pub burn_after_reading: bool,
}

impl Default for PasteOptions {
    fn default() -> Self {
        Self {
            visibility: Visibility::Unlisted,
            password: None,
            expiry: Expiry::Permanent,
            burn_after_reading: false,
        }
    }
}

/// The main engine struct.
///
/// Provides a unified API for:
/// - Creating pastes and minting their capability tokens
/// - Revealing content through read or write tokens
/// - Editing, inspecting and deleting through write tokens
/// - Listing public pastes and sweeping out expired ones
pub struct PasteEngine<S: Store> {
    /// The storage backend.
    store: Arc<S>,
    /// Configuration.
    config: EngineConfig,
}

impl<S: Store> PasteEngine<S> {
    /// Create a new engine instance.
    pub fn new(store: S, config: EngineConfig) -> Self {
        Self {
            store: Arc::new(store),
            config,
        }
    }

    /// Get the store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get the engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Create Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Create a new paste.
    ///
    /// Mints a fresh identifier and an independent read/write token pair,
    /// then persists the record atomically. The returned tokens are the only
    /// credentials that will ever reach this paste; they cannot be recovered
    /// later.
    pub async fn create_paste(
        &self,
        content: impl Into<Bytes>,
        options: PasteOptions,
    ) -> Result<CreatedPaste> {
        let content = content.into();
        self.check_content_len(&content)?;

        let mut builder = PasteBuilder::new(content)
            .visibility(options.visibility)
            .expiry(options.expiry)
            .burn_after_reading(options.burn_after_reading);
        if let Some(password) = options.password.as_deref() {
            builder = builder.password(PasswordDigest::derive(password)?);
        }
        let record = builder.seal(now_millis());

        match self.store.create(&record).await? {
            CreateOutcome::Created => {}
            CreateOutcome::AlreadyExists => return Err(EngineError::IdCollision),
        }

        tracing::debug!(id = %record.id, "created paste");
        Ok(CreatedPaste {
            id: record.id,
            tokens: record.token_pair(),
        })
    }

    /// Render the share URL for a capability token.
    ///
    /// Read tokens live under `/r/`, write tokens under `/w/`.
    pub fn share_url(&self, token: &CapabilityToken) -> String {
        format!(
            "{}/{}/{}",
            self.config.base_url.trim_end_matches('/'),
            token.capability.path_segment(),
            token.encode()
        )
    }

    fn check_content_len(&self, content: &Bytes) -> Result<()> {
        if content.is_empty() {
            return Err(EngineError::EmptyContent);
        }
        if content.len() > self.config.max_content_len {
            return Err(EngineError::ContentTooLarge {
                len: content.len(),
                max: self.config.max_content_len,
            });
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Reveal Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Reveal a paste through a capability token.
    ///
    /// The token string is evaluated against the record it binds to, and the
    /// verdict comes back as a [`RevealOutcome`] value. Burn pastes are
    /// consumed atomically: under concurrent reveals exactly one caller
    /// receives the content and every later caller is denied.
    pub async fn reveal(&self, token: &str, password: Option<&str>) -> Result<RevealOutcome> {
        let record = self.fetch_by_token(token).await?;

        match evaluate(token, record.as_ref(), password, now_millis()) {
            Decision::Allow(record) => {
                let record = record.clone();
                self.deliver(record).await
            }
            Decision::RequirePassword(id) => Ok(RevealOutcome::PasswordRequired { id }),
            Decision::Denied(reason) => {
                if reason == DenyReason::Expired {
                    if let Some(record) = &record {
                        self.reap_expired(record).await;
                    }
                }
                tracing::debug!(reason = ?reason, "reveal denied");
                Ok(RevealOutcome::Denied(reason))
            }
        }
    }

    /// Inspect a paste's metadata through its write token.
    ///
    /// Inspection never consumes a burn paste and never counts a view. A
    /// consumed record still reports its metadata; an expired one is denied
    /// and cleaned up.
    pub async fn inspect(&self, token: &str) -> Result<InspectOutcome> {
        let record = match self.gate_write(token).await? {
            WriteGate::Granted(record) => record,
            WriteGate::Denied(reason) => return Ok(InspectOutcome::Denied(reason)),
        };

        if record.lifecycle(now_millis()) == LifecycleState::Expired {
            self.reap_expired(&record).await;
            return Ok(InspectOutcome::Denied(DenyReason::Expired));
        }

        Ok(InspectOutcome::Found(record.meta()))
    }

    /// Resolve a token string to the record it binds to, if any.
    ///
    /// Lookup is capability-scoped: a read token is only matched against
    /// read bodies and a write token against write bodies, so a token with a
    /// swapped prefix resolves to nothing.
    async fn fetch_by_token(&self, token: &str) -> Result<Option<PasteRecord>> {
        let Ok(parsed) = CapabilityToken::parse(token) else {
            return Ok(None);
        };
        Ok(self
            .store
            .get_by_token(parsed.capability, &parsed.body)
            .await?)
    }

    /// Deliver a record that passed evaluation, burning it first if needed.
    ///
    /// For burn pastes the store CAS decides the winner before any content
    /// leaves this function; losers are denied as consumed.
    async fn deliver(&self, record: PasteRecord) -> Result<RevealOutcome> {
        if record.burn_after_reading {
            match self.store.mark_revealed(&record.id).await? {
                BurnResult::Burned => {
                    tracing::debug!(id = %record.id, "burn paste consumed");
                }
                BurnResult::AlreadyBurned => {
                    return Ok(RevealOutcome::Denied(DenyReason::AlreadyConsumed));
                }
                BurnResult::Missing => {
                    return Ok(RevealOutcome::Denied(DenyReason::NotFound));
                }
            }
        }

        let views = match self.store.increment_views(&record.id).await? {
            Some(views) => views,
            // the CAS winner keeps its delivery even if the record was
            // deleted out from under it
            None if record.burn_after_reading => record.views + 1,
            None => return Ok(RevealOutcome::Denied(DenyReason::NotFound)),
        };

        let mut meta = record.meta();
        meta.views = views;
        if record.burn_after_reading {
            meta.revealed = true;
        }

        Ok(RevealOutcome::Delivered {
            content: record.content,
            meta,
        })
    }

    /// Best-effort removal of a record that an access found expired.
    async fn reap_expired(&self, record: &PasteRecord) {
        if !self.config.reap_expired_on_access {
            return;
        }
        if let Err(e) = self.store.delete(&record.id).await {
            tracing::warn!(id = %record.id, error = %e, "failed to reap expired paste");
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Edit Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Apply edits to a paste through its write token.
    ///
    /// Only active pastes can be edited: expired and consumed ones are
    /// denied. Replacement content is checked against the configured size
    /// cap exactly like creation.
    pub async fn update_paste(&self, token: &str, update: PasteUpdate) -> Result<UpdateOutcome> {
        let record = match self.gate_write(token).await? {
            WriteGate::Granted(record) => record,
            WriteGate::Denied(reason) => return Ok(UpdateOutcome::Denied(reason)),
        };

        match record.lifecycle(now_millis()) {
            LifecycleState::Active => {}
            LifecycleState::Expired => {
                self.reap_expired(&record).await;
                return Ok(UpdateOutcome::Denied(DenyReason::Expired));
            }
            LifecycleState::Consumed => {
                return Ok(UpdateOutcome::Denied(DenyReason::AlreadyConsumed));
            }
        }

        let mut patch = PastePatch::default();
        if let Some(content) = update.content {
            self.check_content_len(&content)?;
            patch.content = Some(content);
        }
        patch.visibility = update.visibility;
        match update.password {
            Some(PasswordChange::Set(password)) => {
                patch.password = Some(Some(PasswordDigest::derive(&password)?));
            }
            Some(PasswordChange::Clear) => patch.password = Some(None),
            None => {}
        }
        if patch.is_empty() {
            return Ok(UpdateOutcome::Updated(record));
        }

        match self.store.update(&record.id, patch).await? {
            Some(updated) => {
                tracing::debug!(id = %updated.id, "updated paste");
                Ok(UpdateOutcome::Updated(updated))
            }
            None => Ok(UpdateOutcome::Denied(DenyReason::NotFound)),
        }
    }

    /// Delete a paste through its write token.
    ///
    /// Deletion is permitted on expired and consumed records too, so owners
    /// can clean up after themselves.
    pub async fn delete_paste(&self, token: &str) -> Result<DeleteOutcome> {
        let record = match self.gate_write(token).await? {
            WriteGate::Granted(record) => record,
            WriteGate::Denied(reason) => return Ok(DeleteOutcome::Denied(reason)),
        };

        if self.store.delete(&record.id).await? {
            tracing::debug!(id = %record.id, "deleted paste");
            Ok(DeleteOutcome::Deleted)
        } else {
            Ok(DeleteOutcome::Denied(DenyReason::NotFound))
        }
    }

    /// Resolve a write token to its record, or the denial to report.
    async fn gate_write(&self, token: &str) -> Result<WriteGate> {
        let parsed = match CapabilityToken::parse(token) {
            Ok(parsed) => parsed,
            Err(_) => return Ok(WriteGate::Denied(DenyReason::MalformedToken)),
        };
        if parsed.capability != Capability::Write {
            return Ok(WriteGate::Denied(DenyReason::CapabilityMismatch));
        }
        match self.store.get_by_token(Capability::Write, &parsed.body).await? {
            Some(record) => Ok(WriteGate::Granted(record)),
            None => Ok(WriteGate::Denied(DenyReason::NotFound)),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Maintenance Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// List metadata for public pastes, newest first.
    ///
    /// Expired and consumed pastes are excluded. Protected pastes stay
    /// listed; their content remains gated at reveal time.
    pub async fn list_public(&self, limit: usize) -> Result<Vec<PasteMeta>> {
        Ok(self.store.list_public(now_millis(), limit).await?)
    }

    /// Remove every record whose expiry has passed, returning the count.
    ///
    /// Correctness never depends on sweeping; expiry is enforced at access
    /// time. Sweeps only reclaim storage.
    pub async fn sweep_expired(&self) -> Result<u64> {
        let purged = self.store.purge_expired(now_millis()).await?;
        if purged > 0 {
            tracing::debug!(purged, "swept expired pastes");
        }
        Ok(purged)
    }
}

/// Verdict of the write-capability gate shared by the edit operations.
enum WriteGate {
    Granted(PasteRecord),
    Denied(DenyReason),
}

/// A freshly created paste and its capability tokens.
#[derive(Debug, Clone)]
pub struct CreatedPaste {
    /// Identifier of the new record.
    pub id: PasteId,
    /// The read/write token pair minted for it.
    pub tokens: TokenPair,
}

/// Result of revealing a paste.
#[derive(Debug, Clone)]
pub enum RevealOutcome {
    /// Content delivered, with metadata reflecting this view.
    Delivered { content: Bytes, meta: PasteMeta },
    /// The paste is password protected and no valid attempt was supplied.
    PasswordRequired { id: PasteId },
    /// Access denied.
    Denied(DenyReason),
}

/// Edits applied through [`PasteEngine::update_paste`].
#[derive(Debug, Clone, Default)]
pub struct PasteUpdate {
    /// Replacement content.
    pub content: Option<Bytes>,
    /// New listing visibility.
    pub visibility: Option<Visibility>,
    /// Password change, if any.
    pub password: Option<PasswordChange>,
}

/// Password change carried by a [`PasteUpdate`].
#[derive(Debug, Clone)]
pub enum PasswordChange {
    /// Derive a digest from this plaintext and gate reads with it.
    Set(String),
    /// Remove the password gate.
    Clear,
}

/// Result of updating a paste.
#[derive(Debug, Clone)]
pub enum UpdateOutcome {
    /// The record after the edit.
    Updated(PasteRecord),
    /// Edit denied.
    Denied(DenyReason),
}

/// Result of deleting a paste.
#[derive(Debug, Clone)]
pub enum DeleteOutcome {
    /// The record is gone.
    Deleted,
    /// Deletion denied.
    Denied(DenyReason),
}

/// Result of inspecting a paste.
#[derive(Debug, Clone)]
pub enum InspectOutcome {
    /// Metadata of the record, content excluded.
    Found(PasteMeta),
    /// Inspection denied.
    Denied(DenyReason),
}

/// Get current time in milliseconds.
fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_millis() as i64
}
