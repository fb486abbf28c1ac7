//! The paste record and its lifecycle.
//!
//! A [`PasteRecord`] is the single shared artifact the rest of the engine
//! orbits: the store persists it, the policy evaluator reads it, and the
//! engine mutates it through the store. Records are created whole via
//! [`PasteBuilder`] so a paste is never observable half-initialized.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::password::PasswordDigest;
use crate::token::{Capability, CapabilityToken, TokenBody, TokenPair};
use crate::types::{Expiry, PasteId, Visibility};

/// Where a paste sits in its life.
///
/// `Expired` and `Consumed` are both terminal. A burn paste that expires
/// before anyone reads it is `Expired`, not `Consumed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Reachable, subject to the password gate.
    Active,
    /// Past its expiration instant.
    Expired,
    /// Burn-after-reading paste that has been delivered once.
    Consumed,
}

impl LifecycleState {
    /// True while the paste can still be delivered.
    pub fn is_active(&self) -> bool {
        matches!(self, LifecycleState::Active)
    }

    /// True once no future delivery is possible.
    pub fn is_terminal(&self) -> bool {
        !self.is_active()
    }
}

/// A stored paste.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasteRecord {
    /// Unique identifier, assigned once at creation.
    pub id: PasteId,
    /// Opaque payload. Never inspected by the engine.
    pub content: Bytes,
    /// Listing visibility. Orthogonal to token access.
    pub visibility: Visibility,
    /// Password digest, present only for protected pastes.
    pub password: Option<PasswordDigest>,
    /// Self-destruct after the first successful delivery. Immutable.
    pub burn_after_reading: bool,
    /// Expiration policy. Immutable.
    pub expiry: Expiry,
    /// Creation instant, Unix milliseconds.
    pub created_at: i64,
    /// Body of the read token bound to this paste.
    pub read_token: TokenBody,
    /// Body of the write token bound to this paste.
    pub write_token: TokenBody,
    /// True once a burn paste has been delivered. The record then persists
    /// as a tombstone so later attempts see a consistent denial.
    pub revealed: bool,
    /// Successful deliveries so far. Denied attempts never count.
    pub views: u64,
}

impl PasteRecord {
    /// The token body bound to this paste for the given capability.
    pub fn token_body(&self, capability: Capability) -> &TokenBody {
        match capability {
            Capability::Read => &self.read_token,
            Capability::Write => &self.write_token,
        }
    }

    /// Reconstruct the full token pair from the stored bodies.
    pub fn token_pair(&self) -> TokenPair {
        TokenPair {
            read: CapabilityToken {
                capability: Capability::Read,
                body: self.read_token,
            },
            write: CapabilityToken {
                capability: Capability::Write,
                body: self.write_token,
            },
        }
    }

    /// True if a password gate protects read access.
    pub fn is_protected(&self) -> bool {
        self.password.is_some()
    }

    /// Lifecycle at the given instant.
    ///
    /// Expiration outranks consumption, so an expired tombstone reports
    /// `Expired`.
    pub fn lifecycle(&self, now: i64) -> LifecycleState {
        if self.expiry.is_expired(now) {
            return LifecycleState::Expired;
        }
        if self.revealed {
            return LifecycleState::Consumed;
        }
        LifecycleState::Active
    }

    /// Content-free projection for listings, inspection, and delivery
    /// metadata.
    pub fn meta(&self) -> PasteMeta {
        PasteMeta {
            id: self.id,
            visibility: self.visibility,
            protected: self.password.is_some(),
            burn_after_reading: self.burn_after_reading,
            expiry: self.expiry,
            created_at: self.created_at,
            revealed: self.revealed,
            views: self.views,
            size: self.content.len(),
        }
    }
}

/// Everything about a paste except its content and secrets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasteMeta {
    pub id: PasteId,
    pub visibility: Visibility,
    /// Whether a password gate is set. The digest itself never leaves the
    /// record.
    pub protected: bool,
    pub burn_after_reading: bool,
    pub expiry: Expiry,
    pub created_at: i64,
    pub revealed: bool,
    pub views: u64,
    /// Content length in bytes.
    pub size: usize,
}

/// Builder for new paste records.
///
/// Defaults: unlisted, no password, no burn, permanent. [`seal`] mints the
/// identifier and token pair and stamps the creation time, producing a
/// record ready for atomic insertion.
///
/// [`seal`]: PasteBuilder::seal
#[derive(Debug, Clone)]
pub struct PasteBuilder {
    content: Bytes,
    visibility: Visibility,
    password: Option<PasswordDigest>,
    burn_after_reading: bool,
    expiry: Expiry,
}

impl PasteBuilder {
    /// Start a builder around the given content.
    pub fn new(content: impl Into<Bytes>) -> Self {
        Self {
            content: content.into(),
            visibility: Visibility::Unlisted,
            password: None,
            burn_after_reading: false,
            expiry: Expiry::Permanent,
        }
    }

    /// Set the listing visibility.
    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Protect reads with a password digest.
    pub fn password(mut self, digest: PasswordDigest) -> Self {
        self.password = Some(digest);
        self
    }

    /// Self-destruct after the first successful delivery.
    pub fn burn_after_reading(mut self, burn: bool) -> Self {
        self.burn_after_reading = burn;
        self
    }

    /// Set the expiration policy.
    pub fn expiry(mut self, expiry: Expiry) -> Self {
        self.expiry = expiry;
        self
    }

    /// Mint identifier and tokens and produce the record, stamped at `now`.
    pub fn seal(self, now: i64) -> PasteRecord {
        let pair = TokenPair::issue();
        PasteRecord {
            id: PasteId::generate(),
            content: self.content,
            visibility: self.visibility,
            password: self.password,
            burn_after_reading: self.burn_after_reading,
            expiry: self.expiry,
            created_at: now,
            read_token: pair.read.body,
            write_token: pair.write.body,
            revealed: false,
            views: 0,
        }
    }
}
