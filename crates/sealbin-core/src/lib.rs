//! # Sealbin Core
//!
//! Pure primitives for the sealbin paste engine: identifiers, capability
//! tokens, password digests, and the paste record itself.
//!
//! This crate contains no I/O, no storage, no networking. It is pure
//! computation over the data every other layer shares.
//!
//! ## Key Types
//!
//! - [`PasteRecord`] - The shared secret artifact and its lifecycle
//! - [`PasteId`] - Random 16-byte identifier
//! - [`CapabilityToken`] / [`TokenPair`] - Self-describing bearer tokens
//! - [`PasswordDigest`] - Argon2 digest for password-gated pastes
//!
//! ## Tokens
//!
//! Tokens are `rtkn_`/`wtkn_` plus 32 lowercase hex characters. Parsing is
//! total and pure; see the [`token`] module.

pub mod error;
pub mod password;
pub mod paste;
pub mod token;
pub mod types;

pub use error::{CoreError, TokenError};
pub use password::PasswordDigest;
pub use paste::{LifecycleState, PasteBuilder, PasteMeta, PasteRecord};
pub use token::{
    Capability, CapabilityToken, TokenBody, TokenPair, READ_TOKEN_PREFIX, TOKEN_BODY_LEN,
    TOKEN_HEX_LEN, WRITE_TOKEN_PREFIX,
};
pub use types::{Expiry, PasteId, Visibility, PASTE_ID_LEN};
