//! # Sealbin
//!
//! A paste engine built around capability tokens: unguessable bearer links
//! that carry all access rights, with password gates, expiration, and
//! burn-after-reading.
//!
//! ## Overview
//!
//! The engine provides a storage-agnostic library for:
//!
//! - **Tokens**: `rtkn_`/`wtkn_` bearer credentials, one independent pair per paste
//! - **Policy**: a pure evaluator that turns every access into an explicit verdict
//! - **Storage**: an in-memory map for tests and SQLite for persistence
//! - **Lifecycle**: lazy expiration and at-most-once burn-after-reading delivery
//!
//! ## Key Concepts
//!
//! - **Read token**: reveals content, subject to the password gate.
//! - **Write token**: additionally edits and deletes; bypasses the password gate.
//! - **Burn paste**: consumed by its first successful reveal. Concurrent
//!   readers race for a single delivery.
//! - **Tombstone**: a consumed record kept around so later attempts see a
//!   stable "already viewed" denial instead of a vanishing paste.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use sealbin::{EngineConfig, PasteEngine, PasteOptions, RevealOutcome};
//! use sealbin::store::MemoryStore;
//!
//! async fn example() {
//!     let engine = PasteEngine::new(MemoryStore::new(), EngineConfig::default());
//!
//!     // Create a paste and hand out its links
//!     let created = engine
//!         .create_paste("hello", PasteOptions::default())
//!         .await
//!         .unwrap();
//!     println!("read: {}", engine.share_url(&created.tokens.read));
//!     println!("edit: {}", engine.share_url(&created.tokens.write));
//!
//!     // Reveal through the read token
//!     let outcome = engine
//!         .reveal(&created.tokens.read.encode(), None)
//!         .await
//!         .unwrap();
//!     match outcome {
//!         RevealOutcome::Delivered { content, .. } => assert_eq!(&content[..], b"hello"),
//!         other => panic!("unexpected outcome: {other:?}"),
//!     }
//! }
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `sealbin::core` - Core primitives (PasteRecord, CapabilityToken, etc.)
//! - `sealbin::store` - Storage abstraction, in-memory and SQLite backends
//! - `sealbin::policy` - The pure access evaluator

pub mod engine;
pub mod error;

// Re-export component crates
pub use sealbin_core as core;
pub use sealbin_policy as policy;
pub use sealbin_store as store;

// Re-export main types for convenience
pub use engine::{
    CreatedPaste, DeleteOutcome, EngineConfig, InspectOutcome, PasswordChange, PasteEngine,
    PasteOptions, PasteUpdate, RevealOutcome, UpdateOutcome,
};
pub use error::{EngineError, Result};

// Re-export commonly used core and policy types
pub use sealbin_core::{
    Capability, CapabilityToken, Expiry, LifecycleState, PasteBuilder, PasteId, PasteMeta,
    PasteRecord, TokenPair, Visibility,
};
pub use sealbin_policy::{Decision, DenyReason};
