//! # Sealbin Policy
//!
//! Pure access policy evaluation for pastes.
//!
//! ## Overview
//!
//! Every read-path access attempt funnels through a single pure function,
//! [`evaluate`]. It takes the presented token, whatever record the store
//! resolved, an optional password attempt, and the caller's clock, and
//! returns a [`Decision`]. It never touches the store and never mutates
//! anything, which is what makes the rules testable in isolation and makes
//! "a wrong password must not change view counts" true by construction.
//!
//! ## Key Concepts
//!
//! - **Ordered rules**: malformed token, unresolved record, expiration,
//!   consumption, capability bypass, password gate, in that order. The
//!   first matching rule wins, so expiration always outranks consumption.
//! - **Denials are values**: a [`DenyReason`] is a normal outcome, not an
//!   error. Infrastructure failures take a different channel entirely.
//! - **Write bypass**: the write token implies read privileges and skips
//!   the password gate.
//!
//! ## Usage
//!
//! ```rust
//! use sealbin_core::PasteBuilder;
//! use sealbin_policy::{evaluate, Decision};
//!
//! let record = PasteBuilder::new("hello").seal(1_000);
//! let token = record.token_pair().read.encode();
//!
//! match evaluate(&token, Some(&record), None, 2_000) {
//!     Decision::Allow(allowed) => assert_eq!(allowed.id, record.id),
//!     other => panic!("unexpected decision: {other:?}"),
//! }
//! ```

pub mod decision;
pub mod evaluate;

pub use decision::{Decision, DenyReason};
pub use evaluate::evaluate;
