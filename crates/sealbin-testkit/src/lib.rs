//! # Sealbin Testkit
//!
//! Testing utilities for the sealbin engine.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Token vectors**: Pinned token encodings for wire-format stability
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: Helpers for setting up engine test scenarios
//!
//! ## Token Vectors
//!
//! Vectors pin the canonical token text form so drift fails loudly:
//!
//! ```rust
//! use sealbin_testkit::vectors::verify_all_vectors;
//!
//! for (name, matches, produced) in verify_all_vectors() {
//!     assert!(matches, "{name} produced {produced}");
//! }
//! ```
//!
//! ## Property Testing
//!
//! Use the generators with proptest:
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use sealbin_testkit::generators::{record_from_params, PasteParams};
//!
//! proptest! {
//!     #[test]
//!     fn tokens_bind_to_their_record(params: PasteParams) {
//!         let record = record_from_params(&params);
//!         let pair = record.token_pair();
//!         prop_assert_eq!(&pair.read.body, &record.read_token);
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! Quickly set up test scenarios:
//!
//! ```rust
//! use sealbin_testkit::fixtures::{make_burn_paste, TestFixture};
//!
//! let fixture = TestFixture::new();
//! let record = make_burn_paste(b"read me once");
//! assert!(record.burn_after_reading);
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{
    make_burn_paste, make_expired_paste, make_paste, make_protected_paste, make_public_paste,
    TestFixture,
};
pub use generators::{record_from_params, PasteParams};
pub use vectors::{all_vectors, rejected_strings, verify_all_vectors, TokenVector};
