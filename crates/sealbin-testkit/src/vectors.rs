//! Pinned token encodings for wire-format stability.
//!
//! The text form of a capability token is part of the public surface: links
//! already in the wild must keep resolving across releases, and non-Rust
//! clients build and parse the same strings. These vectors pin the exact
//! encoding so any drift fails loudly.

use sealbin_core::{Capability, CapabilityToken, TokenBody, TOKEN_BODY_LEN};

/// A pinned token encoding.
#[derive(Debug, Clone)]
pub struct TokenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Capability of the token.
    pub capability: Capability,
    /// Raw body bytes.
    pub body: [u8; TOKEN_BODY_LEN],
    /// Expected canonical text form.
    pub encoded: &'static str,
}

/// Get all pinned token vectors.
pub fn all_vectors() -> Vec<TokenVector> {
    vec![
        TokenVector {
            name: "read token, ascending body",
            capability: Capability::Read,
            body: [
                0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c,
                0x0d, 0x0e, 0x0f,
            ],
            encoded: "rtkn_000102030405060708090a0b0c0d0e0f",
        },
        TokenVector {
            name: "write token, ascending body",
            capability: Capability::Write,
            body: [
                0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c,
                0x0d, 0x0e, 0x0f,
            ],
            encoded: "wtkn_000102030405060708090a0b0c0d0e0f",
        },
        TokenVector {
            name: "read token, all-zero body",
            capability: Capability::Read,
            body: [0x00; TOKEN_BODY_LEN],
            encoded: "rtkn_00000000000000000000000000000000",
        },
        TokenVector {
            name: "write token, all-ff body",
            capability: Capability::Write,
            body: [0xff; TOKEN_BODY_LEN],
            encoded: "wtkn_ffffffffffffffffffffffffffffffff",
        },
        TokenVector {
            name: "read token, repeating body",
            capability: Capability::Read,
            body: [
                0xde, 0xad, 0xbe, 0xef, 0xde, 0xad, 0xbe, 0xef, 0xde, 0xad, 0xbe, 0xef, 0xde,
                0xad, 0xbe, 0xef,
            ],
            encoded: "rtkn_deadbeefdeadbeefdeadbeefdeadbeef",
        },
    ]
}

/// Strings that must never parse as tokens.
///
/// Kept as data so alternative clients can share the corpus.
pub fn rejected_strings() -> Vec<&'static str> {
    vec![
        "",
        "rtkn_",
        "wtkn",
        "rtkn000102030405060708090a0b0c0d0e0f",
        "RTKN_000102030405060708090a0b0c0d0e0f",
        "xtkn_000102030405060708090a0b0c0d0e0f",
        "rtkn_000102030405060708090a0b0c0d0e",      // 30 hex chars
        "rtkn_000102030405060708090a0b0c0d0e0f00", // 34 hex chars
        "rtkn_000102030405060708090A0B0C0D0E0F",   // uppercase hex
        "wtkn_g00102030405060708090a0b0c0d0e0f",   // non-hex char
        "rtkn_000102030405060708090a0b0c0d0e0 ",   // trailing space
    ]
}

/// Verify every pinned vector in both directions.
///
/// Returns `(name, matches, produced)` triples as a conformance report.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    all_vectors()
        .iter()
        .map(|v| {
            let token = CapabilityToken {
                capability: v.capability,
                body: TokenBody::from_bytes(v.body),
            };
            let produced = token.encode();
            let parses_back = CapabilityToken::parse(v.encoded)
                .map(|parsed| parsed == token)
                .unwrap_or(false);
            let matches = produced == v.encoded && parses_back;
            (v.name.to_string(), matches, produced)
        })
        .collect()
}
