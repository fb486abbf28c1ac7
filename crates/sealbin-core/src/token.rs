//! Capability token codec.
//!
//! Every paste is reachable through exactly two bearer tokens: a read token
//! and a write token. A token is self-describing text, `rtkn_` or `wtkn_`
//! followed by 32 lowercase hex characters encoding a 16-byte random body.
//! The two bodies of a pair are independent random values, so knowing one
//! token reveals nothing about the other: swapping the prefix of a valid
//! token produces a well-formed token whose body matches no paste under the
//! other capability.
//!
//! Parsing is pure and total. Malformed input yields an error value, never
//! a panic, and no store access happens at this layer.

use std::fmt;

use crate::error::TokenError;

/// Prefix of every read token.
pub const READ_TOKEN_PREFIX: &str = "rtkn_";

/// Prefix of every write token.
pub const WRITE_TOKEN_PREFIX: &str = "wtkn_";

/// Length of a token body in bytes.
pub const TOKEN_BODY_LEN: usize = 16;

/// Length of a token body in hex characters.
pub const TOKEN_HEX_LEN: usize = TOKEN_BODY_LEN * 2;

/// The permission class a token grants on its paste.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// May reveal content (subject to password and lifecycle gates).
    Read,
    /// May additionally update and delete; bypasses the password gate.
    Write,
}

impl Capability {
    /// The token prefix for this capability.
    pub fn prefix(&self) -> &'static str {
        match self {
            Capability::Read => READ_TOKEN_PREFIX,
            Capability::Write => WRITE_TOKEN_PREFIX,
        }
    }

    /// The share-URL path segment for this capability.
    pub fn path_segment(&self) -> &'static str {
        match self {
            Capability::Read => "r",
            Capability::Write => "w",
        }
    }
}

/// The 16-byte random body of a capability token.
///
/// The body is the bearer secret. `Debug` prints a truncated form so the
/// full secret never lands in logs by accident.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenBody(pub [u8; TOKEN_BODY_LEN]);

impl TokenBody {
    /// Mint a fresh random body.
    pub fn generate() -> Self {
        use rand::RngCore;
        let mut bytes = [0u8; TOKEN_BODY_LEN];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Create a TokenBody from raw bytes.
    pub const fn from_bytes(bytes: [u8; TOKEN_BODY_LEN]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; TOKEN_BODY_LEN] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s)?;
        if bytes.len() != TOKEN_BODY_LEN {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        let mut arr = [0u8; TOKEN_BODY_LEN];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Debug for TokenBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TokenBody({})", &self.to_hex()[..8])
    }
}

impl TryFrom<&[u8]> for TokenBody {
    type Error = std::array::TryFromSliceError;

    fn try_from(slice: &[u8]) -> Result<Self, Self::Error> {
        let arr: [u8; TOKEN_BODY_LEN] = slice.try_into()?;
        Ok(Self(arr))
    }
}

/// A parsed capability token: the declared capability plus its body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CapabilityToken {
    pub capability: Capability,
    pub body: TokenBody,
}

impl CapabilityToken {
    /// Render the canonical text form, `prefix` + 32 lowercase hex.
    pub fn encode(&self) -> String {
        format!("{}{}", self.capability.prefix(), self.body.to_hex())
    }

    /// Parse a token string, reporting which structural rule it broke.
    pub fn parse(s: &str) -> Result<Self, TokenError> {
        let (capability, rest) = if let Some(rest) = s.strip_prefix(READ_TOKEN_PREFIX) {
            (Capability::Read, rest)
        } else if let Some(rest) = s.strip_prefix(WRITE_TOKEN_PREFIX) {
            (Capability::Write, rest)
        } else {
            return Err(TokenError::UnknownPrefix);
        };

        if rest.len() != TOKEN_HEX_LEN {
            return Err(TokenError::BadLength {
                expected: TOKEN_HEX_LEN,
                got: rest.len(),
            });
        }
        if !rest.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
            return Err(TokenError::BadCharset);
        }

        let body = TokenBody::from_hex(rest).map_err(|_| TokenError::BadCharset)?;
        Ok(Self { capability, body })
    }

    /// Report the capability a token string declares, or None if the string
    /// is not a token at all. Purely structural; no lookup happens.
    pub fn classify(s: &str) -> Option<Capability> {
        Self::parse(s).ok().map(|t| t.capability)
    }

    /// True if the string is structurally a token, whether or not any paste
    /// answers to it.
    pub fn is_well_formed(s: &str) -> bool {
        Self::parse(s).is_ok()
    }
}

impl fmt::Display for CapabilityToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

/// The read/write token pair minted for one paste.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenPair {
    pub read: CapabilityToken,
    pub write: CapabilityToken,
}

impl TokenPair {
    /// Mint a pair of independent random tokens.
    pub fn issue() -> Self {
        let read = TokenBody::generate();
        let mut write = TokenBody::generate();
        // The two bodies of a pair must never collide.
        while write == read {
            write = TokenBody::generate();
        }
        Self {
            read: CapabilityToken {
                capability: Capability::Read,
                body: read,
            },
            write: CapabilityToken {
                capability: Capability::Write,
                body: write,
            },
        }
    }
}
