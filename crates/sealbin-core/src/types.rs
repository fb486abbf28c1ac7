//! Strong type definitions for the sealbin engine.
//!
//! All identifiers are newtypes to prevent misuse at compile time.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Length of a paste identifier in bytes.
pub const PASTE_ID_LEN: usize = 16;

/// A 16-byte paste identifier, minted randomly at creation time.
///
/// The identifier never changes for the lifetime of a paste. Its canonical
/// text form is 32 lowercase hex characters, which is also how it
/// serializes.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PasteId(pub [u8; PASTE_ID_LEN]);

impl PasteId {
    /// Mint a fresh random identifier.
    pub fn generate() -> Self {
        use rand::RngCore;
        let mut bytes = [0u8; PASTE_ID_LEN];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Create a new PasteId from raw bytes.
    pub const fn from_bytes(bytes: [u8; PASTE_ID_LEN]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; PASTE_ID_LEN] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s)?;
        if bytes.len() != PASTE_ID_LEN {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        let mut arr = [0u8; PASTE_ID_LEN];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    /// The zero paste ID (used as a sentinel).
    pub const ZERO: Self = Self([0u8; PASTE_ID_LEN]);
}

impl fmt::Debug for PasteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PasteId({})", &self.to_hex()[..8])
    }
}

impl fmt::Display for PasteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.to_hex()[..8])
    }
}

impl AsRef<[u8]> for PasteId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; PASTE_ID_LEN]> for PasteId {
    fn from(bytes: [u8; PASTE_ID_LEN]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&[u8]> for PasteId {
    type Error = std::array::TryFromSliceError;

    fn try_from(slice: &[u8]) -> Result<Self, Self::Error> {
        let arr: [u8; PASTE_ID_LEN] = slice.try_into()?;
        Ok(Self(arr))
    }
}

// Identifiers travel through listings and JSON payloads, so they serialize
// as their canonical hex form rather than a byte array.
impl Serialize for PasteId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for PasteId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct HexVisitor;

        impl Visitor<'_> for HexVisitor {
            type Value = PasteId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a 32-character hex string")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                PasteId::from_hex(v).map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
            }
        }

        deserializer.deserialize_str(HexVisitor)
    }
}

/// Listing visibility of a paste.
///
/// Visibility controls discoverability only. A direct link to a `Private`
/// paste still works for anyone holding the token; it just never appears in
/// listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Appears in public listings.
    Public,
    /// Never listed; reachable only through its tokens.
    Private,
    /// Not listed, but intended for link sharing.
    Unlisted,
}

impl Visibility {
    /// Canonical lowercase name, as stored and serialized.
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
            Visibility::Unlisted => "unlisted",
        }
    }

    /// Parse a canonical name. Returns None for unknown input.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "public" => Some(Visibility::Public),
            "private" => Some(Visibility::Private),
            "unlisted" => Some(Visibility::Unlisted),
            _ => None,
        }
    }

    /// True if the paste may appear in public listings.
    pub fn is_listed(&self) -> bool {
        matches!(self, Visibility::Public)
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// When a paste stops being accessible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expiry {
    /// Never expires.
    Permanent,
    /// Expires at the given Unix-millisecond instant.
    At(i64),
}

impl Expiry {
    /// True once the expiration instant has been reached.
    ///
    /// The boundary itself counts as expired: a paste with `At(t)` is
    /// denied at `now == t`.
    pub fn is_expired(&self, now: i64) -> bool {
        match self {
            Expiry::Permanent => false,
            Expiry::At(at) => now >= *at,
        }
    }

    /// The expiration instant, or None for permanent pastes.
    pub fn as_millis(&self) -> Option<i64> {
        match self {
            Expiry::Permanent => None,
            Expiry::At(at) => Some(*at),
        }
    }

    /// Build from an optional instant, treating None as permanent.
    pub fn from_millis(millis: Option<i64>) -> Self {
        match millis {
            None => Expiry::Permanent,
            Some(at) => Expiry::At(at),
        }
    }
}
