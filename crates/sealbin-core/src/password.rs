//! Password digests for protected pastes.
//!
//! A protected paste carries an Argon2 digest in PHC string form. Plaintext
//! passwords are never retained; verification re-derives the attempt against
//! the stored digest. Deriving uses a fresh random salt each time, so two
//! digests of the same password never compare equal.

use std::fmt;

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

use crate::error::CoreError;

/// An Argon2 digest of a paste password.
///
/// `Debug` is redacted so digests never land in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    /// Derive a digest from a plaintext password with a fresh random salt.
    pub fn derive(password: &str) -> Result<Self, CoreError> {
        let salt = SaltString::generate(rand::thread_rng());
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| CoreError::PasswordHash(e.to_string()))?;
        Ok(Self(hash.to_string()))
    }

    /// Check a plaintext attempt against the digest.
    ///
    /// A digest that fails to decode fails closed.
    pub fn verify(&self, attempt: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(&self.0) else {
            return false;
        };
        Argon2::default()
            .verify_password(attempt.as_bytes(), &parsed)
            .is_ok()
    }

    /// Wrap an existing PHC string, e.g. one loaded from storage.
    pub fn from_phc(phc: impl Into<String>) -> Self {
        Self(phc.into())
    }

    /// The PHC string form, as persisted.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordDigest(redacted)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_then_verify() {
        let digest = PasswordDigest::derive("hunter2").unwrap();
        assert!(digest.verify("hunter2"));
        assert!(!digest.verify("hunter3"));
        assert!(!digest.verify(""));
    }

    #[test]
    fn test_fresh_salt_per_derive() {
        let a = PasswordDigest::derive("same").unwrap();
        let b = PasswordDigest::derive("same").unwrap();
        assert_ne!(a.as_str(), b.as_str());
        assert!(a.verify("same"));
        assert!(b.verify("same"));
    }

    #[test]
    fn test_phc_roundtrip_through_storage() {
        let digest = PasswordDigest::derive("letmein").unwrap();
        let reloaded = PasswordDigest::from_phc(digest.as_str());
        assert!(reloaded.verify("letmein"));
        assert!(!reloaded.verify("letmeout"));
    }

    #[test]
    fn test_garbage_phc_fails_closed() {
        let bogus = PasswordDigest::from_phc("not a phc string");
        assert!(!bogus.verify("anything"));
    }

    #[test]
    fn test_debug_is_redacted() {
        let digest = PasswordDigest::derive("topsecret").unwrap();
        let debug = format!("{:?}", digest);
        assert!(!debug.contains("topsecret"));
        assert!(!debug.contains('$'));
    }
}
