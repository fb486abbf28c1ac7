//! Error types for the sealbin core crate.

use thiserror::Error;

/// Structural failures while parsing a capability token.
///
/// These describe why a token string is malformed. A well-formed token that
/// simply matches no paste is not an error at this layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("unknown token prefix")]
    UnknownPrefix,

    #[error("token body must be {expected} hex characters, got {got}")]
    BadLength { expected: usize, got: usize },

    #[error("token body must be lowercase hexadecimal")]
    BadCharset,
}

/// Core errors that can occur outside of access decisions.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("malformed token: {0}")]
    Token(#[from] TokenError),

    #[error("password hashing failed: {0}")]
    PasswordHash(String),
}
