//! Access decisions and denial reasons.
//!
//! Denials are ordinary values, not errors. Infrastructure failures travel
//! on a separate channel entirely, so a caller can always distinguish "the
//! store is down" from "this paste is gone".

use serde::{Deserialize, Serialize};

use sealbin_core::{PasteId, PasteRecord};

/// Why an access attempt was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    /// The token string is not structurally a token.
    MalformedToken,

    /// No paste answers to the token. A reclaimed expired paste and a paste
    /// that never existed are indistinguishable here.
    NotFound,

    /// The paste's expiration instant has been reached.
    Expired,

    /// A burn-after-reading paste that has already been delivered.
    AlreadyConsumed,

    /// The supplied password failed verification.
    WrongPassword,

    /// The operation needs the write token but was handed a read token.
    CapabilityMismatch,
}

impl DenyReason {
    /// The caller-facing message for this denial.
    ///
    /// `NotFound` and `Expired` share one message on purpose: the two are
    /// indistinguishable externally while staying distinct for logging.
    pub fn public_message(&self) -> &'static str {
        match self {
            DenyReason::MalformedToken => "that link is not a valid paste link",
            DenyReason::NotFound | DenyReason::Expired => {
                "this paste does not exist or is no longer available"
            }
            DenyReason::AlreadyConsumed => "this paste has already been viewed",
            DenyReason::WrongPassword => "incorrect password",
            DenyReason::CapabilityMismatch => "this operation requires the edit link",
        }
    }
}

/// Outcome of evaluating one access attempt.
///
/// `Allow` borrows the record it was evaluated against so the caller can
/// act on exactly the state that passed the rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision<'a> {
    /// Access granted.
    Allow(&'a PasteRecord),

    /// The paste is password-gated and no attempt was supplied.
    RequirePassword(PasteId),

    /// Access denied.
    Denied(DenyReason),
}

impl Decision<'_> {
    /// True if access was granted.
    pub fn is_allow(&self) -> bool {
        matches!(self, Decision::Allow(_))
    }

    /// The denial reason, if this decision is a denial.
    pub fn deny_reason(&self) -> Option<DenyReason> {
        match self {
            Decision::Denied(reason) => Some(*reason),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_and_expired_share_public_message() {
        assert_eq!(
            DenyReason::NotFound.public_message(),
            DenyReason::Expired.public_message()
        );
    }

    #[test]
    fn test_other_reasons_have_distinct_messages() {
        let reasons = [
            DenyReason::MalformedToken,
            DenyReason::NotFound,
            DenyReason::AlreadyConsumed,
            DenyReason::WrongPassword,
            DenyReason::CapabilityMismatch,
        ];
        for (i, a) in reasons.iter().enumerate() {
            for b in reasons.iter().skip(i + 1) {
                assert_ne!(a.public_message(), b.public_message());
            }
        }
    }

    #[test]
    fn test_deny_reason_serde_words() {
        assert_eq!(
            serde_json::to_string(&DenyReason::AlreadyConsumed).unwrap(),
            "\"already_consumed\""
        );
        assert_eq!(
            serde_json::to_string(&DenyReason::MalformedToken).unwrap(),
            "\"malformed_token\""
        );
    }
}
