//! The access policy evaluator.
//!
//! One pure function decides every read-path access attempt. It performs no
//! I/O and mutates nothing. Orchestration, fetching the record, burning,
//! counting views, reclaiming expired rows, all belongs to the caller.

use sealbin_core::{Capability, CapabilityToken, PasteRecord};

use crate::decision::{Decision, DenyReason};

/// Decide one access attempt.
///
/// `record` is whatever the store resolved for the token, `None` when
/// nothing answered. `password` is the caller's attempt, if any. `now` is
/// the caller's clock in Unix milliseconds.
///
/// Rules apply in order and the first match wins:
///
/// 1. a malformed token denies
/// 2. a missing or unbound record denies as not found
/// 3. expiration denies, checked before consumption
/// 4. a consumed tombstone denies
/// 5. write capability allows, bypassing the password gate
/// 6. the password gate prompts, denies, or allows
/// 7. everything else allows
pub fn evaluate<'a>(
    token: &str,
    record: Option<&'a PasteRecord>,
    password: Option<&str>,
    now: i64,
) -> Decision<'a> {
    // 1. The token must be structurally valid.
    let Ok(parsed) = CapabilityToken::parse(token) else {
        return Decision::Denied(DenyReason::MalformedToken);
    };

    // 2. Something must answer to it, under the capability it declares.
    let Some(record) = record else {
        return Decision::Denied(DenyReason::NotFound);
    };
    if record.token_body(parsed.capability) != &parsed.body {
        return Decision::Denied(DenyReason::NotFound);
    }

    // 3. Expiration. The boundary instant itself is already expired.
    if record.expiry.is_expired(now) {
        return Decision::Denied(DenyReason::Expired);
    }

    // 4. A consumed burn paste stays denied forever.
    if record.revealed {
        return Decision::Denied(DenyReason::AlreadyConsumed);
    }

    // 5. The write token bypasses the password gate.
    if parsed.capability == Capability::Write {
        return Decision::Allow(record);
    }

    // 6. The password gate.
    if let Some(digest) = &record.password {
        return match password {
            None => Decision::RequirePassword(record.id),
            Some(attempt) if digest.verify(attempt) => Decision::Allow(record),
            Some(_) => Decision::Denied(DenyReason::WrongPassword),
        };
    }

    // 7. Open paste.
    Decision::Allow(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use sealbin_core::{Expiry, PasteBuilder, PasswordDigest};

    const NOW: i64 = 1_700_000_000_000;

    fn open_record() -> PasteRecord {
        PasteBuilder::new("content").seal(NOW - 10)
    }

    fn read_token(record: &PasteRecord) -> String {
        record.token_pair().read.encode()
    }

    fn write_token(record: &PasteRecord) -> String {
        record.token_pair().write.encode()
    }

    #[test]
    fn test_malformed_token_denies_first() {
        let record = open_record();
        // Malformed wins even with a resolvable record on hand.
        let decision = evaluate("garbage", Some(&record), None, NOW);
        assert_eq!(decision, Decision::Denied(DenyReason::MalformedToken));
    }

    #[test]
    fn test_missing_record_is_not_found() {
        let record = open_record();
        let decision = evaluate(&read_token(&record), None, None, NOW);
        assert_eq!(decision, Decision::Denied(DenyReason::NotFound));
    }

    #[test]
    fn test_unbound_token_is_not_found() {
        let record = open_record();
        let stranger = open_record();
        let decision = evaluate(&read_token(&stranger), Some(&record), None, NOW);
        assert_eq!(decision, Decision::Denied(DenyReason::NotFound));
    }

    #[test]
    fn test_prefix_flip_does_not_bind() {
        let record = open_record();
        // The read body presented under the write prefix matches nothing.
        let flipped = format!("wtkn_{}", record.read_token.to_hex());
        let decision = evaluate(&flipped, Some(&record), None, NOW);
        assert_eq!(decision, Decision::Denied(DenyReason::NotFound));
    }

    #[test]
    fn test_expiry_boundary() {
        let record = PasteBuilder::new("x").expiry(Expiry::At(NOW)).seal(NOW - 10);
        let token = read_token(&record);

        assert!(evaluate(&token, Some(&record), None, NOW - 1).is_allow());
        assert_eq!(
            evaluate(&token, Some(&record), None, NOW),
            Decision::Denied(DenyReason::Expired)
        );
        assert_eq!(
            evaluate(&token, Some(&record), None, NOW + 1),
            Decision::Denied(DenyReason::Expired)
        );
    }

    #[test]
    fn test_expired_outranks_consumed() {
        let mut record = PasteBuilder::new("x")
            .burn_after_reading(true)
            .expiry(Expiry::At(NOW))
            .seal(NOW - 10);
        record.revealed = true;
        let decision = evaluate(&read_token(&record), Some(&record), None, NOW + 5);
        assert_eq!(decision, Decision::Denied(DenyReason::Expired));
    }

    #[test]
    fn test_consumed_tombstone_denies() {
        let mut record = PasteBuilder::new("x").burn_after_reading(true).seal(NOW - 10);
        record.revealed = true;
        let decision = evaluate(&read_token(&record), Some(&record), None, NOW);
        assert_eq!(decision, Decision::Denied(DenyReason::AlreadyConsumed));
    }

    #[test]
    fn test_open_paste_allows() {
        let record = open_record();
        let decision = evaluate(&read_token(&record), Some(&record), None, NOW);
        assert_eq!(decision, Decision::Allow(&record));
    }

    #[test]
    fn test_password_gate_prompts_without_attempt() {
        let digest = PasswordDigest::derive("sesame").unwrap();
        let record = PasteBuilder::new("x").password(digest).seal(NOW - 10);
        let decision = evaluate(&read_token(&record), Some(&record), None, NOW);
        assert_eq!(decision, Decision::RequirePassword(record.id));
    }

    #[test]
    fn test_password_gate_rejects_wrong_attempt() {
        let digest = PasswordDigest::derive("sesame").unwrap();
        let record = PasteBuilder::new("x").password(digest).seal(NOW - 10);
        let token = read_token(&record);
        for attempt in ["wrong", "", "Sesame"] {
            assert_eq!(
                evaluate(&token, Some(&record), Some(attempt), NOW),
                Decision::Denied(DenyReason::WrongPassword)
            );
        }
    }

    #[test]
    fn test_password_gate_allows_correct_attempt() {
        let digest = PasswordDigest::derive("sesame").unwrap();
        let record = PasteBuilder::new("x").password(digest).seal(NOW - 10);
        let decision = evaluate(&read_token(&record), Some(&record), Some("sesame"), NOW);
        assert_eq!(decision, Decision::Allow(&record));
    }

    #[test]
    fn test_write_token_bypasses_password() {
        let digest = PasswordDigest::derive("sesame").unwrap();
        let record = PasteBuilder::new("x").password(digest).seal(NOW - 10);
        let decision = evaluate(&write_token(&record), Some(&record), None, NOW);
        assert_eq!(decision, Decision::Allow(&record));
    }

    #[test]
    fn test_write_token_still_subject_to_lifecycle() {
        let mut record = PasteBuilder::new("x").burn_after_reading(true).seal(NOW - 10);
        record.revealed = true;
        let decision = evaluate(&write_token(&record), Some(&record), None, NOW);
        assert_eq!(decision, Decision::Denied(DenyReason::AlreadyConsumed));
    }

    #[test]
    fn test_expiry_checked_before_password() {
        let digest = PasswordDigest::derive("sesame").unwrap();
        let record = PasteBuilder::new("x")
            .password(digest)
            .expiry(Expiry::At(NOW))
            .seal(NOW - 10);
        // No prompt for a dead paste, even without an attempt.
        let decision = evaluate(&read_token(&record), Some(&record), None, NOW + 1);
        assert_eq!(decision, Decision::Denied(DenyReason::Expired));
    }

    proptest! {
        #[test]
        fn prop_evaluate_is_total(token in ".*", password in proptest::option::of(".{0,16}"), now in any::<i64>()) {
            let record = open_record();
            let _ = evaluate(&token, Some(&record), password.as_deref(), now);
            let _ = evaluate(&token, None, password.as_deref(), now);
        }

        #[test]
        fn prop_expired_always_outranks_consumed(offset in 0i64..1_000_000_000) {
            let mut record = PasteBuilder::new("x")
                .burn_after_reading(true)
                .expiry(Expiry::At(NOW))
                .seal(NOW - 10);
            record.revealed = true;
            let token = read_token(&record);
            prop_assert_eq!(
                evaluate(&token, Some(&record), None, NOW + offset),
                Decision::Denied(DenyReason::Expired)
            );
        }

        #[test]
        fn prop_own_token_allows_open_paste(now in any::<i64>()) {
            let record = open_record();
            let decision = evaluate(&read_token(&record), Some(&record), None, now);
            prop_assert!(decision.is_allow());
        }
    }
}
