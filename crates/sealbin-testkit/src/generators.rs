//! Proptest generators for property-based testing.

use proptest::prelude::*;

use sealbin_core::{
    Capability, Expiry, PasteBuilder, PasteId, PasteRecord, TokenBody, Visibility,
};

/// Generate a random PasteId.
pub fn paste_id() -> impl Strategy<Value = PasteId> {
    any::<[u8; 16]>().prop_map(PasteId::from_bytes)
}

/// Generate a random token body.
pub fn token_body() -> impl Strategy<Value = TokenBody> {
    any::<[u8; 16]>().prop_map(TokenBody::from_bytes)
}

/// Generate a capability.
pub fn capability() -> impl Strategy<Value = Capability> {
    prop_oneof![Just(Capability::Read), Just(Capability::Write)]
}

/// Generate a visibility.
pub fn visibility() -> impl Strategy<Value = Visibility> {
    prop_oneof![
        Just(Visibility::Public),
        Just(Visibility::Private),
        Just(Visibility::Unlisted),
    ]
}

/// Generate an expiry, permanent or at a bounded instant.
pub fn expiry() -> impl Strategy<Value = Expiry> {
    prop_oneof![
        Just(Expiry::Permanent),
        (0i64..=i64::MAX / 2).prop_map(Expiry::At),
    ]
}

/// Generate non-empty content bytes up to the given length.
pub fn content(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 1..=max_len)
}

/// Parameters for generating a paste record.
///
/// Passwords are left out: Argon2 derivation per proptest case would
/// dominate the run time. Use [`crate::fixtures::make_protected_paste`] for
/// password scenarios.
#[derive(Debug, Clone)]
pub struct PasteParams {
    pub content: Vec<u8>,
    pub visibility: Visibility,
    pub burn_after_reading: bool,
    pub expiry: Expiry,
    pub created_at: i64,
}

impl Arbitrary for PasteParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            content(256),
            visibility(),
            any::<bool>(),
            expiry(),
            0i64..=1_700_000_000_000i64,
        )
            .prop_map(
                |(content, visibility, burn_after_reading, expiry, created_at)| PasteParams {
                    content,
                    visibility,
                    burn_after_reading,
                    expiry,
                    created_at,
                },
            )
            .boxed()
    }
}

/// Build a record from parameters.
///
/// Identifier and tokens are minted fresh, so two records from the same
/// parameters never collide.
pub fn record_from_params(params: &PasteParams) -> PasteRecord {
    PasteBuilder::new(params.content.clone())
        .visibility(params.visibility)
        .burn_after_reading(params.burn_after_reading)
        .expiry(params.expiry)
        .seal(params.created_at)
}
