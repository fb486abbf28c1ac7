//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use sealbin::{EngineConfig, PasteEngine};
use sealbin_core::{Expiry, PasswordDigest, PasteBuilder, PasteId, PasteRecord, Visibility};
use sealbin_store::{CreateOutcome, MemoryStore, Store};

/// A test fixture wrapping an engine over a memory store.
pub struct TestFixture {
    pub engine: PasteEngine<MemoryStore>,
}

impl TestFixture {
    /// Create a fixture with default configuration.
    pub fn new() -> Self {
        Self {
            engine: PasteEngine::new(MemoryStore::new(), EngineConfig::default()),
        }
    }

    /// Create a fixture with the given configuration.
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            engine: PasteEngine::new(MemoryStore::new(), config),
        }
    }

    /// Get the underlying store.
    pub fn store(&self) -> &MemoryStore {
        self.engine.store()
    }

    /// Insert a pre-built record directly, bypassing the engine.
    pub async fn seed(&self, record: PasteRecord) -> PasteId {
        let id = record.id;
        let outcome = self.store().create(&record).await.expect("seed insert");
        assert_eq!(outcome, CreateOutcome::Created);
        id
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// A plain unlisted paste around the given content.
pub fn make_paste(content: &[u8]) -> PasteRecord {
    PasteBuilder::new(content.to_vec()).seal(now_millis())
}

/// A burn-after-reading paste.
pub fn make_burn_paste(content: &[u8]) -> PasteRecord {
    PasteBuilder::new(content.to_vec())
        .burn_after_reading(true)
        .seal(now_millis())
}

/// A password-protected paste.
pub fn make_protected_paste(content: &[u8], password: &str) -> PasteRecord {
    let digest = PasswordDigest::derive(password).expect("digest derivation");
    PasteBuilder::new(content.to_vec())
        .password(digest)
        .seal(now_millis())
}

/// A paste whose expiry already lies in the past.
pub fn make_expired_paste(content: &[u8]) -> PasteRecord {
    PasteBuilder::new(content.to_vec())
        .expiry(Expiry::At(now_millis() - 60_000))
        .seal(now_millis() - 120_000)
}

/// A public paste that shows up in listings.
pub fn make_public_paste(content: &[u8]) -> PasteRecord {
    PasteBuilder::new(content.to_vec())
        .visibility(Visibility::Public)
        .seal(now_millis())
}

/// Get current time in milliseconds.
fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_millis() as i64
}
