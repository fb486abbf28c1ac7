//! In-memory implementation of the Store trait.
//!
//! This is primarily for testing. It has the same semantics as SQLite
//! but keeps everything in memory with no persistence.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use sealbin_core::{Capability, PasteId, PasteMeta, PasteRecord, TokenBody};

use crate::error::Result;
use crate::traits::{BurnResult, CreateOutcome, PastePatch, Store};

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock; the
/// write lock is what makes creation and the burn CAS atomic.
pub struct MemoryStore {
    inner: RwLock<MemoryStoreInner>,
}

struct MemoryStoreInner {
    /// Records indexed by id.
    pastes: HashMap<PasteId, PasteRecord>,

    /// Read-capability index: token body -> paste id.
    read_tokens: HashMap<TokenBody, PasteId>,

    /// Write-capability index: token body -> paste id.
    write_tokens: HashMap<TokenBody, PasteId>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryStoreInner {
                pastes: HashMap::new(),
                read_tokens: HashMap::new(),
                write_tokens: HashMap::new(),
            }),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create(&self, record: &PasteRecord) -> Result<CreateOutcome> {
        let mut inner = self.inner.write().unwrap();

        if inner.pastes.contains_key(&record.id)
            || inner.read_tokens.contains_key(&record.read_token)
            || inner.write_tokens.contains_key(&record.write_token)
        {
            return Ok(CreateOutcome::AlreadyExists);
        }

        inner.read_tokens.insert(record.read_token, record.id);
        inner.write_tokens.insert(record.write_token, record.id);
        inner.pastes.insert(record.id, record.clone());

        Ok(CreateOutcome::Created)
    }

    async fn get(&self, id: &PasteId) -> Result<Option<PasteRecord>> {
        let inner = self.inner.read().unwrap();
        Ok(inner.pastes.get(id).cloned())
    }

    async fn get_by_token(
        &self,
        capability: Capability,
        body: &TokenBody,
    ) -> Result<Option<PasteRecord>> {
        let inner = self.inner.read().unwrap();

        let index = match capability {
            Capability::Read => &inner.read_tokens,
            Capability::Write => &inner.write_tokens,
        };
        Ok(index.get(body).and_then(|id| inner.pastes.get(id)).cloned())
    }

    async fn update(&self, id: &PasteId, patch: PastePatch) -> Result<Option<PasteRecord>> {
        let mut inner = self.inner.write().unwrap();

        let Some(record) = inner.pastes.get_mut(id) else {
            return Ok(None);
        };

        if let Some(content) = patch.content {
            record.content = content;
        }
        if let Some(visibility) = patch.visibility {
            record.visibility = visibility;
        }
        if let Some(password) = patch.password {
            record.password = password;
        }

        Ok(Some(record.clone()))
    }

    async fn delete(&self, id: &PasteId) -> Result<bool> {
        let mut inner = self.inner.write().unwrap();

        let Some(record) = inner.pastes.remove(id) else {
            return Ok(false);
        };
        inner.read_tokens.remove(&record.read_token);
        inner.write_tokens.remove(&record.write_token);

        Ok(true)
    }

    async fn mark_revealed(&self, id: &PasteId) -> Result<BurnResult> {
        // Check-and-set under the write lock: at most one caller observes
        // the false-to-true transition.
        let mut inner = self.inner.write().unwrap();

        match inner.pastes.get_mut(id) {
            None => Ok(BurnResult::Missing),
            Some(record) if record.revealed => Ok(BurnResult::AlreadyBurned),
            Some(record) => {
                record.revealed = true;
                Ok(BurnResult::Burned)
            }
        }
    }

    async fn increment_views(&self, id: &PasteId) -> Result<Option<u64>> {
        let mut inner = self.inner.write().unwrap();

        Ok(inner.pastes.get_mut(id).map(|record| {
            record.views += 1;
            record.views
        }))
    }

    async fn purge_expired(&self, now: i64) -> Result<u64> {
        let mut inner = self.inner.write().unwrap();

        let expired: Vec<PasteId> = inner
            .pastes
            .values()
            .filter(|record| record.expiry.is_expired(now))
            .map(|record| record.id)
            .collect();

        for id in &expired {
            if let Some(record) = inner.pastes.remove(id) {
                inner.read_tokens.remove(&record.read_token);
                inner.write_tokens.remove(&record.write_token);
            }
        }

        Ok(expired.len() as u64)
    }

    async fn list_public(&self, now: i64, limit: usize) -> Result<Vec<PasteMeta>> {
        let inner = self.inner.read().unwrap();

        let mut metas: Vec<PasteMeta> = inner
            .pastes
            .values()
            .filter(|record| {
                record.visibility.is_listed()
                    && !record.expiry.is_expired(now)
                    && !record.revealed
            })
            .map(PasteRecord::meta)
            .collect();

        metas.sort_by_key(|meta| std::cmp::Reverse(meta.created_at));
        metas.truncate(limit);

        Ok(metas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use sealbin_core::{Expiry, PasteBuilder, PasswordDigest, Visibility};

    fn make_test_paste(content: &str, created_at: i64) -> PasteRecord {
        PasteBuilder::new(content.as_bytes().to_vec()).seal(created_at)
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let store = MemoryStore::new();
        let record = make_test_paste("hello", 1_000);

        let outcome = store.create(&record).await.unwrap();
        assert_eq!(outcome, CreateOutcome::Created);

        let retrieved = store.get(&record.id).await.unwrap().unwrap();
        assert_eq!(retrieved, record);
    }

    #[tokio::test]
    async fn test_create_duplicate_is_rejected() {
        let store = MemoryStore::new();
        let record = make_test_paste("hello", 1_000);

        assert_eq!(store.create(&record).await.unwrap(), CreateOutcome::Created);
        assert_eq!(
            store.create(&record).await.unwrap(),
            CreateOutcome::AlreadyExists
        );
    }

    #[tokio::test]
    async fn test_get_by_token_is_capability_scoped() {
        let store = MemoryStore::new();
        let record = make_test_paste("hello", 1_000);
        store.create(&record).await.unwrap();

        let by_read = store
            .get_by_token(Capability::Read, &record.read_token)
            .await
            .unwrap();
        assert_eq!(by_read.unwrap().id, record.id);

        let by_write = store
            .get_by_token(Capability::Write, &record.write_token)
            .await
            .unwrap();
        assert_eq!(by_write.unwrap().id, record.id);

        // A read body under the write index matches nothing, and vice versa.
        assert!(store
            .get_by_token(Capability::Write, &record.read_token)
            .await
            .unwrap()
            .is_none());
        assert!(store
            .get_by_token(Capability::Read, &record.write_token)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_update_patches_fields() {
        let store = MemoryStore::new();
        let record = make_test_paste("before", 1_000);
        store.create(&record).await.unwrap();

        let digest = PasswordDigest::from_phc("$argon2id$stub");
        let patch = PastePatch {
            content: Some(Bytes::from("after")),
            visibility: Some(Visibility::Public),
            password: Some(Some(digest.clone())),
        };
        let updated = store.update(&record.id, patch).await.unwrap().unwrap();
        assert_eq!(updated.content, Bytes::from("after"));
        assert_eq!(updated.visibility, Visibility::Public);
        assert_eq!(updated.password, Some(digest));

        // Clearing the password is distinct from leaving it alone.
        let cleared = store
            .update(
                &record.id,
                PastePatch {
                    password: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert!(cleared.password.is_none());
        assert_eq!(cleared.content, Bytes::from("after"));
    }

    #[tokio::test]
    async fn test_update_missing_returns_none() {
        let store = MemoryStore::new();
        let record = make_test_paste("x", 1_000);
        let result = store
            .update(&record.id, PastePatch::default())
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_mark_revealed_cas() {
        let store = MemoryStore::new();
        let record = make_test_paste("burn me", 1_000);
        store.create(&record).await.unwrap();

        assert_eq!(
            store.mark_revealed(&record.id).await.unwrap(),
            BurnResult::Burned
        );
        assert_eq!(
            store.mark_revealed(&record.id).await.unwrap(),
            BurnResult::AlreadyBurned
        );
        assert_eq!(
            store.mark_revealed(&PasteId::ZERO).await.unwrap(),
            BurnResult::Missing
        );
    }

    #[tokio::test]
    async fn test_increment_views() {
        let store = MemoryStore::new();
        let record = make_test_paste("x", 1_000);
        store.create(&record).await.unwrap();

        assert_eq!(store.increment_views(&record.id).await.unwrap(), Some(1));
        assert_eq!(store.increment_views(&record.id).await.unwrap(), Some(2));
        assert_eq!(store.increment_views(&PasteId::ZERO).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_removes_token_index_entries() {
        let store = MemoryStore::new();
        let record = make_test_paste("x", 1_000);
        store.create(&record).await.unwrap();

        assert!(store.delete(&record.id).await.unwrap());
        assert!(!store.delete(&record.id).await.unwrap());

        assert!(store.get(&record.id).await.unwrap().is_none());
        assert!(store
            .get_by_token(Capability::Read, &record.read_token)
            .await
            .unwrap()
            .is_none());
        assert!(store
            .get_by_token(Capability::Write, &record.write_token)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_purge_expired_only_removes_expired() {
        let store = MemoryStore::new();
        let permanent = make_test_paste("keep", 1_000);
        let expired = PasteBuilder::new("drop")
            .expiry(Expiry::At(2_000))
            .seal(1_000);
        let future = PasteBuilder::new("later")
            .expiry(Expiry::At(9_000))
            .seal(1_000);
        for record in [&permanent, &expired, &future] {
            store.create(record).await.unwrap();
        }

        let purged = store.purge_expired(2_000).await.unwrap();
        assert_eq!(purged, 1);
        assert!(store.get(&expired.id).await.unwrap().is_none());
        assert!(store.get(&permanent.id).await.unwrap().is_some());
        assert!(store.get(&future.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_list_public_filters_and_orders() {
        let store = MemoryStore::new();
        let old_public = PasteBuilder::new("old")
            .visibility(Visibility::Public)
            .seal(1_000);
        let new_public = PasteBuilder::new("new")
            .visibility(Visibility::Public)
            .seal(2_000);
        let unlisted = PasteBuilder::new("hidden").seal(1_500);
        let expired_public = PasteBuilder::new("gone")
            .visibility(Visibility::Public)
            .expiry(Expiry::At(1_800))
            .seal(1_200);
        let mut consumed_public = PasteBuilder::new("burned")
            .visibility(Visibility::Public)
            .burn_after_reading(true)
            .seal(1_700);
        consumed_public.revealed = true;

        for record in [
            &old_public,
            &new_public,
            &unlisted,
            &expired_public,
            &consumed_public,
        ] {
            store.create(record).await.unwrap();
        }

        let metas = store.list_public(3_000, 10).await.unwrap();
        let ids: Vec<_> = metas.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![new_public.id, old_public.id]);

        let limited = store.list_public(3_000, 1).await.unwrap();
        assert_eq!(limited.len(), 1);
        assert_eq!(limited[0].id, new_public.id);
    }
}
