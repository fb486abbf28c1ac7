//! SQLite implementation of the Store trait.
//!
//! This is the primary storage backend for sealbin. It uses rusqlite with
//! bundled SQLite, wrapped in async via tokio::spawn_blocking. A single
//! connection behind a mutex keeps every operation serialized, which is
//! what makes the guarded burn update an atomic compare-and-set.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use rusqlite::{params, Connection, OptionalExtension};

use sealbin_core::{
    Capability, Expiry, PasteId, PasteMeta, PasteRecord, PasswordDigest, TokenBody, Visibility,
};

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::{BurnResult, CreateOutcome, PastePatch, Store};

const PASTE_COLUMNS: &str = "id, content, visibility, password_hash, burn_after_reading, \
     expires_at, created_at, read_token, write_token, revealed, views";

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex. All operations use spawn_blocking
/// to avoid blocking the async runtime.
pub struct SqliteStore {
    /// The SQLite connection, protected by a mutex.
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run a closure against the connection on the blocking pool.
    ///
    /// A poisoned mutex or a torn-down pool both surface as `Unavailable`,
    /// never as a missing paste.
    async fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut conn = conn
                .lock()
                .map_err(|e| StoreError::Unavailable(format!("connection mutex poisoned: {}", e)))?;
            f(&mut conn)
        })
        .await
        .map_err(|e| StoreError::Unavailable(format!("blocking task failed: {}", e)))?
    }
}

// Helper to convert a row to PasteRecord.
fn row_to_paste(row: &rusqlite::Row<'_>) -> rusqlite::Result<PasteRecord> {
    let id_bytes: Vec<u8> = row.get("id")?;
    let content: Vec<u8> = row.get("content")?;
    let visibility: String = row.get("visibility")?;
    let password_hash: Option<String> = row.get("password_hash")?;
    let expires_at: Option<i64> = row.get("expires_at")?;
    let read_token_bytes: Vec<u8> = row.get("read_token")?;
    let write_token_bytes: Vec<u8> = row.get("write_token")?;
    let views: i64 = row.get("views")?;

    Ok(PasteRecord {
        id: PasteId::try_from(id_bytes.as_slice())
            .map_err(|_| bad_blob(0, "id"))?,
        content: Bytes::from(content),
        visibility: Visibility::parse(&visibility).unwrap_or(Visibility::Private),
        password: password_hash.map(PasswordDigest::from_phc),
        burn_after_reading: row.get("burn_after_reading")?,
        expiry: Expiry::from_millis(expires_at),
        created_at: row.get("created_at")?,
        read_token: TokenBody::try_from(read_token_bytes.as_slice())
            .map_err(|_| bad_blob(7, "read_token"))?,
        write_token: TokenBody::try_from(write_token_bytes.as_slice())
            .map_err(|_| bad_blob(8, "write_token"))?,
        revealed: row.get("revealed")?,
        views: views as u64,
    })
}

fn bad_blob(idx: usize, name: &str) -> rusqlite::Error {
    rusqlite::Error::InvalidColumnType(idx, name.into(), rusqlite::types::Type::Blob)
}

#[async_trait]
impl Store for SqliteStore {
    async fn create(&self, record: &PasteRecord) -> Result<CreateOutcome> {
        let record = record.clone();
        self.with_conn(move |conn| {
            let result = conn.execute(
                "INSERT INTO pastes (id, content, visibility, password_hash, burn_after_reading,
                                     expires_at, created_at, read_token, write_token, revealed, views)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    record.id.as_bytes().as_slice(),
                    record.content.as_ref(),
                    record.visibility.as_str(),
                    record.password.as_ref().map(|d| d.as_str()),
                    record.burn_after_reading,
                    record.expiry.as_millis(),
                    record.created_at,
                    record.read_token.as_bytes().as_slice(),
                    record.write_token.as_bytes().as_slice(),
                    record.revealed,
                    record.views as i64,
                ],
            );

            match result {
                Ok(_) => Ok(CreateOutcome::Created),
                // UNIQUE violation on id or either token column.
                Err(rusqlite::Error::SqliteFailure(e, _))
                    if e.code == rusqlite::ErrorCode::ConstraintViolation =>
                {
                    Ok(CreateOutcome::AlreadyExists)
                }
                Err(e) => Err(e.into()),
            }
        })
        .await
    }

    async fn get(&self, id: &PasteId) -> Result<Option<PasteRecord>> {
        let id = *id;
        self.with_conn(move |conn| {
            conn.query_row(
                &format!("SELECT {PASTE_COLUMNS} FROM pastes WHERE id = ?1"),
                params![id.as_bytes().as_slice()],
                row_to_paste,
            )
            .optional()
            .map_err(Into::into)
        })
        .await
    }

    async fn get_by_token(
        &self,
        capability: Capability,
        body: &TokenBody,
    ) -> Result<Option<PasteRecord>> {
        let body = *body;
        let column = match capability {
            Capability::Read => "read_token",
            Capability::Write => "write_token",
        };
        self.with_conn(move |conn| {
            conn.query_row(
                &format!("SELECT {PASTE_COLUMNS} FROM pastes WHERE {column} = ?1"),
                params![body.as_bytes().as_slice()],
                row_to_paste,
            )
            .optional()
            .map_err(Into::into)
        })
        .await
    }

    async fn update(&self, id: &PasteId, patch: PastePatch) -> Result<Option<PasteRecord>> {
        let id = *id;
        self.with_conn(move |conn| {
            let tx = conn.transaction()?;

            let existing = tx
                .query_row(
                    &format!("SELECT {PASTE_COLUMNS} FROM pastes WHERE id = ?1"),
                    params![id.as_bytes().as_slice()],
                    row_to_paste,
                )
                .optional()?;
            let Some(mut record) = existing else {
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

            tx.execute(
                "UPDATE pastes SET content = ?2, visibility = ?3, password_hash = ?4
                 WHERE id = ?1",
                params![
                    id.as_bytes().as_slice(),
                    record.content.as_ref(),
                    record.visibility.as_str(),
                    record.password.as_ref().map(|d| d.as_str()),
                ],
            )?;
            tx.commit()?;

            Ok(Some(record))
        })
        .await
    }

    async fn delete(&self, id: &PasteId) -> Result<bool> {
        let id = *id;
        self.with_conn(move |conn| {
            let deleted = conn.execute(
                "DELETE FROM pastes WHERE id = ?1",
                params![id.as_bytes().as_slice()],
            )?;
            Ok(deleted > 0)
        })
        .await
    }

    async fn mark_revealed(&self, id: &PasteId) -> Result<BurnResult> {
        let id = *id;
        self.with_conn(move |conn| {
            // Guarded update: only one caller ever sees this row transition.
            let flipped = conn.execute(
                "UPDATE pastes SET revealed = 1 WHERE id = ?1 AND revealed = 0",
                params![id.as_bytes().as_slice()],
            )?;
            if flipped == 1 {
                return Ok(BurnResult::Burned);
            }

            let exists = conn
                .query_row(
                    "SELECT 1 FROM pastes WHERE id = ?1",
                    params![id.as_bytes().as_slice()],
                    |_| Ok(()),
                )
                .optional()?
                .is_some();
            Ok(if exists {
                BurnResult::AlreadyBurned
            } else {
                BurnResult::Missing
            })
        })
        .await
    }

    async fn increment_views(&self, id: &PasteId) -> Result<Option<u64>> {
        let id = *id;
        self.with_conn(move |conn| {
            let views = conn
                .query_row(
                    "UPDATE pastes SET views = views + 1 WHERE id = ?1 RETURNING views",
                    params![id.as_bytes().as_slice()],
                    |row| row.get::<_, i64>(0),
                )
                .optional()?;
            Ok(views.map(|v| v as u64))
        })
        .await
    }

    async fn purge_expired(&self, now: i64) -> Result<u64> {
        self.with_conn(move |conn| {
            let purged = conn.execute(
                "DELETE FROM pastes WHERE expires_at IS NOT NULL AND expires_at <= ?1",
                params![now],
            )?;
            Ok(purged as u64)
        })
        .await
    }

    async fn list_public(&self, now: i64, limit: usize) -> Result<Vec<PasteMeta>> {
        self.with_conn(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {PASTE_COLUMNS} FROM pastes
                 WHERE visibility = 'public'
                   AND revealed = 0
                   AND (expires_at IS NULL OR expires_at > ?1)
                 ORDER BY created_at DESC
                 LIMIT ?2"
            ))?;

            let rows = stmt.query_map(params![now, limit as i64], row_to_paste)?;
            let mut metas = Vec::new();
            for row in rows {
                metas.push(row?.meta());
            }
            Ok(metas)
        })
        .await
    }
}
