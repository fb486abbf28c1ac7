//! Database schema migrations for SQLite.
//!
//! We use a simple versioned migration system. Each migration is a SQL string
//! that transforms the schema from version N to N+1.

use rusqlite::Connection;

use crate::error::{Result, StoreError};

/// Current schema version.
pub const CURRENT_VERSION: u32 = 1;

/// Initialize or migrate the database schema.
///
/// This function is idempotent - it can be called multiple times safely.
pub fn migrate(conn: &mut Connection) -> Result<()> {
    // Create migrations table if it doesn't exist
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at INTEGER NOT NULL
        )",
        [],
    )?;

    // Get current version
    let current: u32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);

    // Apply migrations
    if current < CURRENT_VERSION {
        let tx = conn.transaction()?;

        for version in (current + 1)..=CURRENT_VERSION {
            apply_migration(&tx, version)?;

            tx.execute(
                "INSERT INTO schema_migrations (version, applied_at) VALUES (?1, ?2)",
                rusqlite::params![version, now_millis()],
            )?;
        }

        tx.commit()?;
        tracing::debug!(from = current, to = CURRENT_VERSION, "applied schema migrations");
    }

    Ok(())
}

/// Apply a specific migration version.
fn apply_migration(conn: &Connection, version: u32) -> Result<()> {
    match version {
        1 => apply_v1(conn),
        _ => Err(StoreError::Migration(format!(
            "unknown migration version: {}",
            version
        ))),
    }
}

/// Migration v1: Initial schema.
fn apply_v1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- Pastes table: one row per shared artifact
        CREATE TABLE pastes (
            id BLOB PRIMARY KEY,                       -- 16 bytes, random
            content BLOB NOT NULL,                     -- opaque payload
            visibility TEXT NOT NULL,                  -- 'public' | 'private' | 'unlisted'
            password_hash TEXT,                        -- Argon2 PHC string, NULL when open
            burn_after_reading INTEGER NOT NULL DEFAULT 0,
            expires_at INTEGER,                        -- Unix ms, NULL means permanent
            created_at INTEGER NOT NULL,               -- Unix ms
            read_token BLOB NOT NULL UNIQUE,           -- 16 bytes, read-capability body
            write_token BLOB NOT NULL UNIQUE,          -- 16 bytes, write-capability body
            revealed INTEGER NOT NULL DEFAULT 0,       -- burn tombstone flag
            views INTEGER NOT NULL DEFAULT 0           -- successful deliveries
        );

        -- Indexes for common queries
        CREATE INDEX idx_pastes_visibility_created ON pastes(visibility, created_at);
        CREATE INDEX idx_pastes_expires_at ON pastes(expires_at) WHERE expires_at IS NOT NULL;
        "#,
    )?;

    Ok(())
}

/// Get current time in milliseconds.
fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_millis() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migration_creates_tables() {
        let mut conn = Connection::open_in_memory().unwrap();
        migrate(&mut conn).unwrap();

        // Verify tables exist
        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();

        assert!(tables.contains(&"pastes".to_string()));
        assert!(tables.contains(&"schema_migrations".to_string()));
    }

    #[test]
    fn test_migration_enforces_unique_tokens() {
        let mut conn = Connection::open_in_memory().unwrap();
        migrate(&mut conn).unwrap();

        conn.execute(
            "INSERT INTO pastes (id, content, visibility, created_at, read_token, write_token)
             VALUES (?1, ?2, 'unlisted', 0, ?3, ?4)",
            rusqlite::params![
                [1u8; 16].as_slice(),
                b"x".as_slice(),
                [2u8; 16].as_slice(),
                [3u8; 16].as_slice()
            ],
        )
        .unwrap();

        // Reusing a read token body must violate the UNIQUE constraint.
        let result = conn.execute(
            "INSERT INTO pastes (id, content, visibility, created_at, read_token, write_token)
             VALUES (?1, ?2, 'unlisted', 0, ?3, ?4)",
            rusqlite::params![
                [9u8; 16].as_slice(),
                b"y".as_slice(),
                [2u8; 16].as_slice(),
                [8u8; 16].as_slice()
            ],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_migration_idempotent() {
        let mut conn = Connection::open_in_memory().unwrap();
        migrate(&mut conn).unwrap();
        migrate(&mut conn).unwrap(); // Should not error
        migrate(&mut conn).unwrap(); // Still should not error

        // Verify version is 1
        let version: u32 = conn
            .query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(version, 1);
    }
}
