//! SQLite persistence for users and chirps.
//!
//! Uses rusqlite with bundled SQLite behind an `Arc<Mutex<Connection>>`.
//! Every call runs on the blocking thread pool via `tokio::spawn_blocking`
//! so the async runtime never waits on disk I/O.
//!
//! The schema is managed by a versioned migration table (`schema_migrations`)
//! and applied idempotently on every open.

use std::path::Path;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use thiserror::Error;
use uuid::Uuid;

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("connection lock poisoned")]
    LockPoisoned,
    #[error("database task failed")]
    Background,
    #[error("migration error: {0}")]
    Migration(String),
}

// ── Records ───────────────────────────────────────────────────────────────────

/// A user row. `hashed_password` is the Argon2id PHC string — it stays inside
/// the server; the API layer strips it before serializing.
#[derive(Clone, Debug)]
pub struct UserRecord {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub email: String,
    pub hashed_password: String,
}

/// A chirp row.
#[derive(Clone, Debug)]
pub struct ChirpRecord {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user_id: Uuid,
    pub body: String,
}

fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<UserRecord> {
    Ok(UserRecord {
        id: row.get("id")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
        email: row.get("email")?,
        hashed_password: row.get("hashed_password")?,
    })
}

fn row_to_chirp(row: &rusqlite::Row<'_>) -> rusqlite::Result<ChirpRecord> {
    Ok(ChirpRecord {
        id: row.get("id")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
        user_id: row.get("user_id")?,
        body: row.get("body")?,
    })
}

// ── Store ─────────────────────────────────────────────────────────────────────

/// Handle to the database. Cheap to clone; all clones share one connection.
#[derive(Clone)]
pub struct Store {
    conn: Arc<Mutex<Connection>>,
}

impl Store {
    /// Opens (creating if necessary) the database at `path` and migrates it.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::from_connection(Connection::open(path)?)
    }

    /// Opens a fresh in-memory database. Used by tests.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(mut conn: Connection) -> Result<Self, StoreError> {
        // Per-connection pragma; the cascade on chirps.user_id depends on it.
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Runs `f` against the connection on the blocking thread pool.
    async fn with_conn<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Connection) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().map_err(|_| StoreError::LockPoisoned)?;
            f(&conn)
        })
        .await
        .map_err(|_| StoreError::Background)?
    }

    /// Inserts a user and returns the stored record. The id and timestamps
    /// are generated here, not by the caller. Fails on a duplicate email
    /// (UNIQUE constraint).
    pub async fn create_user(
        &self,
        email: String,
        hashed_password: String,
    ) -> Result<UserRecord, StoreError> {
        let now = Utc::now();
        let record = UserRecord {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            email,
            hashed_password,
        };

        let row = record.clone();
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO users (id, created_at, updated_at, email, hashed_password)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![row.id, row.created_at, row.updated_at, row.email, row.hashed_password],
            )?;
            Ok(())
        })
        .await?;

        Ok(record)
    }

    pub async fn user_by_email(&self, email: String) -> Result<Option<UserRecord>, StoreError> {
        self.with_conn(move |conn| {
            conn.query_row(
                "SELECT id, created_at, updated_at, email, hashed_password
                 FROM users WHERE email = ?1",
                params![email],
                row_to_user,
            )
            .optional()
            .map_err(StoreError::from)
        })
        .await
    }

    /// Inserts a chirp and returns the stored record. Fails if `user_id`
    /// does not reference an existing user (foreign key constraint).
    pub async fn create_chirp(
        &self,
        user_id: Uuid,
        body: String,
    ) -> Result<ChirpRecord, StoreError> {
        let now = Utc::now();
        let record = ChirpRecord {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            user_id,
            body,
        };

        let row = record.clone();
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO chirps (id, created_at, updated_at, user_id, body)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![row.id, row.created_at, row.updated_at, row.user_id, row.body],
            )?;
            Ok(())
        })
        .await?;

        Ok(record)
    }

    pub async fn chirp(&self, id: Uuid) -> Result<Option<ChirpRecord>, StoreError> {
        self.with_conn(move |conn| {
            conn.query_row(
                "SELECT id, created_at, updated_at, user_id, body
                 FROM chirps WHERE id = ?1",
                params![id],
                row_to_chirp,
            )
            .optional()
            .map_err(StoreError::from)
        })
        .await
    }

    /// All chirps, oldest first.
    pub async fn chirps(&self) -> Result<Vec<ChirpRecord>, StoreError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, created_at, updated_at, user_id, body
                 FROM chirps ORDER BY created_at",
            )?;
            let chirps = stmt
                .query_map([], row_to_chirp)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(chirps)
        })
        .await
    }

    /// Deletes every user; chirps go with them via `ON DELETE CASCADE`.
    pub async fn reset(&self) -> Result<(), StoreError> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM users", [])?;
            Ok(())
        })
        .await
    }
}

// ── Migrations ────────────────────────────────────────────────────────────────

/// Current schema version.
const CURRENT_VERSION: u32 = 1;

/// Initialize or migrate the database schema. Idempotent.
fn migrate(conn: &mut Connection) -> Result<(), StoreError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL
        )",
        [],
    )?;

    let current: u32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;

    if current < CURRENT_VERSION {
        let tx = conn.transaction()?;

        for version in (current + 1)..=CURRENT_VERSION {
            apply_migration(&tx, version)?;

            tx.execute(
                "INSERT INTO schema_migrations (version, applied_at) VALUES (?1, ?2)",
                params![version, Utc::now()],
            )?;
        }

        tx.commit()?;
    }

    Ok(())
}

fn apply_migration(conn: &Connection, version: u32) -> Result<(), StoreError> {
    match version {
        1 => apply_v1(conn),
        _ => Err(StoreError::Migration(format!(
            "unknown migration version: {version}"
        ))),
    }
}

/// Migration v1: initial schema.
fn apply_v1(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        r#"
        CREATE TABLE users (
            id BLOB PRIMARY KEY,              -- 16 bytes, UUID v4
            created_at TEXT NOT NULL,         -- RFC 3339, UTC
            updated_at TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            hashed_password TEXT NOT NULL     -- Argon2id PHC string
        );

        CREATE TABLE chirps (
            id BLOB PRIMARY KEY,              -- 16 bytes, UUID v4
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            user_id BLOB NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            body TEXT NOT NULL
        );

        CREATE INDEX idx_chirps_user ON chirps(user_id);
        CREATE INDEX idx_chirps_created ON chirps(created_at);
        "#,
    )?;

    Ok(())
}
