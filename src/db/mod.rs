//! SQLite persistence for entries and sessions.
//!
//! This module provides the durable implementation of the store traits. It uses
//! connection pooling via r2d2 so that messages from different owners can be
//! handled on different threads at the same time.
//!
//! # Module Structure
//!
//! - `schema`: Table definitions and schema initialization
//! - `entries`: Entry CRUD and positional operations
//! - `sessions`: Per-owner selected diary and date
//!
//! # Example
//!
//! ```no_run
//! use diarist::db::{Database, SqliteStore};
//! use diarist::store::SessionStore;
//! use std::path::Path;
//!
//! let db = Database::open(Path::new("/tmp/diarist.db"))?;
//! db.initialize_schema()?;
//! let store = SqliteStore::new(db);
//! let session = store.get_or_create("whatsapp:+15550001")?;
//! println!("{} / {}", session.current_diary, session.current_date);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod entries;
pub mod schema;
pub mod sessions;

use crate::constants::{DB_BUSY_TIMEOUT_MS, DB_POOL_MAX_SIZE, DEFAULT_DIARY};
use crate::errors::{AppResult, DatabaseError};
use crate::store::{
    local_today, DisplayEntry, EntryStore, IndexOutcome, Session, SessionStore, TodayFn,
};
use crate::validate::format_date;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Type alias for a pooled SQLite connection.
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// Database handle with connection pooling.
#[derive(Clone)]
pub struct Database {
    pool: Pool<SqliteConnectionManager>,
}

impl Database {
    /// Opens or creates an SQLite database file.
    ///
    /// Missing parent directories are created. Every pooled connection runs in
    /// WAL mode with a busy timeout so concurrent writers wait instead of failing.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The parent directory cannot be created
    /// - The database file cannot be opened
    /// - Connection pool cannot be initialized
    pub fn open(db_path: &Path) -> AppResult<Self> {
        debug!("Opening database at: {:?}", db_path);

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let manager = SqliteConnectionManager::file(db_path);
        let pool = Pool::builder()
            .max_size(DB_POOL_MAX_SIZE)
            .connection_customizer(Box::new(ConnectionPragmas { wal: true }))
            .build(manager)
            .map_err(DatabaseError::Pool)?;

        // Test the connection
        let conn = pool.get().map_err(DatabaseError::Pool)?;
        conn.query_row("SELECT 1", [], |row| row.get::<_, i32>(0))
            .map_err(DatabaseError::Sqlite)?;
        drop(conn);

        info!("Database opened successfully");
        Ok(Database { pool })
    }

    /// Opens a private in-memory database.
    ///
    /// Each in-memory SQLite connection is its own database, so the pool is
    /// limited to one connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection pool cannot be initialized.
    pub fn open_in_memory() -> AppResult<Self> {
        let pool = Pool::builder()
            .max_size(1)
            .connection_customizer(Box::new(ConnectionPragmas { wal: false }))
            .build(SqliteConnectionManager::memory())
            .map_err(DatabaseError::Pool)?;

        debug!("In-memory database opened");
        Ok(Database { pool })
    }

    /// Gets a connection from the pool.
    ///
    /// # Errors
    ///
    /// Returns an error if no connection is available or the pool is exhausted.
    pub fn get_conn(&self) -> AppResult<PooledConnection> {
        self.pool
            .get()
            .map_err(|e| crate::errors::DatabaseError::Pool(e).into())
    }

    /// Initializes the database schema.
    ///
    /// Creates all necessary tables and indexes if they don't exist.
    /// This is idempotent and safe to call multiple times.
    ///
    /// # Errors
    ///
    /// Returns an error if schema creation fails.
    pub fn initialize_schema(&self) -> AppResult<()> {
        let conn = self.get_conn()?;
        schema::create_tables(&conn)?;
        info!("Database schema initialized");
        Ok(())
    }
}

/// Connection customizer applying per-connection pragmas.
#[derive(Debug)]
struct ConnectionPragmas {
    wal: bool,
}

impl r2d2::CustomizeConnection<Connection, rusqlite::Error> for ConnectionPragmas {
    fn on_acquire(&self, conn: &mut Connection) -> Result<(), rusqlite::Error> {
        conn.busy_timeout(Duration::from_millis(DB_BUSY_TIMEOUT_MS))?;
        if self.wal {
            // journal_mode answers with the resulting mode, so it cannot go through execute
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| {
                row.get::<_, String>(0)
            })?;
        }
        Ok(())
    }

    fn on_release(&self, _conn: Connection) {}
}

/// Entry and session store backed by a [`Database`].
#[derive(Clone)]
pub struct SqliteStore {
    db: Database,
    today: TodayFn,
}

impl SqliteStore {
    /// Wraps a database whose schema has been initialized.
    pub fn new(db: Database) -> Self {
        Self::with_today(db, local_today)
    }

    /// Like [`SqliteStore::new`], with the default date for new sessions
    /// supplied by `today`.
    pub fn with_today(db: Database, today: TodayFn) -> Self {
        SqliteStore { db, today }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    fn ensure_session(&self, conn: &Connection, owner: &str) -> AppResult<()> {
        sessions::ensure_session(conn, owner, DEFAULT_DIARY, &format_date((self.today)()))?;
        Ok(())
    }
}

impl EntryStore for SqliteStore {
    fn add(
        &self,
        owner: &str,
        diary: &str,
        date: &str,
        time: Option<&str>,
        content: &str,
    ) -> AppResult<i64> {
        let conn = self.db.get_conn()?;
        entries::add_entry(&conn, owner, diary, date, time, content)
    }

    fn list(&self, owner: &str, diary: &str, date: &str) -> AppResult<Vec<DisplayEntry>> {
        let conn = self.db.get_conn()?;
        entries::list_entries(&conn, owner, diary, date)
    }

    fn delete_by_index(
        &self,
        owner: &str,
        diary: &str,
        date: &str,
        index: i64,
    ) -> AppResult<IndexOutcome> {
        let conn = self.db.get_conn()?;
        entries::delete_entry_by_index(&conn, owner, diary, date, index)
    }

    fn edit_by_index(
        &self,
        owner: &str,
        diary: &str,
        date: &str,
        index: i64,
        new_content: &str,
    ) -> AppResult<IndexOutcome> {
        let conn = self.db.get_conn()?;
        entries::edit_entry_by_index(&conn, owner, diary, date, index, new_content)
    }
}

impl SessionStore for SqliteStore {
    fn get_or_create(&self, owner: &str) -> AppResult<Session> {
        let conn = self.db.get_conn()?;
        sessions::get_or_create_session(&conn, owner, DEFAULT_DIARY, &format_date((self.today)()))
    }

    fn set_diary(&self, owner: &str, diary: &str) -> AppResult<()> {
        let conn = self.db.get_conn()?;
        self.ensure_session(&conn, owner)?;
        sessions::update_session_diary(&conn, owner, diary)
    }

    fn set_date(&self, owner: &str, date: &str) -> AppResult<()> {
        let conn = self.db.get_conn()?;
        self.ensure_session(&conn, owner)?;
        sessions::update_session_date(&conn, owner, date)
    }
}
