//! Database schema definitions and initialization.
//!
//! Two independent tables: `entries` holds journal lines, `sessions` holds each
//! owner's selected diary and date. There is deliberately no foreign key between
//! them; entries for a diary or date nobody has selected stay queryable.

use crate::errors::{AppResult, DatabaseError};
use rusqlite::Connection;
use tracing::{debug, info};

/// Current schema version.
///
/// Increment this whenever schema changes are made to support future migrations.
pub const SCHEMA_VERSION: i32 = 1;

/// Creates all database tables and indexes.
///
/// This function is idempotent - it uses `CREATE TABLE IF NOT EXISTS`
/// so it's safe to call multiple times.
///
/// # Tables
///
/// - `entries`: Journal lines keyed by owner, diary name and date
/// - `sessions`: One row per owner with the selected diary and date
/// - `schema_version`: Version tracking for future migrations
///
/// # Errors
///
/// Returns an error if any DDL statement fails.
pub fn create_tables(conn: &Connection) -> AppResult<()> {
    debug!("Creating database tables");

    // Entries table. `entry_time` is NULL for untimed entries; the AUTOINCREMENT
    // id doubles as insertion order for the display ordering.
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            owner TEXT NOT NULL,
            diary_name TEXT NOT NULL,
            entry_date TEXT NOT NULL,
            entry_time TEXT,
            content TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_entries_listing
            ON entries(owner, diary_name, entry_date);
        "#,
    )
    .map_err(DatabaseError::Sqlite)?;

    // Sessions table. `current_date` is an SQLite keyword, hence `selected_date`.
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS sessions (
            owner TEXT PRIMARY KEY,
            diary_name TEXT NOT NULL,
            selected_date TEXT NOT NULL
        );
        "#,
    )
    .map_err(DatabaseError::Sqlite)?;

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
        );
        "#,
    )
    .map_err(DatabaseError::Sqlite)?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [SCHEMA_VERSION],
    )
    .map_err(DatabaseError::Sqlite)?;

    info!("Database tables created successfully");
    Ok(())
}

/// Returns the highest schema version recorded in the database.
///
/// # Errors
///
/// Returns an error if the `schema_version` table is missing or unreadable.
pub fn current_version(conn: &Connection) -> AppResult<i32> {
    let version: i32 = conn
        .query_row("SELECT MAX(version) FROM schema_version", [], |row| {
            row.get(0)
        })
        .map_err(DatabaseError::Sqlite)?;
    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_exists(conn: &Connection, name: &str) -> bool {
        conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [name],
            |row| row.get::<_, i64>(0),
        )
        .unwrap()
            == 1
    }

    #[test]
    fn test_create_tables() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();

        assert!(table_exists(&conn, "entries"));
        assert!(table_exists(&conn, "sessions"));
        assert!(table_exists(&conn, "schema_version"));
    }

    #[test]
    fn test_create_tables_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        create_tables(&conn).unwrap();

        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn test_schema_version_recorded() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();

        assert_eq!(current_version(&conn).unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_listing_index_exists() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'index' AND name = 'idx_entries_listing'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }
}
