//! Per-owner session rows.
//!
//! Setters update a single column so that a concurrent `set_diary` and
//! `set_date` for the same owner never overwrite each other's field.

use crate::errors::{AppResult, DatabaseError};
use crate::store::Session;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

/// Inserts the default session for `owner` if none exists.
///
/// Returns true if a row was created.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn ensure_session(
    conn: &Connection,
    owner: &str,
    default_diary: &str,
    default_date: &str,
) -> AppResult<bool> {
    let inserted = conn
        .execute(
            r#"
            INSERT OR IGNORE INTO sessions (owner, diary_name, selected_date)
            VALUES (?1, ?2, ?3)
            "#,
            params![owner, default_diary, default_date],
        )
        .map_err(DatabaseError::Sqlite)?;

    if inserted > 0 {
        debug!("Created default session");
    }
    Ok(inserted > 0)
}

/// Returns the session for `owner`, or `None` if the owner has never been seen.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn get_session(conn: &Connection, owner: &str) -> AppResult<Option<Session>> {
    let session = conn
        .query_row(
            "SELECT owner, diary_name, selected_date FROM sessions WHERE owner = ?1",
            params![owner],
            |row| {
                Ok(Session {
                    owner: row.get(0)?,
                    current_diary: row.get(1)?,
                    current_date: row.get(2)?,
                })
            },
        )
        .optional()
        .map_err(DatabaseError::Sqlite)?;

    Ok(session)
}

/// Returns the session for `owner`, creating it with the given defaults first.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn get_or_create_session(
    conn: &Connection,
    owner: &str,
    default_diary: &str,
    default_date: &str,
) -> AppResult<Session> {
    ensure_session(conn, owner, default_diary, default_date)?;
    get_session(conn, owner)?.ok_or_else(|| {
        DatabaseError::Custom(format!("Session for owner vanished after insert: {}", owner)).into()
    })
}

/// Sets the selected diary, leaving the selected date untouched.
///
/// The session row must already exist.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn update_session_diary(conn: &Connection, owner: &str, diary: &str) -> AppResult<()> {
    conn.execute(
        "UPDATE sessions SET diary_name = ?1 WHERE owner = ?2",
        params![diary, owner],
    )
    .map_err(DatabaseError::Sqlite)?;
    Ok(())
}

/// Sets the selected date, leaving the selected diary untouched.
///
/// The session row must already exist.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn update_session_date(conn: &Connection, owner: &str, date: &str) -> AppResult<()> {
    conn.execute(
        "UPDATE sessions SET selected_date = ?1 WHERE owner = ?2",
        params![date, owner],
    )
    .map_err(DatabaseError::Sqlite)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_test_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::schema::create_tables(&conn).unwrap();
        conn
    }

    fn session_rows(conn: &Connection) -> i64 {
        conn.query_row("SELECT COUNT(*) FROM sessions", [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn test_get_session_unknown_owner() {
        let conn = setup_test_db();
        assert!(get_session(&conn, "nobody").unwrap().is_none());
    }

    #[test]
    fn test_get_session_propagates_sql_errors() {
        let conn = setup_test_db();
        conn.execute_batch("DROP TABLE sessions").unwrap();

        // Only a missing row maps to None; anything else is an error
        assert!(get_session(&conn, "nobody").is_err());
    }

    #[test]
    fn test_get_or_create_is_idempotent() {
        let conn = setup_test_db();

        let first = get_or_create_session(&conn, "A", "default", "15-3-2025").unwrap();
        let second = get_or_create_session(&conn, "A", "default", "16-3-2025").unwrap();

        assert_eq!(first, second);
        assert_eq!(first.current_date, "15-3-2025");
        assert_eq!(session_rows(&conn), 1);
    }

    #[test]
    fn test_ensure_session_reports_creation() {
        let conn = setup_test_db();
        assert!(ensure_session(&conn, "A", "default", "1-1-2025").unwrap());
        assert!(!ensure_session(&conn, "A", "default", "1-1-2025").unwrap());
    }

    #[test]
    fn test_updates_touch_one_column() {
        let conn = setup_test_db();
        get_or_create_session(&conn, "A", "default", "15-3-2025").unwrap();

        update_session_diary(&conn, "A", "work log").unwrap();
        let session = get_session(&conn, "A").unwrap().unwrap();
        assert_eq!(session.current_diary, "work log");
        assert_eq!(session.current_date, "15-3-2025");

        update_session_date(&conn, "A", "1-4-2025").unwrap();
        let session = get_session(&conn, "A").unwrap().unwrap();
        assert_eq!(session.current_diary, "work log");
        assert_eq!(session.current_date, "1-4-2025");
    }

    #[test]
    fn test_sessions_are_per_owner() {
        let conn = setup_test_db();
        get_or_create_session(&conn, "A", "default", "15-3-2025").unwrap();
        get_or_create_session(&conn, "B", "default", "15-3-2025").unwrap();

        update_session_diary(&conn, "A", "travel").unwrap();

        assert_eq!(
            get_session(&conn, "B").unwrap().unwrap().current_diary,
            "default"
        );
        assert_eq!(session_rows(&conn), 2);
    }
}
