//! Entry CRUD operations.
//!
//! Positional operations re-read the listing through [`display_order`] on the
//! same connection immediately before mutating, then act on the surrogate id.
//! An index is never cached between calls.

use crate::errors::{AppResult, DatabaseError};
use crate::store::{display_order, resolve_index, DisplayEntry, Entry, IndexOutcome};
use rusqlite::{params, Connection};
use tracing::debug;

/// Inserts a new entry and returns its id.
///
/// Duplicates are allowed; there is no uniqueness constraint on content or time.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn add_entry(
    conn: &Connection,
    owner: &str,
    diary: &str,
    date: &str,
    time: Option<&str>,
    content: &str,
) -> AppResult<i64> {
    conn.execute(
        r#"
        INSERT INTO entries (owner, diary_name, entry_date, entry_time, content)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
        params![owner, diary, date, time, content],
    )
    .map_err(DatabaseError::Sqlite)?;

    let entry_id = conn.last_insert_rowid();
    debug!("Entry inserted with id {}", entry_id);
    Ok(entry_id)
}

/// Loads the raw rows for `(owner, diary, date)` in insertion order.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn get_entries(
    conn: &Connection,
    owner: &str,
    diary: &str,
    date: &str,
) -> AppResult<Vec<Entry>> {
    let mut stmt = conn
        .prepare(
            r#"
            SELECT id, owner, diary_name, entry_date, entry_time, content
            FROM entries
            WHERE owner = ?1 AND diary_name = ?2 AND entry_date = ?3
            ORDER BY id
            "#,
        )
        .map_err(DatabaseError::Sqlite)?;

    let rows = stmt
        .query_map(params![owner, diary, date], |row| {
            Ok(Entry {
                id: row.get(0)?,
                owner: row.get(1)?,
                diary_name: row.get(2)?,
                date: row.get(3)?,
                time: row.get(4)?,
                content: row.get(5)?,
            })
        })
        .map_err(DatabaseError::Sqlite)?;

    let entries = rows
        .collect::<Result<Vec<_>, _>>()
        .map_err(DatabaseError::Sqlite)?;
    Ok(entries)
}

/// Returns the entries for `(owner, diary, date)` in display order.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn list_entries(
    conn: &Connection,
    owner: &str,
    diary: &str,
    date: &str,
) -> AppResult<Vec<DisplayEntry>> {
    Ok(display_order(get_entries(conn, owner, diary, date)?))
}

/// Deletes the entry shown at the 1-based `index`.
///
/// Returns [`IndexOutcome::InvalidIndex`] without touching the table if the
/// index does not address a listed entry.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn delete_entry_by_index(
    conn: &Connection,
    owner: &str,
    diary: &str,
    date: &str,
    index: i64,
) -> AppResult<IndexOutcome> {
    let listing = list_entries(conn, owner, diary, date)?;
    let Some(target) = resolve_index(&listing, index) else {
        debug!("Rejected delete of index {} ({} entries)", index, listing.len());
        return Ok(IndexOutcome::InvalidIndex);
    };

    conn.execute(
        "DELETE FROM entries WHERE id = ?1 AND owner = ?2",
        params![target.id, owner],
    )
    .map_err(DatabaseError::Sqlite)?;

    debug!("Deleted entry {}", target.id);
    Ok(IndexOutcome::Deleted)
}

/// Replaces the content of the entry shown at the 1-based `index`.
///
/// Only `content` changes; id, date and time are left as they were.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn edit_entry_by_index(
    conn: &Connection,
    owner: &str,
    diary: &str,
    date: &str,
    index: i64,
    new_content: &str,
) -> AppResult<IndexOutcome> {
    let listing = list_entries(conn, owner, diary, date)?;
    let Some(target) = resolve_index(&listing, index) else {
        debug!("Rejected edit of index {} ({} entries)", index, listing.len());
        return Ok(IndexOutcome::InvalidIndex);
    };

    conn.execute(
        "UPDATE entries SET content = ?1 WHERE id = ?2 AND owner = ?3",
        params![new_content, target.id, owner],
    )
    .map_err(DatabaseError::Sqlite)?;

    debug!("Updated entry {}", target.id);
    Ok(IndexOutcome::Updated)
}
