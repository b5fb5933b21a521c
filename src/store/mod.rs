//! Storage abstractions for entries and sessions.
//!
//! The interpreter only talks to these traits, so the same command logic runs
//! against the SQLite-backed [`crate::db::SqliteStore`] in production and the
//! [`memory::MemoryStore`] in tests.
//!
//! # Display order
//!
//! Positional commands ("remove 2", "edit 3 ...") refer to the numbering the
//! user saw in the last listing. That numbering is never persisted: every
//! implementation loads the raw rows for `(owner, diary, date)` and passes them
//! through [`display_order`], the single place the ordering is defined.

pub mod memory;

use crate::errors::AppResult;
use chrono::{Local, NaiveDate};
use std::fmt;
use std::sync::Arc;

/// Supplies the calendar date given to a session on first contact.
pub type TodayFn = fn() -> NaiveDate;

/// The caller's local calendar date.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// A stored journal entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub id: i64,
    pub owner: String,
    pub diary_name: String,
    pub date: String,
    pub time: Option<String>,
    pub content: String,
}

/// One line of a diary listing, in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayEntry {
    pub id: i64,
    pub time: Option<String>,
    pub content: String,
}

impl From<Entry> for DisplayEntry {
    fn from(entry: Entry) -> Self {
        DisplayEntry {
            id: entry.id,
            time: entry.time,
            content: entry.content,
        }
    }
}

/// The diary and date an owner is currently working with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub owner: String,
    pub current_diary: String,
    pub current_date: String,
}

/// Result of an operation that addresses an entry by its displayed number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexOutcome {
    Deleted,
    Updated,
    /// The number was zero, negative or past the end of the current listing.
    /// Nothing was changed.
    InvalidIndex,
}

impl IndexOutcome {
    pub fn is_success(self) -> bool {
        !matches!(self, IndexOutcome::InvalidIndex)
    }

    /// Status line relayed verbatim to the user.
    pub fn message(self) -> &'static str {
        match self {
            IndexOutcome::Deleted => "Entry deleted successfully.",
            IndexOutcome::Updated => "Entry updated successfully.",
            IndexOutcome::InvalidIndex => "Invalid entry number.",
        }
    }
}

impl fmt::Display for IndexOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Orders raw entries for display.
///
/// Timed entries come first, ascending by `HH:MM`; untimed entries follow in
/// insertion order. Ties between equal times are broken by insertion order as
/// well, so the result is fully deterministic.
///
/// # Examples
///
/// ```
/// use diarist::store::{display_order, Entry};
///
/// let entry = |id: i64, time: Option<&str>| Entry {
///     id,
///     owner: "A".to_string(),
///     diary_name: "default".to_string(),
///     date: "15-3-2025".to_string(),
///     time: time.map(str::to_string),
///     content: format!("entry {}", id),
/// };
///
/// let ordered = display_order(vec![entry(1, Some("10:00")), entry(2, None), entry(3, Some("09:00"))]);
/// let ids: Vec<i64> = ordered.iter().map(|e| e.id).collect();
/// assert_eq!(ids, vec![3, 1, 2]);
/// ```
pub fn display_order(mut entries: Vec<Entry>) -> Vec<DisplayEntry> {
    entries.sort_by(|a, b| {
        a.time
            .is_none()
            .cmp(&b.time.is_none())
            .then_with(|| a.time.cmp(&b.time))
            .then_with(|| a.id.cmp(&b.id))
    });
    entries.into_iter().map(DisplayEntry::from).collect()
}

/// Resolves a 1-based displayed number against a listing.
///
/// Returns `None` for 0, negative numbers and numbers past the end.
pub fn resolve_index(listing: &[DisplayEntry], index: i64) -> Option<&DisplayEntry> {
    if index < 1 {
        return None;
    }
    let position = usize::try_from(index - 1).ok()?;
    listing.get(position)
}

/// Durable, owner-scoped journal entries.
pub trait EntryStore: Send + Sync {
    /// Inserts a new entry and returns its surrogate id.
    fn add(
        &self,
        owner: &str,
        diary: &str,
        date: &str,
        time: Option<&str>,
        content: &str,
    ) -> AppResult<i64>;

    /// Returns the entries for `(owner, diary, date)` in display order.
    fn list(&self, owner: &str, diary: &str, date: &str) -> AppResult<Vec<DisplayEntry>>;

    /// Deletes the entry shown at `index` in a fresh listing.
    fn delete_by_index(
        &self,
        owner: &str,
        diary: &str,
        date: &str,
        index: i64,
    ) -> AppResult<IndexOutcome>;

    /// Replaces the content of the entry shown at `index` in a fresh listing.
    /// The entry keeps its id, date and time.
    fn edit_by_index(
        &self,
        owner: &str,
        diary: &str,
        date: &str,
        index: i64,
        new_content: &str,
    ) -> AppResult<IndexOutcome>;
}

/// Per-owner selected diary and date.
pub trait SessionStore: Send + Sync {
    /// Returns the owner's session, creating the default one on first contact.
    fn get_or_create(&self, owner: &str) -> AppResult<Session>;

    /// Changes only the selected diary.
    fn set_diary(&self, owner: &str, diary: &str) -> AppResult<()>;

    /// Changes only the selected date. Callers validate `date` first.
    fn set_date(&self, owner: &str, date: &str) -> AppResult<()>;
}

impl<T: EntryStore + ?Sized> EntryStore for Arc<T> {
    fn add(
        &self,
        owner: &str,
        diary: &str,
        date: &str,
        time: Option<&str>,
        content: &str,
    ) -> AppResult<i64> {
        (**self).add(owner, diary, date, time, content)
    }

    fn list(&self, owner: &str, diary: &str, date: &str) -> AppResult<Vec<DisplayEntry>> {
        (**self).list(owner, diary, date)
    }

    fn delete_by_index(
        &self,
        owner: &str,
        diary: &str,
        date: &str,
        index: i64,
    ) -> AppResult<IndexOutcome> {
        (**self).delete_by_index(owner, diary, date, index)
    }

    fn edit_by_index(
        &self,
        owner: &str,
        diary: &str,
        date: &str,
        index: i64,
        new_content: &str,
    ) -> AppResult<IndexOutcome> {
        (**self).edit_by_index(owner, diary, date, index, new_content)
    }
}

impl<T: SessionStore + ?Sized> SessionStore for Arc<T> {
    fn get_or_create(&self, owner: &str) -> AppResult<Session> {
        (**self).get_or_create(owner)
    }

    fn set_diary(&self, owner: &str, diary: &str) -> AppResult<()> {
        (**self).set_diary(owner, diary)
    }

    fn set_date(&self, owner: &str, date: &str) -> AppResult<()> {
        (**self).set_date(owner, date)
    }
}
