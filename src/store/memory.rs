//! In-memory entry and session store.
//!
//! Used by tests and by `diarist --db :memory:`. Each trait method takes the
//! lock once, so every operation is atomic with respect to other threads.

use super::{
    display_order, local_today, resolve_index, DisplayEntry, Entry, EntryStore, IndexOutcome,
    Session, SessionStore, TodayFn,
};
use crate::constants::DEFAULT_DIARY;
use crate::errors::{AppResult, DatabaseError};
use crate::validate::format_date;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

#[derive(Debug, Default)]
struct Tables {
    next_id: i64,
    entries: Vec<Entry>,
    sessions: HashMap<String, Session>,
}

impl Tables {
    fn listing(&self, owner: &str, diary: &str, date: &str) -> Vec<DisplayEntry> {
        let rows = self
            .entries
            .iter()
            .filter(|e| e.owner == owner && e.diary_name == diary && e.date == date)
            .cloned()
            .collect();
        display_order(rows)
    }

    fn session_mut(&mut self, owner: &str, today: TodayFn) -> &mut Session {
        self.sessions
            .entry(owner.to_string())
            .or_insert_with(|| Session {
                owner: owner.to_string(),
                current_diary: DEFAULT_DIARY.to_string(),
                current_date: format_date(today()),
            })
    }
}

/// A store that keeps everything in process memory.
///
/// # Examples
///
/// ```
/// use diarist::store::memory::MemoryStore;
/// use diarist::store::EntryStore;
///
/// let store = MemoryStore::new();
/// store.add("A", "default", "15-3-2025", Some("14:00"), "meeting")?;
/// assert_eq!(store.list("A", "default", "15-3-2025")?.len(), 1);
/// # Ok::<(), diarist::AppError>(())
/// ```
#[derive(Debug)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    today: TodayFn,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_today(local_today)
    }

    /// Creates a store whose new sessions default to the date returned by `today`.
    pub fn with_today(today: TodayFn) -> Self {
        MemoryStore {
            tables: Mutex::new(Tables::default()),
            today,
        }
    }

    /// Number of session records, for asserting lazy creation in tests.
    pub fn session_count(&self) -> AppResult<usize> {
        Ok(self.lock()?.sessions.len())
    }

    fn lock(&self) -> AppResult<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| DatabaseError::Custom("in-memory store lock poisoned".to_string()).into())
    }
}

impl EntryStore for MemoryStore {
    fn add(
        &self,
        owner: &str,
        diary: &str,
        date: &str,
        time: Option<&str>,
        content: &str,
    ) -> AppResult<i64> {
        let mut tables = self.lock()?;
        tables.next_id += 1;
        let id = tables.next_id;
        tables.entries.push(Entry {
            id,
            owner: owner.to_string(),
            diary_name: diary.to_string(),
            date: date.to_string(),
            time: time.map(str::to_string),
            content: content.to_string(),
        });
        debug!("Added in-memory entry {}", id);
        Ok(id)
    }

    fn list(&self, owner: &str, diary: &str, date: &str) -> AppResult<Vec<DisplayEntry>> {
        Ok(self.lock()?.listing(owner, diary, date))
    }

    fn delete_by_index(
        &self,
        owner: &str,
        diary: &str,
        date: &str,
        index: i64,
    ) -> AppResult<IndexOutcome> {
        let mut tables = self.lock()?;
        let listing = tables.listing(owner, diary, date);
        let Some(target) = resolve_index(&listing, index) else {
            return Ok(IndexOutcome::InvalidIndex);
        };
        let id = target.id;
        tables.entries.retain(|e| e.id != id);
        Ok(IndexOutcome::Deleted)
    }

    fn edit_by_index(
        &self,
        owner: &str,
        diary: &str,
        date: &str,
        index: i64,
        new_content: &str,
    ) -> AppResult<IndexOutcome> {
        let mut tables = self.lock()?;
        let listing = tables.listing(owner, diary, date);
        let Some(target) = resolve_index(&listing, index) else {
            return Ok(IndexOutcome::InvalidIndex);
        };
        let id = target.id;
        if let Some(entry) = tables.entries.iter_mut().find(|e| e.id == id) {
            entry.content = new_content.to_string();
        }
        Ok(IndexOutcome::Updated)
    }
}

impl SessionStore for MemoryStore {
    fn get_or_create(&self, owner: &str) -> AppResult<Session> {
        let today = self.today;
        Ok(self.lock()?.session_mut(owner, today).clone())
    }

    fn set_diary(&self, owner: &str, diary: &str) -> AppResult<()> {
        let today = self.today;
        self.lock()?.session_mut(owner, today).current_diary = diary.to_string();
        Ok(())
    }

    fn set_date(&self, owner: &str, date: &str) -> AppResult<()> {
        let today = self.today;
        self.lock()?.session_mut(owner, today).current_date = date.to_string();
        Ok(())
    }
}
