//! The command interpreter.
//!
//! Each call to [`Interpreter::handle`] is one complete transition: load the
//! owner's session, classify the line, apply it, return the reply. Nothing is
//! carried between calls except what the stores hold, and there are no
//! multi-message conversations.
//!
//! Calls for the same owner are serialized with a per-owner lock, so a `view`
//! followed by `remove 2` from two devices cannot interleave inside a single
//! command. Different owners never wait on each other.

mod command;
pub mod replies;

pub use command::Command;

use crate::constants::TRACING_SERVICE_NAME;
use crate::errors::AppResult;
use crate::store::{EntryStore, Session, SessionStore};
use crate::validate::validate_date;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, info_span};
use uuid::Uuid;

/// Maps inbound text to replies against injected stores.
///
/// # Examples
///
/// ```
/// use diarist::interpreter::Interpreter;
/// use diarist::store::memory::MemoryStore;
///
/// let interpreter = Interpreter::new(MemoryStore::new());
/// let reply = interpreter.handle("whatsapp:+15550001", "add 14:00 meeting")?;
/// assert!(reply.starts_with("Entry added successfully"));
///
/// let reply = interpreter.handle("whatsapp:+15550001", "view")?;
/// assert!(reply.ends_with("1. 14:00 - meeting"));
/// # Ok::<(), diarist::AppError>(())
/// ```
pub struct Interpreter<S> {
    store: S,
    owner_locks: OwnerLocks,
}

impl<S> Interpreter<S>
where
    S: EntryStore + SessionStore,
{
    pub fn new(store: S) -> Self {
        Interpreter {
            store,
            owner_locks: OwnerLocks::default(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Handles one inbound message and returns the reply text.
    ///
    /// User mistakes (bad dates, unknown commands, out-of-range entry numbers)
    /// are answered in the reply.
    ///
    /// # Errors
    ///
    /// Returns an error only when a store operation fails.
    pub fn handle(&self, owner: &str, text: &str) -> AppResult<String> {
        let span = info_span!(
            "inbound_message",
            service = TRACING_SERVICE_NAME,
            message_id = %Uuid::new_v4()
        );
        let _enter = span.enter();

        let command = Command::parse(text);

        let owner_lock = self.owner_locks.get(owner);
        let reply = {
            let _serialized = owner_lock.lock().unwrap_or_else(PoisonError::into_inner);
            self.store
                .get_or_create(owner)
                .and_then(|session| self.dispatch(&session, &command))
        };
        self.owner_locks.release(owner, owner_lock);

        let reply = reply?;
        info!(command = command.name(), "Message handled");
        Ok(reply)
    }

    fn dispatch(&self, session: &Session, command: &Command) -> AppResult<String> {
        let owner = session.owner.as_str();
        let diary = session.current_diary.as_str();
        let date = session.current_date.as_str();

        let reply = match command {
            Command::Empty => {
                debug!("Empty message");
                replies::NO_INPUT.to_string()
            }
            Command::Help => replies::HELP.to_string(),
            Command::SelectDiary(name) => {
                self.store.set_diary(owner, name)?;
                replies::diary_selected(name, date)
            }
            Command::CreateDiary(name) => {
                self.store.set_diary(owner, name)?;
                replies::diary_created(name, date)
            }
            Command::SelectDate(new_date) => {
                if !validate_date(new_date) {
                    debug!("Rejected date selection");
                    return Ok(replies::INVALID_DATE.to_string());
                }
                self.store.set_date(owner, new_date)?;
                replies::date_selected(new_date, diary)
            }
            Command::View => {
                let entries = self.store.list(owner, diary, date)?;
                if entries.is_empty() {
                    replies::no_entries(date)
                } else {
                    replies::listing(diary, date, &entries)
                }
            }
            Command::Add { time, content } => {
                if content.is_empty() {
                    return Ok(replies::CONTENT_REQUIRED.to_string());
                }
                self.store.add(owner, diary, date, time.as_deref(), content)?;
                replies::entry_added(date)
            }
            Command::Remove(index) => match index {
                Some(index) => self
                    .store
                    .delete_by_index(owner, diary, date, *index)?
                    .message()
                    .to_string(),
                None => replies::INVALID_ENTRY_NUMBER.to_string(),
            },
            Command::Edit { index, content } => match index {
                Some(index) => self
                    .store
                    .edit_by_index(owner, diary, date, *index, content)?
                    .message()
                    .to_string(),
                None => replies::INVALID_ENTRY_NUMBER.to_string(),
            },
            Command::Unknown => replies::UNRECOGNIZED.to_string(),
        };
        Ok(reply)
    }
}

/// One mutex per owner with a message in flight.
///
/// An entry lives only while some caller holds its `Arc`; the last caller to
/// release it removes it, so the map is bounded by concurrent owners.
#[derive(Debug, Default)]
struct OwnerLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl OwnerLocks {
    fn get(&self, owner: &str) -> Arc<Mutex<()>> {
        // The guarded values are unit, so a poisoned lock carries no broken state.
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(owner.to_string()).or_default())
    }

    fn release(&self, owner: &str, lock: Arc<Mutex<()>>) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        drop(lock);
        // Only the map's own handle left
        if locks.get(owner).is_some_and(|l| Arc::strong_count(l) == 1) {
            locks.remove(owner);
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
