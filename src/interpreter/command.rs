//! Classification of an inbound line into a [`Command`].
//!
//! Only the first token is case-normalized. Rules are tried in a fixed order and
//! the first match wins; a line that matches none becomes [`Command::Unknown`].

use crate::constants::{
    CMD_ADD, CMD_CREATE, CMD_EDIT, CMD_HELP, CMD_REMOVE, CMD_SELECT, CMD_SHOW, CMD_VIEW,
    KEYWORD_DATE, KEYWORD_DIARY,
};
use crate::validate::validate_time;

/// One parsed user command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// The line had no tokens.
    Empty,
    Help,
    SelectDiary(String),
    /// Same mechanics as `SelectDiary`; an existing diary of that name is simply selected.
    CreateDiary(String),
    /// The raw date token, not yet validated.
    SelectDate(String),
    View,
    /// `content` may be empty when only a time was given.
    Add {
        time: Option<String>,
        content: String,
    },
    /// `None` when the entry number is not an integer.
    Remove(Option<i64>),
    Edit {
        index: Option<i64>,
        content: String,
    },
    Unknown,
}

impl Command {
    /// Parses a raw message line.
    ///
    /// # Examples
    ///
    /// ```
    /// use diarist::interpreter::Command;
    ///
    /// assert_eq!(
    ///     Command::parse("ADD 14:00 meeting with client"),
    ///     Command::Add {
    ///         time: Some("14:00".to_string()),
    ///         content: "meeting with client".to_string(),
    ///     }
    /// );
    /// assert_eq!(Command::parse("remove two"), Command::Remove(None));
    /// assert_eq!(Command::parse("   "), Command::Empty);
    /// ```
    pub fn parse(line: &str) -> Self {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        Self::from_tokens(&tokens)
    }

    /// Classifies an already tokenized line.
    pub fn from_tokens(tokens: &[&str]) -> Self {
        let Some(first) = tokens.first() else {
            return Command::Empty;
        };
        let keyword = first.to_lowercase();
        let second = tokens.get(1).copied();

        match keyword.as_str() {
            CMD_HELP => Command::Help,
            CMD_SELECT if tokens.len() >= 3 && second == Some(KEYWORD_DIARY) => {
                Command::SelectDiary(tokens[2..].join(" "))
            }
            CMD_CREATE if tokens.len() >= 3 && second == Some(KEYWORD_DIARY) => {
                Command::CreateDiary(tokens[2..].join(" "))
            }
            CMD_SELECT if tokens.len() >= 3 && second == Some(KEYWORD_DATE) => {
                Command::SelectDate(tokens[2].to_string())
            }
            CMD_VIEW | CMD_SHOW if tokens.len() == 1 => Command::View,
            CMD_ADD if tokens.len() >= 2 => {
                if validate_time(tokens[1]) {
                    Command::Add {
                        time: Some(tokens[1].to_string()),
                        content: tokens[2..].join(" ").trim().to_string(),
                    }
                } else {
                    Command::Add {
                        time: None,
                        content: tokens[1..].join(" ").trim().to_string(),
                    }
                }
            }
            CMD_REMOVE if tokens.len() == 2 => Command::Remove(parse_entry_number(tokens[1])),
            CMD_EDIT if tokens.len() >= 3 => Command::Edit {
                index: parse_entry_number(tokens[1]),
                content: tokens[2..].join(" ").trim().to_string(),
            },
            _ => Command::Unknown,
        }
    }

    /// Short name used in logs. Never includes user content.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Empty => "empty",
            Command::Help => "help",
            Command::SelectDiary(_) => "select_diary",
            Command::CreateDiary(_) => "create_diary",
            Command::SelectDate(_) => "select_date",
            Command::View => "view",
            Command::Add { .. } => "add",
            Command::Remove(_) => "remove",
            Command::Edit { .. } => "edit",
            Command::Unknown => "unknown",
        }
    }

    /// True for the commands that change the owner's session.
    pub fn mutates_session(&self) -> bool {
        matches!(
            self,
            Command::SelectDiary(_) | Command::CreateDiary(_) | Command::SelectDate(_)
        )
    }
}

/// Parses an entry number.
///
/// Integers beyond the `i64` range saturate, so they reach the store as an
/// out-of-range number rather than a non-number.
fn parse_entry_number(token: &str) -> Option<i64> {
    if let Ok(number) = token.parse::<i64>() {
        return Some(number);
    }
    let (negative, digits) = match token.as_bytes().first() {
        Some(b'-') => (true, &token[1..]),
        Some(b'+') => (false, &token[1..]),
        _ => (false, token),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(if negative { i64::MIN } else { i64::MAX })
}
