//! Outbound reply text.

use crate::store::DisplayEntry;

pub const NO_INPUT: &str = "No input received. Please send a command. Type 'help' for more information.";
pub const INVALID_DATE: &str = "Invalid date. Please use the format D-M-YYYY, for example: 15-3-2025.";
pub const CONTENT_REQUIRED: &str = "Please enter content for the entry.";
pub const INVALID_ENTRY_NUMBER: &str = "Please enter a valid entry number.";
pub const UNRECOGNIZED: &str =
    "Unrecognized command. Type 'help' for information on the available commands.";

pub const HELP: &str = "\
How to use the diary bot:

1. Choosing a diary:
   - Switch to another diary: 'select diary work'
   - Create a new diary: 'create diary studies'

2. Choosing a date:
   - For example: 'select date 15-3-2025' (day-month-year)
   - The default is today's date

3. Adding an entry:
   - With a time: 'add 14:00 meeting with a client'
   - Without a time: 'add go shopping'
   (the entry is added to the selected date, or to today if no other date was selected)

4. Viewing entries:
   - Send 'view' or 'show' to see the entries for the selected date

5. Removing an entry:
   - For example: 'remove 2' where 2 is the entry number as displayed

6. Editing an entry:
   - For example: 'edit 3 update: the meeting was postponed'

Important formats:
   - Date: D-M-YYYY (for example: 15-3-2025)
   - Time: HH:MM (24 hours, for example: 09:30)

Good luck!";

pub fn diary_selected(diary: &str, date: &str) -> String {
    format!(
        "Diary changed. You are now working with the diary: {}\nCurrent date: {}",
        diary, date
    )
}

pub fn diary_created(diary: &str, date: &str) -> String {
    format!(
        "New diary created. You are now working with the diary: {}\nCurrent date: {}",
        diary, date
    )
}

pub fn date_selected(date: &str, diary: &str) -> String {
    format!("Date selected: {}\nDiary: {}", date, diary)
}

pub fn entry_added(date: &str) -> String {
    format!("Entry added successfully for {}.", date)
}

pub fn no_entries(date: &str) -> String {
    format!("There are no entries in your diary for {}.", date)
}

/// Renders a numbered listing. Numbers are the displayed indices that
/// `remove` and `edit` accept.
pub fn listing(diary: &str, date: &str, entries: &[DisplayEntry]) -> String {
    let mut text = format!("Diary entries ({}) for {}:", diary, date);
    for (position, entry) in entries.iter().enumerate() {
        text.push('\n');
        text.push_str(&listing_line(position + 1, entry));
    }
    text
}

fn listing_line(number: usize, entry: &DisplayEntry) -> String {
    match &entry.time {
        Some(time) => format!("{}. {} - {}", number, time, entry.content),
        None => format!("{}. - {}", number, entry.content),
    }
}
