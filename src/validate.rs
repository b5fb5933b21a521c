//! Date and time syntax checks for command arguments.
//!
//! Dates travel through the system in the canonical `D-M-YYYY` form exactly as the
//! user typed them; these functions only decide whether a string is acceptable.
//! Neither function reports *why* a string was rejected.

use crate::constants::{DATE_SEPARATOR, TIME_SEPARATOR, YEAR_DIGITS};
use chrono::{Datelike, NaiveDate};

/// Returns true if `s` is a real calendar date written as day-month-year.
///
/// Fields are parsed numerically, so `"05-03-2025"` and `"5-3-2025"` are both
/// accepted. The year must have exactly four digits.
///
/// # Examples
///
/// ```
/// use diarist::validate::validate_date;
///
/// assert!(validate_date("15-3-2025"));
/// assert!(!validate_date("31-4-2025"));
/// assert!(!validate_date("15-13-2025"));
/// assert!(!validate_date("abc"));
/// ```
pub fn validate_date(s: &str) -> bool {
    parse_date(s).is_some()
}

/// Parses a day-month-year string into a `NaiveDate`.
///
/// Returns `None` on wrong arity, non-numeric fields or an impossible date.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let mut fields = s.split(DATE_SEPARATOR);
    let day = parse_numeric_field(fields.next()?)?;
    let month = parse_numeric_field(fields.next()?)?;
    let year_field = fields.next()?;
    if fields.next().is_some() || year_field.len() != YEAR_DIGITS {
        return None;
    }
    let year = parse_numeric_field(year_field)?;

    NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month, day)
}

fn parse_numeric_field(field: &str) -> Option<u32> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

/// Returns true if `s` is a zero-padded 24-hour `HH:MM` time.
///
/// # Examples
///
/// ```
/// use diarist::validate::validate_time;
///
/// assert!(validate_time("09:30"));
/// assert!(!validate_time("9:30"));
/// assert!(!validate_time("24:00"));
/// ```
pub fn validate_time(s: &str) -> bool {
    let bytes = s.as_bytes();
    if bytes.len() != 5 || bytes[2] != TIME_SEPARATOR {
        return false;
    }
    let digits = [bytes[0], bytes[1], bytes[3], bytes[4]];
    if !digits.iter().all(u8::is_ascii_digit) {
        return false;
    }

    let hours = (digits[0] - b'0') * 10 + (digits[1] - b'0');
    let minutes = (digits[2] - b'0') * 10 + (digits[3] - b'0');
    hours <= 23 && minutes <= 59
}

/// Formats a date in the canonical non-padded day-month-year form.
///
/// ```
/// use chrono::NaiveDate;
/// use diarist::validate::format_date;
///
/// let date = NaiveDate::from_ymd_opt(2025, 3, 5).unwrap();
/// assert_eq!(format_date(date), "5-3-2025");
/// ```
pub fn format_date(date: NaiveDate) -> String {
    format!(
        "{}{sep}{}{sep}{}",
        date.day(),
        date.month(),
        date.year(),
        sep = DATE_SEPARATOR
    )
}
