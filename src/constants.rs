//! Constants used throughout the application.
//!
//! This module contains all constants used in the diarist application, organized
//! into logical groups. Having constants centralized makes them easier to find,
//! modify, and reference consistently.

// CLI Arguments & Defaults
/// Log format identifier for plain text.
pub const LOG_FORMAT_TEXT: &str = "text";
/// Log format identifier for JSON.
pub const LOG_FORMAT_JSON: &str = "json";
/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";
/// Log level used when `--verbose` is passed.
pub const VERBOSE_LOG_LEVEL: &str = "debug";
/// Sender identity used when neither `--from`, `DIARIST_SENDER` nor `USER` is set.
pub const DEFAULT_SENDER: &str = "local";

// Configuration Keys & Environment Variables
/// Environment variable for specifying the database file.
pub const ENV_VAR_DIARIST_DB: &str = "DIARIST_DB";
/// Environment variable for specifying the default sender identity.
pub const ENV_VAR_DIARIST_SENDER: &str = "DIARIST_SENDER";
/// Environment variable for specifying the log output format.
pub const ENV_VAR_DIARIST_LOG_FORMAT: &str = "DIARIST_LOG_FORMAT";
/// Standard environment variable for the current login name.
pub const ENV_VAR_USER: &str = "USER";
/// Standard environment variable for the user's home directory.
pub const ENV_VAR_HOME: &str = "HOME";
/// Default database location, relative to the user's home directory.
pub const DEFAULT_DB_SUBPATH: &str = ".local/share/diarist/diarist.db";

// Storage
/// Maximum number of pooled SQLite connections for a file-backed database.
pub const DB_POOL_MAX_SIZE: u32 = 5;
/// How long a connection waits on a locked database before failing, in milliseconds.
pub const DB_BUSY_TIMEOUT_MS: u64 = 5_000;

// Sessions
/// Diary selected for an owner on first contact.
pub const DEFAULT_DIARY: &str = "default";

// Command Vocabulary
/// Shows the help text.
pub const CMD_HELP: &str = "help";
/// Selects a diary or a date, depending on the second token.
pub const CMD_SELECT: &str = "select";
/// Creates (selects) a diary.
pub const CMD_CREATE: &str = "create";
/// Lists the entries for the selected diary and date.
pub const CMD_VIEW: &str = "view";
/// Synonym for `view`.
pub const CMD_SHOW: &str = "show";
/// Adds an entry.
pub const CMD_ADD: &str = "add";
/// Removes an entry by displayed number.
pub const CMD_REMOVE: &str = "remove";
/// Replaces the content of an entry by displayed number.
pub const CMD_EDIT: &str = "edit";
/// Second token of `select diary` / `create diary`.
pub const KEYWORD_DIARY: &str = "diary";
/// Second token of `select date`.
pub const KEYWORD_DATE: &str = "date";

// Date/Time Logic
/// Separator between day, month and year in the canonical date form.
pub const DATE_SEPARATOR: char = '-';
/// Number of digits required in the year field.
pub const YEAR_DIGITS: usize = 4;
/// Separator between hours and minutes.
pub const TIME_SEPARATOR: u8 = b':';

// Logging Configuration
/// Service name used in tracing spans and structured logs.
pub const TRACING_SERVICE_NAME: &str = "diarist";
