//! Configuration management for the diarist application.
//!
//! This module handles loading and validating configuration settings from environment
//! variables, with sensible defaults. Command-line flags override whatever is loaded
//! here (see `main.rs`).
//!
//! # Environment Variables
//!
//! - `DIARIST_DB`: Path to the SQLite database (defaults to ~/.local/share/diarist/diarist.db),
//!   or `:memory:` for a throwaway in-memory database
//! - `DIARIST_SENDER`: Sender identity for messages read from stdin (defaults to `$USER`)
//! - `DIARIST_LOG_FORMAT`: `text` or `json` (defaults to `text`)
//! - `HOME`: Used for expanding the default database path

use crate::constants::{
    DEFAULT_DB_SUBPATH, DEFAULT_SENDER, ENV_VAR_DIARIST_DB, ENV_VAR_DIARIST_LOG_FORMAT,
    ENV_VAR_DIARIST_SENDER, ENV_VAR_HOME, ENV_VAR_USER, LOG_FORMAT_JSON, LOG_FORMAT_TEXT,
};
use crate::errors::{AppError, AppResult};
use std::env;
use std::fmt;
use std::path::PathBuf;

/// Database path value selecting an in-memory database.
pub const IN_MEMORY_DB: &str = ":memory:";

/// Configuration for the diarist application.
///
/// # Examples
///
/// Creating a configuration manually:
/// ```
/// use diarist::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     db_path: PathBuf::from("/var/lib/diarist/diarist.db"),
///     sender: "whatsapp:+15550001".to_string(),
///     log_format: "json".to_string(),
/// };
/// assert!(config.validate().is_ok());
/// ```
pub struct Config {
    /// Location of the SQLite database, or `:memory:`.
    pub db_path: PathBuf,

    /// Sender identity attached to messages that do not name one.
    ///
    /// Loaded from `DIARIST_SENDER`, then `USER`, then "local".
    pub sender: String,

    /// Log output format, `text` or `json`.
    pub log_format: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("db_path", &"[REDACTED_PATH]")
            .field("sender", &"[REDACTED_SENDER]")
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl Default for Config {
    /// Creates a new Config with default values.
    fn default() -> Self {
        Config {
            db_path: PathBuf::from(""),
            sender: DEFAULT_SENDER.to_string(),
            log_format: LOG_FORMAT_TEXT.to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from environment variables with sensible defaults.
    ///
    /// The database path is expanded with `shellexpand`, so `~` and `$VAR`
    /// references work.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if:
    /// - The database path expansion fails
    /// - The expanded database path is empty
    pub fn load() -> AppResult<Self> {
        let db_path_str = env::var(ENV_VAR_DIARIST_DB).unwrap_or_else(|_| {
            let home = env::var(ENV_VAR_HOME).unwrap_or_else(|_| "".to_string());
            format!("{}/{}", home, DEFAULT_DB_SUBPATH)
        });
        let db_path = Self::expand_db_path(&db_path_str)?;

        let sender = env::var(ENV_VAR_DIARIST_SENDER)
            .or_else(|_| env::var(ENV_VAR_USER))
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SENDER.to_string());

        let log_format =
            env::var(ENV_VAR_DIARIST_LOG_FORMAT).unwrap_or_else(|_| LOG_FORMAT_TEXT.to_string());

        Ok(Config {
            db_path,
            sender,
            log_format,
        })
    }

    /// Expands `~` and environment variables in a database path.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if expansion fails or yields an empty path.
    pub fn expand_db_path(raw: &str) -> AppResult<PathBuf> {
        if raw == IN_MEMORY_DB {
            return Ok(PathBuf::from(IN_MEMORY_DB));
        }

        let expanded = shellexpand::full(raw)
            .map_err(|e| AppError::Config(format!("Failed to expand path: {}", e)))?;
        let db_path = PathBuf::from(expanded.into_owned());

        if db_path.as_os_str().is_empty() {
            return Err(AppError::Config("Database path is empty".to_string()));
        }
        Ok(db_path)
    }

    /// True when the configuration asks for a throwaway in-memory database.
    pub fn is_in_memory(&self) -> bool {
        self.db_path.as_os_str() == IN_MEMORY_DB
    }

    /// Validates that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` with one of the following messages:
    /// - "Database path is empty"
    /// - "Database path must be absolute"
    /// - "Sender identity is empty"
    /// - "Unknown log format" if the format is neither `text` nor `json`
    pub fn validate(&self) -> AppResult<()> {
        if self.db_path.as_os_str().is_empty() {
            return Err(AppError::Config("Database path is empty".to_string()));
        }

        if !self.is_in_memory() && !self.db_path.is_absolute() {
            return Err(AppError::Config(
                "Database path must be absolute".to_string(),
            ));
        }

        if self.sender.trim().is_empty() {
            return Err(AppError::Config("Sender identity is empty".to_string()));
        }

        if self.log_format != LOG_FORMAT_TEXT && self.log_format != LOG_FORMAT_JSON {
            return Err(AppError::Config(format!(
                "Unknown log format '{}'. Expected '{}' or '{}'",
                self.log_format, LOG_FORMAT_TEXT, LOG_FORMAT_JSON
            )));
        }

        Ok(())
    }
}
