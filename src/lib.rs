/*!
# Diarist

Diarist is a personal diary kept over a text-message channel. A user sends short
keyword commands ("add 14:00 meeting", "view", "remove 2") and diarist keeps one
or more named diaries per sender, each holding dated, optionally timed entries.

## Core Features

- Select or create named diaries per sender
- Select the working date (D-M-YYYY), defaulting to today
- Add entries with or without an HH:MM time
- View the entries for the selected diary and date as a numbered list
- Remove or edit entries by their displayed number

## Architecture

- `validate`: Date and time syntax checks
- `store`: Entry and session store traits, display ordering, in-memory store
- `db`: SQLite-backed store with connection pooling
- `interpreter`: Command parsing and the per-message state transition
- `cli`: Command-line transport (stdin lines in, replies out)
- `config`: Configuration loading and validation
- `errors`: Error handling infrastructure

## Usage Example

```rust,no_run
use diarist::db::{Database, SqliteStore};
use diarist::{Config, Interpreter};

fn main() -> diarist::AppResult<()> {
    let config = Config::load()?;
    config.validate()?;

    let db = Database::open(&config.db_path)?;
    db.initialize_schema()?;

    let interpreter = Interpreter::new(SqliteStore::new(db));
    println!("{}", interpreter.handle(&config.sender, "add 09:30 call the bank")?);
    Ok(())
}
```
*/

/// Command-line interface for parsing and handling user arguments
pub mod cli;
/// Configuration loading and management
pub mod config;
/// Application-wide constants
pub mod constants;
/// SQLite persistence
pub mod db;
/// Error types and utilities for error handling
pub mod errors;
/// Command parsing and dispatch
pub mod interpreter;
/// Storage traits and the in-memory store
pub mod store;
/// Date and time validation
pub mod validate;

// Re-export important types for convenience
pub use cli::CliArgs;
pub use config::Config;
pub use errors::{AppError, AppResult};
pub use interpreter::{Command, Interpreter};
