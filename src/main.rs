/*!
# Diarist - a text-command diary

This file contains the line-oriented transport: it reads inbound messages, hands
each `(sender, text)` pair to the interpreter and writes the reply.

## Usage

```
diarist [OPTIONS] [MESSAGE]...

Options:
  -f, --from <FROM>              Sender identity for messages that do not name one
      --db <DB>                  Path to the SQLite database, or ":memory:"
      --log-format <LOG_FORMAT>  Log output format: "text" or "json"
  -v, --verbose                  Print verbose output
  -h, --help                     Print help information
  -V, --version                  Print version information
```

Without MESSAGE, every stdin line is one message; `<sender><TAB><text>` lines
carry their own sender. Replies go to stdout separated by a blank line, logs go
to stderr.

## Configuration

- `DIARIST_DB`: database path (defaults to ~/.local/share/diarist/diarist.db)
- `DIARIST_SENDER`: default sender identity (defaults to `$USER`)
- `DIARIST_LOG_FORMAT`: `text` or `json`
- `RUST_LOG`: tracing filter directives
*/

use diarist::cli::{split_sender, CliArgs};
use diarist::config::Config;
use diarist::constants::{
    DEFAULT_LOG_LEVEL, LOG_FORMAT_JSON, TRACING_SERVICE_NAME, VERBOSE_LOG_LEVEL,
};
use diarist::db::{Database, SqliteStore};
use diarist::errors::AppResult;
use diarist::Interpreter;
use std::io::{self, BufRead, Write};
use tracing::{debug, error, info};
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::EnvFilter;

/// The main entry point for the diarist application.
///
/// 1. Parses command-line arguments
/// 2. Loads configuration and applies flag overrides
/// 3. Initializes logging
/// 4. Opens the database and builds the interpreter
/// 5. Handles one message, or every stdin line
///
/// # Errors
///
/// Configuration errors, database failures and stdin/stdout I/O errors end the
/// process with a non-zero status. User mistakes inside messages never do.
fn main() -> AppResult<()> {
    let args = CliArgs::parse();

    let mut config = Config::load()?;
    if let Some(from) = &args.from {
        config.sender = from.clone();
    }
    if let Some(db) = &args.db {
        config.db_path = Config::expand_db_path(db)?;
    }
    if let Some(log_format) = &args.log_format {
        config.log_format = log_format.clone();
    }
    config.validate()?;

    init_tracing(&config.log_format, args.verbose);
    info!(service = TRACING_SERVICE_NAME, "Starting diarist");
    debug!("Configuration: {:?}", config);

    run(&config, args.one_shot_message()).map_err(|e| {
        error!("{}", e);
        e
    })
}

fn init_tracing(log_format: &str, verbose: bool) {
    let default_level = if verbose {
        VERBOSE_LOG_LEVEL
    } else {
        DEFAULT_LOG_LEVEL
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(ChronoLocal::rfc_3339())
        .with_writer(io::stderr);

    if log_format == LOG_FORMAT_JSON {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn open_store(config: &Config) -> AppResult<SqliteStore> {
    let db = if config.is_in_memory() {
        Database::open_in_memory()?
    } else {
        Database::open(&config.db_path)?
    };
    db.initialize_schema()?;
    Ok(SqliteStore::new(db))
}

fn run(config: &Config, message: Option<String>) -> AppResult<()> {
    let interpreter = Interpreter::new(open_store(config)?);
    let mut stdout = io::stdout().lock();

    if let Some(text) = message {
        let reply = interpreter.handle(&config.sender, &text)?;
        writeln!(stdout, "{}", reply)?;
        return Ok(());
    }

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let (sender, text) = split_sender(&line);
        let reply = interpreter.handle(sender.unwrap_or(&config.sender), text)?;
        writeln!(stdout, "{}\n", reply)?;
        stdout.flush()?;
    }

    info!("Input closed");
    Ok(())
}
