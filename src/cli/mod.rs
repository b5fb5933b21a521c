use clap::Parser;

/// A text-command diary kept over a message channel
///
/// Each stdin line is one inbound message. A line of the form
/// `<sender><TAB><text>` is attributed to that sender instead of `--from`.
#[derive(Parser, Debug)]
#[clap(name = "diarist", about = "A text-command diary kept over a message channel")]
#[clap(author, version, long_about = None)]
pub struct CliArgs {
    /// Sender identity for messages that do not name one (overrides DIARIST_SENDER)
    #[clap(short = 'f', long = "from")]
    pub from: Option<String>,

    /// Path to the SQLite database, or ":memory:" (overrides DIARIST_DB)
    #[clap(long)]
    pub db: Option<String>,

    /// Log output format: "text" or "json" (overrides DIARIST_LOG_FORMAT)
    #[clap(long = "log-format")]
    pub log_format: Option<String>,

    /// Print verbose output
    #[clap(short = 'v', long)]
    pub verbose: bool,

    /// Handle these words as a single message and exit instead of reading stdin
    #[clap(trailing_var_arg = true)]
    pub message: Vec<String>,
}

impl CliArgs {
    /// Parse command-line arguments
    pub fn parse() -> Self {
        CliArgs::parse_from(std::env::args())
    }

    /// The one-shot message, if any words were given.
    pub fn one_shot_message(&self) -> Option<String> {
        if self.message.is_empty() {
            None
        } else {
            Some(self.message.join(" "))
        }
    }
}

/// Splits an stdin line into an optional sender and the message text.
///
/// # Examples
///
/// ```
/// use diarist::cli::split_sender;
///
/// assert_eq!(split_sender("whatsapp:+1555\tadd milk"), (Some("whatsapp:+1555"), "add milk"));
/// assert_eq!(split_sender("add milk"), (None, "add milk"));
/// ```
pub fn split_sender(line: &str) -> (Option<&str>, &str) {
    match line.split_once('\t') {
        Some((sender, text)) if !sender.trim().is_empty() => (Some(sender.trim()), text),
        _ => (None, line),
    }
}
