//! CLI argument parsing via clap.

use clap::{Parser, Subcommand};
use panetrack::build_info::LONG_VERSION;
use std::time::Duration;

/// Run commands in tmux panes and report when they finish.
#[derive(Debug, Parser)]
#[command(name = "panetrack", version, long_version = LONG_VERSION)]
pub struct Args {
    /// Path to config file (default: ./panetrack.toml or ~/.config/panetrack/panetrack.toml).
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<String>,

    /// tmux server socket path (passed to tmux as -S).
    #[arg(short = 'S', long = "socket", global = true)]
    pub socket: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run a command in a pane, wait for it, and print the record as JSON.
    Run(RunArgs),
    /// Send keys or literal text to a pane.
    SendKeys(SendKeysArgs),
    /// Print the current text of a pane.
    Capture(CaptureArgs),
}

#[derive(Debug, clap::Args)]
pub struct RunArgs {
    /// Target pane id (for example `%1`).
    #[arg(short = 'p', long = "pane")]
    pub pane: String,

    /// Shell dialect for this pane: bash, zsh, fish, or tcl.
    #[arg(long = "shell")]
    pub shell: Option<String>,

    /// How long to wait for completion (`30`, `500ms`, `2m`).
    #[arg(long = "timeout", value_parser = parse_timeout)]
    pub timeout: Option<Duration>,

    /// Show only the last N output lines.
    #[arg(long = "tail", conflicts_with_all = ["start", "end"])]
    pub tail: Option<usize>,

    /// First output line to show (1-based).
    #[arg(long = "start")]
    pub start: Option<usize>,

    /// Last output line to show (inclusive).
    #[arg(long = "end")]
    pub end: Option<usize>,

    /// Send the command as-is without completion tracking.
    #[arg(long = "raw")]
    pub raw: bool,

    /// Command text; joined with spaces.
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

#[derive(Debug, clap::Args)]
pub struct SendKeysArgs {
    /// Target pane id.
    #[arg(short = 'p', long = "pane")]
    pub pane: String,

    /// Text typed literally instead of key names.
    #[arg(long = "literal", conflicts_with = "keys")]
    pub literal: Option<String>,

    /// Press Enter afterwards.
    #[arg(long = "enter")]
    pub enter: bool,

    /// tmux key names (`C-c`, `Up`, `F5`, ...).
    pub keys: Vec<String>,
}

#[derive(Debug, clap::Args)]
pub struct CaptureArgs {
    /// Target pane id.
    #[arg(short = 'p', long = "pane")]
    pub pane: String,

    /// History lines to include (default: tracker.capture_lines).
    #[arg(short = 'n', long = "lines")]
    pub lines: Option<usize>,
}

fn parse_timeout(input: &str) -> Result<Duration, String> {
    parse_duration_arg(input)
        .ok_or_else(|| format!("invalid duration `{input}` (expected e.g. 30, 500ms, 2m, 1h)"))
}

/// Parse `500ms`, `30s`, `2m`, `1h`, `1d`; a bare number means seconds.
pub(crate) fn parse_duration_arg(input: &str) -> Option<Duration> {
    let s = input.trim().to_ascii_lowercase();
    if s.is_empty() {
        return None;
    }

    let (digits, unit) = if let Some(digits) = s.strip_suffix("ms") {
        (digits, "ms")
    } else if s.ends_with(|c: char| c.is_ascii_alphabetic()) {
        s.split_at(s.len() - 1)
    } else {
        (s.as_str(), "s")
    };
    let value = digits.parse::<u64>().ok()?;
    match unit {
        "ms" => Some(Duration::from_millis(value)),
        "s" => Some(Duration::from_secs(value)),
        "m" => value.checked_mul(60).map(Duration::from_secs),
        "h" => value.checked_mul(3600).map(Duration::from_secs),
        "d" => value.checked_mul(86_400).map(Duration::from_secs),
        _ => None,
    }
}
