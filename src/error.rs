//! Unified error types for the tracker and its configuration.

use thiserror::Error;

// ---------------------------------------------------------------------------
// TrackerError
// ---------------------------------------------------------------------------

/// Errors surfaced by command tracking and the tmux collaborators.
///
/// A command that is still running is never an error; callers see it as a
/// record in the `pending` state instead.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// No record exists for the given command id.
    #[error("command not found: {0}")]
    NotFound(String),
    /// The operation needs finalized output but the command is still pending.
    #[error("command {0} is still pending; output is not final yet")]
    Pending(String),
    /// The caller supplied arguments that cannot be acted on.
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),
    /// The multiplexer call failed or exited non-zero.
    #[error("tmux: {0}")]
    Tmux(String),
}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Errors when loading or parsing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("toml: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
