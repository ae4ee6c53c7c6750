//! Configuration loading from TOML files and environment variables.
//!
//! Config is loaded in this order of precedence (highest wins):
//! 1. Environment variables (`PANETRACK_SHELL`, `PANETRACK_TMUX_SOCKET`,
//!    `PANETRACK_POLL_INTERVAL_MS`, `PANETRACK_WAIT_TIMEOUT_SECS`)
//! 2. TOML file specified via --config CLI flag
//! 3. ./panetrack.toml in the current directory
//! 4. $XDG_CONFIG_HOME/panetrack/panetrack.toml (or ~/.config/panetrack/panetrack.toml)
//! 5. Built-in defaults

mod defaults;
mod env;
mod loader;
mod sources;
mod types;

pub use defaults::{
    DEFAULT_CAPTURE_LINES, DEFAULT_POLL_INTERVAL_MS, DEFAULT_PREVIEW_LINES,
    DEFAULT_REAP_AFTER_SECS, DEFAULT_TMUX_BINARY, DEFAULT_WAIT_TIMEOUT_SECS, DEFAULT_WINDOW_LINES,
};
pub use loader::load_config;
pub use sources::config_root_dir;
pub use types::{Config, TmuxConfig, TrackerConfig};
