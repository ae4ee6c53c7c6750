//! Config data structures.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::tracker::shell::ShellConfig;

use super::defaults::{
    DEFAULT_CAPTURE_LINES, DEFAULT_POLL_INTERVAL_MS, DEFAULT_PREVIEW_LINES,
    DEFAULT_REAP_AFTER_SECS, DEFAULT_TMUX_BINARY, DEFAULT_WAIT_TIMEOUT_SECS, DEFAULT_WINDOW_LINES,
};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Dialect selection: `[shell]` default plus `[shell.panes]` overrides.
    pub shell: ShellConfig,
    pub tmux: TmuxConfig,
    pub tracker: TrackerConfig,
}

/// How the tmux CLI is invoked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TmuxConfig {
    pub binary: String,
    /// Server socket path, passed as `-S` when set.
    pub socket: Option<String>,
}

impl Default for TmuxConfig {
    fn default() -> Self {
        Self {
            binary: DEFAULT_TMUX_BINARY.to_string(),
            socket: None,
        }
    }
}

/// Polling, windowing, and retention knobs for the command tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub capture_lines: usize,
    pub poll_interval_ms: u64,
    pub wait_timeout_secs: u64,
    pub reap_after_secs: u64,
    pub default_window_lines: usize,
    pub preview_lines: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            capture_lines: DEFAULT_CAPTURE_LINES,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            wait_timeout_secs: DEFAULT_WAIT_TIMEOUT_SECS,
            reap_after_secs: DEFAULT_REAP_AFTER_SECS,
            default_window_lines: DEFAULT_WINDOW_LINES,
            preview_lines: DEFAULT_PREVIEW_LINES,
        }
    }
}

impl TrackerConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }

    pub fn reap_after(&self) -> Duration {
        Duration::from_secs(self.reap_after_secs)
    }
}
