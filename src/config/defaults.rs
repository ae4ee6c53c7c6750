//! Default configuration constants.
//!
//! Shared by the config types and the tracker so the same literals are not
//! duplicated across modules.

/// tmux executable looked up on `PATH`.
pub const DEFAULT_TMUX_BINARY: &str = "tmux";
/// History lines captured per status check.
pub const DEFAULT_CAPTURE_LINES: usize = 2000;
/// Delay between status checks while waiting.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 250;
/// Upper bound on a blocking wait.
pub const DEFAULT_WAIT_TIMEOUT_SECS: u64 = 60;
/// Age after which finished records are reaped (30 minutes).
pub const DEFAULT_REAP_AFTER_SECS: u64 = 30 * 60;
/// Trailing output lines exposed when no slice is requested.
pub const DEFAULT_WINDOW_LINES: usize = crate::tracker::slicer::DEFAULT_WINDOW_LINES;
/// Lines of pane text kept as the preview of a pending command.
pub const DEFAULT_PREVIEW_LINES: usize = 10;

/// Config file name looked up locally and under the config root.
pub(super) const CONFIG_FILE_NAME: &str = "panetrack.toml";
/// Directory under the config root holding [`CONFIG_FILE_NAME`].
pub(super) const CONFIG_DIR_NAME: &str = "panetrack";
