//! Collaborator contracts consumed by the command tracker.
//!
//! The tracker never talks to tmux directly. It reads pane text through a
//! [`PaneContentSource`] and types into panes through a [`KeyInjector`], which
//! keeps the protocol testable against scripted fakes.

use crate::error::TrackerError;
use async_trait::async_trait;

/// Which part of a pane's history to capture.
///
/// Sources may return more or fewer lines than requested; callers re-slice the
/// returned text rather than trusting the window verbatim.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CaptureWindow {
    /// The last `n` lines of history plus the visible screen.
    LastLines(usize),
    /// Explicit tmux line offsets (negative values reach into history).
    Range { start: i64, end: i64 },
}

/// Returns the current text of a pane.
#[async_trait]
pub trait PaneContentSource: Send + Sync {
    /// Capture pane text as ordered lines, oldest first.
    async fn capture(&self, pane_id: &str, window: CaptureWindow)
        -> Result<Vec<String>, TrackerError>;
}

/// Sends input into a pane as if typed.
#[async_trait]
pub trait KeyInjector: Send + Sync {
    /// Type `text` literally, optionally followed by Enter.
    async fn send_text(
        &self,
        pane_id: &str,
        text: &str,
        press_enter: bool,
    ) -> Result<(), TrackerError>;

    /// Send named tmux keys (for example `Up`, `C-c`, `F5`) without splitting them.
    async fn send_keys(&self, pane_id: &str, keys: &[String]) -> Result<(), TrackerError>;
}
