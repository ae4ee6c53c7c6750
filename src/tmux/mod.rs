//! tmux-backed collaborators.
//!
//! [`TmuxClient`] implements [`PaneContentSource`] and [`KeyInjector`] by
//! spawning the tmux CLI once per call. It holds no pane state of its own.

mod capture;
pub mod keys;
mod process;
mod send_keys;

use async_trait::async_trait;
use tracing::trace;

use crate::config::TmuxConfig;
use crate::contracts::{CaptureWindow, KeyInjector, PaneContentSource};
use crate::error::TrackerError;

use capture::{capture_pane_args, parse_capture_output};
use process::{ensure_success, run_process, ExecOutput};
use send_keys::{send_enter_args, send_literal_args, send_named_keys_args};

pub use keys::{is_named_key, type_keys, NAMED_KEYS};

/// Talks to one tmux server through its CLI.
#[derive(Debug, Clone)]
pub struct TmuxClient {
    binary: String,
    socket: Option<String>,
}

impl TmuxClient {
    pub fn new(binary: impl Into<String>, socket: Option<String>) -> Self {
        Self {
            binary: binary.into(),
            socket,
        }
    }

    pub fn from_config(config: &TmuxConfig) -> Self {
        Self::new(config.binary.clone(), config.socket.clone())
    }

    /// Full argument list including the server socket selection.
    fn args(&self, subcommand: Vec<String>) -> Vec<String> {
        match self.socket.as_deref() {
            Some(socket) => {
                let mut args = vec!["-S".to_string(), socket.to_string()];
                args.extend(subcommand);
                args
            }
            None => subcommand,
        }
    }

    async fn run(&self, subcommand: Vec<String>, context: &str) -> Result<ExecOutput, TrackerError> {
        let args = self.args(subcommand);
        trace!(binary = %self.binary, ?args, "tmux call");
        let output = run_process(&self.binary, &args).await?;
        ensure_success(output, context)
    }
}

#[async_trait]
impl PaneContentSource for TmuxClient {
    async fn capture(
        &self,
        pane_id: &str,
        window: CaptureWindow,
    ) -> Result<Vec<String>, TrackerError> {
        let output = self
            .run(
                capture_pane_args(pane_id, window),
                &format!("failed to capture tmux pane {pane_id}"),
            )
            .await?;
        Ok(parse_capture_output(&output.stdout))
    }
}

#[async_trait]
impl KeyInjector for TmuxClient {
    async fn send_text(
        &self,
        pane_id: &str,
        text: &str,
        press_enter: bool,
    ) -> Result<(), TrackerError> {
        if !text.is_empty() {
            self.run(
                send_literal_args(pane_id, text),
                &format!("failed to send keys to tmux pane {pane_id}"),
            )
            .await?;
        }
        if press_enter {
            self.run(
                send_enter_args(pane_id),
                &format!("failed to send Enter to tmux pane {pane_id}"),
            )
            .await?;
        }
        Ok(())
    }

    async fn send_keys(&self, pane_id: &str, keys: &[String]) -> Result<(), TrackerError> {
        if keys.is_empty() {
            return Ok(());
        }
        self.run(
            send_named_keys_args(pane_id, keys),
            &format!("failed to send key sequence to tmux pane {pane_id}"),
        )
        .await?;
        Ok(())
    }
}
