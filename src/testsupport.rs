//! Shared test fixtures for tracker and tmux test modules.
//!
//! [`ScriptedPane`] stands in for tmux: it records every input it is sent and
//! serves captures from an in-memory line buffer per pane.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::contracts::{CaptureWindow, KeyInjector, PaneContentSource};
use crate::error::TrackerError;

/// Produces the lines a pane prints after `text` is typed and Enter pressed.
pub type Responder = Box<dyn Fn(&str, &str) -> Vec<String> + Send + Sync>;

/// One input delivered to a pane.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SentInput {
    Text {
        pane_id: String,
        text: String,
        enter: bool,
    },
    Keys {
        pane_id: String,
        keys: Vec<String>,
    },
}

#[derive(Default)]
struct PaneState {
    lines: HashMap<String, Vec<String>>,
    sent: Vec<SentInput>,
    fail_sends: bool,
    fail_captures: bool,
    captures: usize,
}

/// Recording fake implementing both pane collaborators.
#[derive(Default)]
pub struct ScriptedPane {
    state: Mutex<PaneState>,
    responder: Option<Responder>,
}

impl ScriptedPane {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `responder(pane, text)` to the pane whenever Enter is sent.
    pub fn with_responder(
        responder: impl Fn(&str, &str) -> Vec<String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            state: Mutex::default(),
            responder: Some(Box::new(responder)),
        }
    }

    fn state(&self) -> std::sync::MutexGuard<'_, PaneState> {
        self.state.lock().expect("scripted pane lock poisoned")
    }

    pub fn push_lines<I, S>(&self, pane_id: &str, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state()
            .lines
            .entry(pane_id.to_string())
            .or_default()
            .extend(lines.into_iter().map(Into::into));
    }

    /// Replace the pane buffer, as when history scrolls away.
    pub fn set_lines<I, S>(&self, pane_id: &str, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state().lines.insert(
            pane_id.to_string(),
            lines.into_iter().map(Into::into).collect(),
        );
    }

    pub fn lines(&self, pane_id: &str) -> Vec<String> {
        self.state().lines.get(pane_id).cloned().unwrap_or_default()
    }

    pub fn sent(&self) -> Vec<SentInput> {
        self.state().sent.clone()
    }

    /// Text of every `send_text` call, in order.
    pub fn sent_texts(&self) -> Vec<String> {
        self.state()
            .sent
            .iter()
            .filter_map(|input| match input {
                SentInput::Text { text, .. } => Some(text.clone()),
                SentInput::Keys { .. } => None,
            })
            .collect()
    }

    pub fn fail_sends(&self, fail: bool) {
        self.state().fail_sends = fail;
    }

    pub fn fail_captures(&self, fail: bool) {
        self.state().fail_captures = fail;
    }

    pub fn capture_count(&self) -> usize {
        self.state().captures
    }
}

#[async_trait]
impl PaneContentSource for ScriptedPane {
    async fn capture(
        &self,
        pane_id: &str,
        window: CaptureWindow,
    ) -> Result<Vec<String>, TrackerError> {
        let mut state = self.state();
        if state.fail_captures {
            return Err(TrackerError::Tmux(format!("can't find pane: {pane_id}")));
        }
        state.captures += 1;
        let lines = state.lines.get(pane_id).cloned().unwrap_or_default();
        Ok(match window {
            CaptureWindow::LastLines(n) => lines[lines.len().saturating_sub(n)..].to_vec(),
            CaptureWindow::Range { .. } => lines,
        })
    }
}

#[async_trait]
impl KeyInjector for ScriptedPane {
    async fn send_text(
        &self,
        pane_id: &str,
        text: &str,
        press_enter: bool,
    ) -> Result<(), TrackerError> {
        let output = {
            let mut state = self.state();
            if state.fail_sends {
                return Err(TrackerError::Tmux(format!("can't find pane: {pane_id}")));
            }
            state.sent.push(SentInput::Text {
                pane_id: pane_id.to_string(),
                text: text.to_string(),
                enter: press_enter,
            });
            match (&self.responder, press_enter) {
                (Some(responder), true) => responder(pane_id, text),
                _ => Vec::new(),
            }
        };
        self.push_lines(pane_id, output);
        Ok(())
    }

    async fn send_keys(&self, pane_id: &str, keys: &[String]) -> Result<(), TrackerError> {
        let mut state = self.state();
        if state.fail_sends {
            return Err(TrackerError::Tmux(format!("can't find pane: {pane_id}")));
        }
        state.sent.push(SentInput::Keys {
            pane_id: pane_id.to_string(),
            keys: keys.to_vec(),
        });
        Ok(())
    }
}
