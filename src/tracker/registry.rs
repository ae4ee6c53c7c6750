//! Authoritative store of command records and their lifecycle.

use regex::RegexBuilder;
use serde::Serialize;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::error::TrackerError;

use super::markers::{scan_markers, MarkerBlock};
use super::shell::ShellKind;
use super::slicer::{slice_output, OutputWindow, SliceOptions};

/// Informational result attached to raw-mode records.
pub const RAW_MODE_NOTICE: &str =
    "status tracking is unavailable for raw-mode input; capture the pane to inspect it";

/// Lifecycle of one execution. `Completed` and `Error` are final.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandStatus {
    Pending,
    Completed,
    Error,
}

impl CommandStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }

    fn from_exit_code(code: i32) -> Self {
        if code == 0 {
            Self::Completed
        } else {
            Self::Error
        }
    }
}

/// One dispatched command and everything known about its outcome.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandRecord {
    pub id: String,
    pub pane_id: String,
    pub command: String,
    pub status: CommandStatus,
    pub shell: ShellKind,
    /// Pairing number; absent for raw-mode input.
    pub seq: Option<u64>,
    pub raw: bool,
    pub exit_code: Option<i32>,
    /// Exposed slice of the output once final.
    pub output: Option<OutputWindow>,
    /// Non-authoritative tail preview (or notice) while pending.
    pub result: Option<String>,
    pub start_marker_lost: bool,
    #[serde(skip)]
    pub created_at: Instant,
    #[serde(skip)]
    output_lines: Option<Vec<String>>,
}

impl CommandRecord {
    /// Record for a sentinel-wrapped command tagged with `seq`.
    pub fn wrapped(
        id: impl Into<String>,
        pane_id: impl Into<String>,
        command: impl Into<String>,
        shell: ShellKind,
        seq: u64,
    ) -> Self {
        Self::new(id.into(), pane_id.into(), command.into(), shell, Some(seq))
    }

    /// Record for raw input that is never resolved.
    pub fn raw(
        id: impl Into<String>,
        pane_id: impl Into<String>,
        command: impl Into<String>,
        shell: ShellKind,
    ) -> Self {
        let mut record = Self::new(id.into(), pane_id.into(), command.into(), shell, None);
        record.result = Some(RAW_MODE_NOTICE.to_string());
        record
    }

    fn new(
        id: String,
        pane_id: String,
        command: String,
        shell: ShellKind,
        seq: Option<u64>,
    ) -> Self {
        Self {
            id,
            pane_id,
            command,
            status: CommandStatus::Pending,
            shell,
            raw: seq.is_none(),
            seq,
            exit_code: None,
            output: None,
            result: None,
            start_marker_lost: false,
            created_at: Instant::now(),
            output_lines: None,
        }
    }

    /// Whether a fresh pane snapshot could move this record forward.
    pub fn needs_snapshot(&self) -> bool {
        self.status == CommandStatus::Pending && self.seq.is_some()
    }

    /// Full cached output, once final.
    pub fn output_lines(&self) -> Option<&[String]> {
        self.output_lines.as_deref()
    }

    /// Exposed output window joined into text.
    pub fn output_text(&self) -> Option<String> {
        self.output.as_ref().map(|window| window.lines.join("\n"))
    }

    fn finalize(&mut self, block: &MarkerBlock, snapshot: &[String]) {
        let range = block.output_range().unwrap_or(0..0);
        let mut lines = snapshot[range].to_vec();
        if lines
            .first()
            .is_some_and(|first| first.trim_end() == self.command.trim())
        {
            lines.remove(0);
        }
        let exit_code = block.exit_code.unwrap_or_default();
        self.exit_code = Some(exit_code);
        self.status = CommandStatus::from_exit_code(exit_code);
        self.start_marker_lost = block.start_inferred;
        self.output_lines = Some(lines);
        self.result = None;
    }

    fn reslice(&mut self, options: &SliceOptions, default_window: usize) {
        if let Some(lines) = self.output_lines.as_deref() {
            self.output = Some(slice_output(
                lines,
                options,
                default_window,
                self.start_marker_lost,
            ));
        }
    }
}

/// Line of cached output matching a grep pattern.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrepMatch {
    /// 1-based line number within the full output.
    pub line_number: usize,
    pub text: String,
}

/// Owns every [`CommandRecord`] of one tracker instance.
#[derive(Debug)]
pub struct CommandRegistry {
    records: HashMap<String, CommandRecord>,
    default_window: usize,
    preview_lines: usize,
}

impl CommandRegistry {
    pub fn new(default_window: usize, preview_lines: usize) -> Self {
        Self {
            records: HashMap::new(),
            default_window,
            preview_lines,
        }
    }

    pub fn insert(&mut self, record: CommandRecord) {
        self.records.insert(record.id.clone(), record);
    }

    pub fn get(&self, id: &str) -> Option<&CommandRecord> {
        self.records.get(id)
    }

    /// Ids of pending records, oldest first.
    pub fn active_ids(&self) -> Vec<String> {
        let mut active: Vec<&CommandRecord> = self
            .records
            .values()
            .filter(|record| record.status == CommandStatus::Pending)
            .collect();
        active.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        active.into_iter().map(|record| record.id.clone()).collect()
    }

    /// Resolve a pending record against `snapshot`, or re-slice a final one.
    ///
    /// Final records never re-resolve; `snapshot` is ignored for them.
    pub fn refresh(
        &mut self,
        id: &str,
        snapshot: Option<&[String]>,
        options: &SliceOptions,
    ) -> Result<&CommandRecord, TrackerError> {
        let default_window = self.default_window;
        let preview_lines = self.preview_lines;
        let record = self
            .records
            .get_mut(id)
            .ok_or_else(|| TrackerError::NotFound(id.to_string()))?;

        if record.status.is_terminal() {
            record.reslice(options, default_window);
            return Ok(record);
        }

        let (Some(seq), Some(snapshot)) = (record.seq, snapshot) else {
            return Ok(record);
        };

        match scan_markers(snapshot).get(&seq) {
            Some(block) if block.is_closed() => {
                record.finalize(block, snapshot);
                record.reslice(options, default_window);
                debug!(
                    id = %record.id,
                    seq,
                    exit_code = ?record.exit_code,
                    start_marker_lost = record.start_marker_lost,
                    "command resolved"
                );
            }
            _ => {
                record.result = Some(tail_preview(snapshot, preview_lines));
            }
        }
        Ok(record)
    }

    /// Attach a note to a pending record without resolving it.
    pub fn note_pending(&mut self, id: &str, note: String) -> Result<&CommandRecord, TrackerError> {
        let record = self
            .records
            .get_mut(id)
            .ok_or_else(|| TrackerError::NotFound(id.to_string()))?;
        if record.status == CommandStatus::Pending {
            record.result = Some(note);
        }
        Ok(record)
    }

    /// Lines of a final record's full output matching `pattern`.
    ///
    /// A malformed pattern yields no matches rather than an error.
    pub fn grep(
        &self,
        id: &str,
        pattern: &str,
        case_insensitive: bool,
    ) -> Result<Vec<GrepMatch>, TrackerError> {
        let record = self
            .records
            .get(id)
            .ok_or_else(|| TrackerError::NotFound(id.to_string()))?;
        let Some(lines) = record.output_lines() else {
            return Err(TrackerError::Pending(id.to_string()));
        };

        let regex = match RegexBuilder::new(pattern)
            .case_insensitive(case_insensitive)
            .build()
        {
            Ok(regex) => regex,
            Err(err) => {
                warn!(id, pattern, error = %err, "ignoring malformed grep pattern");
                return Ok(Vec::new());
            }
        };

        Ok(lines
            .iter()
            .enumerate()
            .filter(|(_, line)| regex.is_match(line))
            .map(|(idx, line)| GrepMatch {
                line_number: idx + 1,
                text: line.clone(),
            })
            .collect())
    }

    /// Drop final records older than `max_age`; pending ones always stay.
    pub fn reap_older_than(&mut self, max_age: Duration) -> usize {
        self.reap_older_than_at(max_age, Instant::now())
    }

    fn reap_older_than_at(&mut self, max_age: Duration, now: Instant) -> usize {
        let before = self.records.len();
        self.records.retain(|_, record| {
            !record.status.is_terminal() || now.saturating_duration_since(record.created_at) <= max_age
        });
        before - self.records.len()
    }
}

fn tail_preview(snapshot: &[String], lines: usize) -> String {
    snapshot[snapshot.len().saturating_sub(lines)..].join("\n")
}
