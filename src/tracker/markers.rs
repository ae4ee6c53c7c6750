//! Sentinel marker scanning over captured pane text.
//!
//! Every status check rebuilds blocks from scratch: the pane buffer is not
//! append-only, old lines fall out of history and content shifts, so there is
//! no incremental state to carry between snapshots.

use std::collections::BTreeMap;

/// Prefix of the line echoed before a wrapped command runs.
pub const START_PREFIX: &str = "TMUX_MCP_START";
/// Prefix of the line echoed after a wrapped command finishes.
pub const END_PREFIX: &str = "TMUX_MCP_DONE";

/// Start/end sentinel positions for one sequence number within a snapshot.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MarkerBlock {
    pub seq: u64,
    /// Index of the start sentinel line, or of the first output line when the
    /// start sentinel was not visible and had to be inferred.
    pub start_line: Option<usize>,
    pub end_line: Option<usize>,
    pub exit_code: Option<i32>,
    /// True when `start_line` was inferred from the previous end sentinel.
    pub start_inferred: bool,
}

impl MarkerBlock {
    fn new(seq: u64) -> Self {
        Self {
            seq,
            start_line: None,
            end_line: None,
            exit_code: None,
            start_inferred: false,
        }
    }

    /// Whether the end sentinel has been seen.
    pub fn is_closed(&self) -> bool {
        self.end_line.is_some()
    }

    /// Index range of the command's raw output lines, once closed.
    pub fn output_range(&self) -> Option<std::ops::Range<usize>> {
        let end = self.end_line?;
        let start = match (self.start_line, self.start_inferred) {
            (Some(idx), true) => idx,
            (Some(idx), false) => idx + 1,
            (None, _) => 0,
        };
        Some(start.min(end)..end)
    }
}

/// Recognized marker line.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MarkerLine {
    Start { seq: u64 },
    End { exit_code: i32, seq: u64 },
}

/// Parse one captured line as a marker.
///
/// Only whole lines match: `TMUX_MCP_START_<seq>` or
/// `TMUX_MCP_DONE_<exit>_<seq>`. The shell's echo of the typed wrapper never
/// matches because it carries the unexpanded status expression.
pub fn parse_marker_line(line: &str) -> Option<MarkerLine> {
    let line = line.trim_end();
    if let Some(rest) = line.strip_prefix(START_PREFIX).and_then(|r| r.strip_prefix('_')) {
        return parse_digits(rest).map(|seq| MarkerLine::Start { seq });
    }
    let rest = line.strip_prefix(END_PREFIX)?.strip_prefix('_')?;
    let (code, seq) = rest.rsplit_once('_')?;
    let seq = parse_digits(seq)?;
    let exit_code = parse_exit_code(code)?;
    Some(MarkerLine::End { exit_code, seq })
}

fn parse_digits(text: &str) -> Option<u64> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

fn parse_exit_code(text: &str) -> Option<i32> {
    let digits = text.strip_prefix('-').unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// Pair every start/end sentinel in `lines` by sequence number.
///
/// An end sentinel without a visible start gets its start inferred as the
/// line after the previous end sentinel in scan order (or the top of the
/// snapshot). This covers the start line scrolling out of tmux history while
/// the end line is still present.
pub fn scan_markers<S: AsRef<str>>(lines: &[S]) -> BTreeMap<u64, MarkerBlock> {
    let mut blocks: BTreeMap<u64, MarkerBlock> = BTreeMap::new();
    let mut last_end: Option<usize> = None;

    for (idx, line) in lines.iter().enumerate() {
        match parse_marker_line(line.as_ref()) {
            Some(MarkerLine::Start { seq }) => {
                let block = blocks.entry(seq).or_insert_with(|| MarkerBlock::new(seq));
                // A later run reusing a closed number starts over.
                if block.is_closed() {
                    *block = MarkerBlock::new(seq);
                }
                block.start_line = Some(idx);
                block.start_inferred = false;
            }
            Some(MarkerLine::End { exit_code, seq }) => {
                let block = blocks.entry(seq).or_insert_with(|| MarkerBlock::new(seq));
                if block.start_line.is_none() {
                    block.start_line = Some(last_end.map_or(0, |end| end + 1));
                    block.start_inferred = true;
                }
                block.end_line = Some(idx);
                block.exit_code = Some(exit_code);
                last_end = Some(idx);
            }
            None => {}
        }
    }

    blocks
}
