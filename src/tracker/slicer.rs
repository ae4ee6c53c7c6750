//! Windowed views over a finished command's output.

use serde::{Deserialize, Serialize};

/// Trailing window exposed when no slicing option is given.
pub const DEFAULT_WINDOW_LINES: usize = 100;

/// How much of a command's output to expose.
///
/// Precedence: explicit line bounds, then `last_lines`, then the default
/// trailing window. Line bounds are 1-based and inclusive.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SliceOptions {
    pub start_line: Option<usize>,
    pub end_line: Option<usize>,
    pub last_lines: Option<usize>,
}

impl SliceOptions {
    pub fn tail(lines: usize) -> Self {
        Self {
            last_lines: Some(lines),
            ..Self::default()
        }
    }

    pub fn range(start_line: usize, end_line: usize) -> Self {
        Self {
            start_line: Some(start_line),
            end_line: Some(end_line),
            last_lines: None,
        }
    }

    fn has_bounds(&self) -> bool {
        self.start_line.is_some() || self.end_line.is_some()
    }
}

/// Slice of output lines plus where it sits in the full output.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputWindow {
    pub lines: Vec<String>,
    pub returned_lines: usize,
    /// 0-based index of the first returned line.
    pub start_index: usize,
    /// 0-based exclusive end index.
    pub end_index: usize,
    pub total_lines: usize,
    /// True when the window is smaller than the output, or when the start
    /// sentinel was lost and leading context may be missing.
    pub truncated: bool,
}

/// Compute the exposed window of `all` according to `options`.
pub fn slice_output(
    all: &[String],
    options: &SliceOptions,
    default_window: usize,
    start_marker_lost: bool,
) -> OutputWindow {
    let total = all.len();
    let (start, end) = if options.has_bounds() {
        let start = options.start_line.map_or(0, |line| line.saturating_sub(1));
        let end = options.end_line.map_or(total, |line| line.min(total));
        let start = start.min(total);
        (start, end.max(start))
    } else {
        let keep = options.last_lines.unwrap_or(default_window);
        (total.saturating_sub(keep), total)
    };

    let lines = all[start..end].to_vec();
    let returned_lines = lines.len();
    OutputWindow {
        lines,
        returned_lines,
        start_index: start,
        end_index: end,
        total_lines: total,
        truncated: returned_lines < total || start_marker_lost,
    }
}
