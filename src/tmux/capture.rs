//! `tmux capture-pane` argument building and output parsing.

use crate::contracts::CaptureWindow;

/// Build `capture-pane` arguments for `pane_id`.
///
/// Wrapped lines are always joined (`-J`) so a long sentinel line is never
/// split across two captured rows.
pub(crate) fn capture_pane_args(pane_id: &str, window: CaptureWindow) -> Vec<String> {
    let mut args = vec![
        "capture-pane".to_string(),
        "-p".to_string(),
        "-J".to_string(),
        "-t".to_string(),
        pane_id.to_string(),
    ];
    match window {
        CaptureWindow::LastLines(lines) => {
            args.push("-S".to_string());
            args.push(format!("-{lines}"));
        }
        CaptureWindow::Range { start, end } => {
            args.push("-S".to_string());
            args.push(start.to_string());
            args.push("-E".to_string());
            args.push(end.to_string());
        }
    }
    args
}

/// Split captured text into lines, dropping the blank rows tmux pads the
/// visible screen with.
pub(crate) fn parse_capture_output(stdout: &str) -> Vec<String> {
    let mut lines: Vec<String> = stdout.lines().map(str::to_string).collect();
    while lines.last().is_some_and(|line| line.trim().is_empty()) {
        lines.pop();
    }
    lines
}
