//! Process spawning helpers for tmux CLI calls.

use std::process::Stdio;
use tokio::process::Command;

use crate::error::TrackerError;

/// Captured result of one finished process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ExecOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Spawn `program` with `args` and wait for it to exit.
pub(crate) async fn run_process(program: &str, args: &[String]) -> Result<ExecOutput, TrackerError> {
    let mut cmd = Command::new(program);
    // Dropping the owning future must not leave tmux clients behind.
    cmd.kill_on_drop(true);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let output = cmd
        .output()
        .await
        .map_err(|e| TrackerError::Tmux(format!("{program}: {e}")))?;

    Ok(ExecOutput {
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    })
}

/// Convert a non-zero exit into a contextual tmux error.
pub(crate) fn ensure_success(output: ExecOutput, context: &str) -> Result<ExecOutput, TrackerError> {
    if output.exit_code == 0 {
        return Ok(output);
    }

    let mut details = if output.stderr.trim().is_empty() {
        output.stdout.trim().to_string()
    } else {
        output.stderr.trim().to_string()
    };
    if details.is_empty() {
        details = format!("command exited with {}", output.exit_code);
    }

    Err(TrackerError::Tmux(format!("{context}: {details}")))
}
