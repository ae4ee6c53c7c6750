//! Shell dialects and the sentinel wrapping each one needs.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::helper::tcl_invocation;
use super::markers::{END_PREFIX, START_PREFIX};

/// Shell dialect running inside a pane.
///
/// Unknown names fall back to [`ShellKind::Bash`] instead of failing.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ShellKind {
    #[default]
    Bash,
    Zsh,
    Fish,
    Tcl,
}

impl ShellKind {
    pub const ALL: [Self; 4] = [Self::Bash, Self::Zsh, Self::Fish, Self::Tcl];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bash => "bash",
            Self::Zsh => "zsh",
            Self::Fish => "fish",
            Self::Tcl => "tcl",
        }
    }

    /// Parse a dialect name, falling back to the default dialect.
    pub fn parse_or_default(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "bash" => Self::Bash,
            "zsh" => Self::Zsh,
            "fish" => Self::Fish,
            "tcl" | "tclsh" => Self::Tcl,
            _ => Self::default(),
        }
    }

    /// Whether commands run through the per-pane interpreter helper.
    pub fn uses_helper(self) -> bool {
        matches!(self, Self::Tcl)
    }

    /// The expression that echoes the last exit status, ready to be glued to
    /// a `_<seq>` suffix.
    fn status_expression(self) -> &'static str {
        match self {
            Self::Bash | Self::Zsh => "$?",
            // `$status_7` would read a variable named `status_7`.
            Self::Fish => "{$status}",
            Self::Tcl => "",
        }
    }
}

impl fmt::Display for ShellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for ShellKind {
    fn from(value: &str) -> Self {
        Self::parse_or_default(value)
    }
}

impl From<String> for ShellKind {
    fn from(value: String) -> Self {
        Self::parse_or_default(&value)
    }
}

impl From<ShellKind> for String {
    fn from(value: ShellKind) -> Self {
        value.as_str().to_string()
    }
}

/// Wrap `command` with start/end sentinels for `shell`, tagged with `seq`.
pub fn wrap_command(command: &str, shell: ShellKind, seq: u64) -> String {
    match shell {
        ShellKind::Bash | ShellKind::Zsh => format!(
            "echo \"{START_PREFIX}_{seq}\"; {command}; echo \"{END_PREFIX}_{status}_{seq}\"",
            status = shell.status_expression()
        ),
        ShellKind::Fish => format!(
            "echo \"{START_PREFIX}_{seq}\"; {command}; echo {END_PREFIX}_{status}_{seq}",
            status = shell.status_expression()
        ),
        ShellKind::Tcl => tcl_invocation(command, seq),
    }
}

/// Process-wide default dialect plus per-pane overrides.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    pub default: ShellKind,
    pub panes: BTreeMap<String, ShellKind>,
}

impl ShellConfig {
    /// Active dialect for `pane_id`.
    pub fn shell_for(&self, pane_id: &str) -> ShellKind {
        self.panes.get(pane_id).copied().unwrap_or(self.default)
    }

    pub fn has_override(&self, pane_id: &str) -> bool {
        self.panes.contains_key(pane_id)
    }

    /// Replace the default dialect; returns the previous one.
    pub fn set_default(&mut self, shell: ShellKind) -> ShellKind {
        std::mem::replace(&mut self.default, shell)
    }

    /// Override the dialect of one pane; returns the previously active dialect.
    pub fn set_pane(&mut self, pane_id: &str, shell: ShellKind) -> ShellKind {
        let previous = self.shell_for(pane_id);
        self.panes.insert(pane_id.to_string(), shell);
        previous
    }

    /// Drop a pane override; returns the override that was removed.
    pub fn clear_pane(&mut self, pane_id: &str) -> Option<ShellKind> {
        self.panes.remove(pane_id)
    }
}
