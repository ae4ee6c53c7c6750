//! Interpreter-side helper for Tcl panes.
//!
//! tclsh evaluates one command per input line and reports failures through
//! `catch` rather than an exit status, so the sentinels are emitted by a small
//! procedure installed once per pane. Each command is then sent as a call to
//! that procedure.

use std::collections::HashSet;

use super::markers::{END_PREFIX, START_PREFIX};

/// Namespace the helper procedure lives in.
pub const HELPER_NAMESPACE: &str = "::panetrack";

/// One-line script that defines `::panetrack::run seq body`.
///
/// The procedure echoes the start sentinel, evaluates `body` at global level,
/// prints its result or error message, then echoes the end sentinel with
/// status 0 (ok) or 1 (error). stdout is flushed after every write.
pub fn tcl_helper_script() -> String {
    format!(
        "namespace eval {HELPER_NAMESPACE} {{proc run {{seq body}} {{\
puts \"{START_PREFIX}_$seq\"; flush stdout; \
set code [catch {{uplevel #0 $body}} result]; \
if {{$result ne \"\"}} {{puts $result}}; flush stdout; \
if {{$code == 1}} {{set status 1}} else {{set status 0}}; \
puts \"{END_PREFIX}_${{status}}_$seq\"; flush stdout}}}}"
    )
}

/// Call into the installed helper for one command.
pub fn tcl_invocation(command: &str, seq: u64) -> String {
    format!("{HELPER_NAMESPACE}::run {seq} {}", tcl_quote(command))
}

/// Quote `text` as a single Tcl word whose value is exactly `text`.
pub fn tcl_quote(text: &str) -> String {
    if text.is_empty() {
        return "{}".to_string();
    }
    if braces_balanced(text) && !text.contains('\n') && !text.ends_with('\\') {
        return format!("{{{text}}}");
    }
    let mut quoted = String::with_capacity(text.len() * 2);
    for ch in text.chars() {
        match ch {
            '\n' => quoted.push_str("\\n"),
            '\t' => quoted.push_str("\\t"),
            '\\' | '{' | '}' | '[' | ']' | '$' | '"' | ';' | ' ' => {
                quoted.push('\\');
                quoted.push(ch);
            }
            _ => quoted.push(ch),
        }
    }
    quoted
}

fn braces_balanced(text: &str) -> bool {
    let mut depth: usize = 0;
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => {
                chars.next();
            }
            '{' => depth += 1,
            '}' => {
                if depth == 0 {
                    return false;
                }
                depth -= 1;
            }
            _ => {}
        }
    }
    depth == 0
}

/// Panes where the helper procedure is known to be installed.
#[derive(Debug, Default)]
pub struct HelperInstalls {
    panes: HashSet<String>,
}

impl HelperInstalls {
    pub fn is_installed(&self, pane_id: &str) -> bool {
        self.panes.contains(pane_id)
    }

    pub fn mark_installed(&mut self, pane_id: &str) {
        self.panes.insert(pane_id.to_string());
    }

    /// Forget the install for one pane; returns whether it was recorded.
    pub fn invalidate(&mut self, pane_id: &str) -> bool {
        self.panes.remove(pane_id)
    }

    /// Forget installs for every pane matching `affected`.
    pub fn invalidate_where(&mut self, mut affected: impl FnMut(&str) -> bool) {
        self.panes.retain(|pane| !affected(pane));
    }
}
