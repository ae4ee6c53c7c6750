//! In-memory panes that interpret typed input like a small shell.
//!
//! Each pane keeps a bounded line buffer (its scrollback) and a dialect.
//! Typed lines are echoed after a prompt, then evaluated:
//!
//! - posix/fish: `;`-separated statements; `echo`, `true`, `false`,
//!   `exit-with N`, `printf-lines N`, and `hang` (suspends the rest of the
//!   line until [`FakeShell::resume`]). `$?` / `{$status}` expand to the last
//!   status.
//! - tcl: understands the `::panetrack` helper definition and its `run`
//!   procedure, with `puts`, `error`, `set`, and two-operand `expr` bodies.

#![allow(dead_code)]

use async_trait::async_trait;
use panetrack::contracts::{CaptureWindow, KeyInjector, PaneContentSource};
use panetrack::error::TrackerError;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Dialect {
    Posix,
    Fish,
    Tcl,
}

impl Dialect {
    fn prompt(self) -> &'static str {
        match self {
            Self::Posix => "$ ",
            Self::Fish => "> ",
            Self::Tcl => "% ",
        }
    }
}

#[derive(Debug)]
struct PaneSim {
    dialect: Dialect,
    lines: Vec<String>,
    status: i32,
    helper_defined: bool,
    suspended: Option<Vec<String>>,
    keys: Vec<String>,
}

impl PaneSim {
    fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            lines: Vec::new(),
            status: 0,
            helper_defined: false,
            suspended: None,
            keys: Vec::new(),
        }
    }
}

/// Fake tmux server hosting simulated panes.
pub struct FakeShell {
    panes: Mutex<HashMap<String, PaneSim>>,
    history_limit: usize,
}

impl FakeShell {
    pub fn new() -> Self {
        Self::with_history_limit(10_000)
    }

    pub fn with_history_limit(history_limit: usize) -> Self {
        Self {
            panes: Mutex::new(HashMap::new()),
            history_limit,
        }
    }

    fn panes(&self) -> MutexGuard<'_, HashMap<String, PaneSim>> {
        self.panes.lock().expect("fake shell lock poisoned")
    }

    pub fn add_pane(&self, pane_id: &str, dialect: Dialect) {
        self.panes()
            .insert(pane_id.to_string(), PaneSim::new(dialect));
    }

    pub fn lines(&self, pane_id: &str) -> Vec<String> {
        self.panes()
            .get(pane_id)
            .map(|pane| pane.lines.clone())
            .unwrap_or_default()
    }

    pub fn keys(&self, pane_id: &str) -> Vec<String> {
        self.panes()
            .get(pane_id)
            .map(|pane| pane.keys.clone())
            .unwrap_or_default()
    }

    pub fn helper_defined(&self, pane_id: &str) -> bool {
        self.panes()
            .get(pane_id)
            .is_some_and(|pane| pane.helper_defined)
    }

    /// Let a `hang` statement finish and run the rest of its line.
    pub fn resume(&self, pane_id: &str) {
        let mut panes = self.panes();
        let Some(pane) = panes.get_mut(pane_id) else {
            return;
        };
        if let Some(rest) = pane.suspended.take() {
            pane.status = 0;
            let mut out = Vec::new();
            run_statements(pane, rest, &mut out);
            push_bounded(pane, out, self.history_limit);
        }
    }

    fn missing(pane_id: &str) -> TrackerError {
        TrackerError::Tmux(format!("can't find pane: {pane_id}"))
    }
}

#[async_trait]
impl PaneContentSource for FakeShell {
    async fn capture(
        &self,
        pane_id: &str,
        window: CaptureWindow,
    ) -> Result<Vec<String>, TrackerError> {
        let panes = self.panes();
        let pane = panes.get(pane_id).ok_or_else(|| Self::missing(pane_id))?;
        Ok(match window {
            CaptureWindow::LastLines(n) => {
                pane.lines[pane.lines.len().saturating_sub(n)..].to_vec()
            }
            CaptureWindow::Range { .. } => pane.lines.clone(),
        })
    }
}

#[async_trait]
impl KeyInjector for FakeShell {
    async fn send_text(
        &self,
        pane_id: &str,
        text: &str,
        press_enter: bool,
    ) -> Result<(), TrackerError> {
        let mut panes = self.panes();
        let pane = panes.get_mut(pane_id).ok_or_else(|| Self::missing(pane_id))?;
        if !press_enter {
            pane.keys.push(text.to_string());
            return Ok(());
        }

        let mut out = vec![format!("{}{text}", pane.dialect.prompt())];
        if pane.suspended.is_none() {
            match pane.dialect {
                Dialect::Posix | Dialect::Fish => {
                    let statements = text.split("; ").map(str::to_string).collect();
                    run_statements(pane, statements, &mut out);
                }
                Dialect::Tcl => run_tcl_line(pane, text, &mut out),
            }
        }
        push_bounded(pane, out, self.history_limit);
        Ok(())
    }

    async fn send_keys(&self, pane_id: &str, keys: &[String]) -> Result<(), TrackerError> {
        let mut panes = self.panes();
        let pane = panes.get_mut(pane_id).ok_or_else(|| Self::missing(pane_id))?;
        for key in keys {
            pane.keys.push(key.clone());
            if key == "C-c" && pane.suspended.take().is_some() {
                pane.status = 130;
                push_bounded(pane, vec!["^C".to_string()], self.history_limit);
            }
        }
        Ok(())
    }
}

fn push_bounded(pane: &mut PaneSim, out: Vec<String>, limit: usize) {
    pane.lines.extend(out);
    if pane.lines.len() > limit {
        let excess = pane.lines.len() - limit;
        pane.lines.drain(..excess);
    }
}

fn run_statements(pane: &mut PaneSim, statements: Vec<String>, out: &mut Vec<String>) {
    let mut remaining = statements.into_iter();
    while let Some(statement) = remaining.next() {
        let statement = statement.trim();
        if statement == "hang" {
            pane.suspended = Some(remaining.collect());
            return;
        }
        pane.status = run_statement(pane.dialect, statement, pane.status, out);
    }
}

fn run_statement(dialect: Dialect, statement: &str, status: i32, out: &mut Vec<String>) -> i32 {
    if let Some(arg) = statement.strip_prefix("echo ") {
        let arg = unquote(arg.trim());
        let expanded = match dialect {
            Dialect::Fish => arg
                .replace("{$status}", &status.to_string())
                .replace("$status", &status.to_string()),
            _ => arg.replace("$?", &status.to_string()),
        };
        out.push(expanded);
        return 0;
    }
    if let Some(code) = statement.strip_prefix("exit-with ") {
        return code.trim().parse().unwrap_or(1);
    }
    if let Some(count) = statement.strip_prefix("printf-lines ") {
        let count: usize = count.trim().parse().unwrap_or(0);
        out.extend((1..=count).map(|idx| format!("line {idx}")));
        return 0;
    }
    match statement {
        "" | "true" => 0,
        "false" => 1,
        other => {
            let name = other.split_whitespace().next().unwrap_or(other);
            out.push(match dialect {
                Dialect::Fish => format!("fish: Unknown command: {name}"),
                _ => format!("bash: {name}: command not found"),
            });
            127
        }
    }
}

fn unquote(text: &str) -> String {
    text.strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(text)
        .to_string()
}

fn run_tcl_line(pane: &mut PaneSim, text: &str, out: &mut Vec<String>) {
    if text.starts_with("namespace eval ::panetrack {proc run {seq body}") {
        pane.helper_defined = true;
        return;
    }
    let Some(call) = text.strip_prefix("::panetrack::run ") else {
        let (code, result) = eval_tcl(text, out);
        if !result.is_empty() || code != 0 {
            out.push(result);
        }
        return;
    };
    if !pane.helper_defined {
        out.push("invalid command name \"::panetrack::run\"".to_string());
        return;
    }
    let Some((seq, body)) = call.split_once(' ') else {
        out.push("wrong # args: should be \"::panetrack::run seq body\"".to_string());
        return;
    };
    out.push(format!("TMUX_MCP_START_{seq}"));
    let (code, result) = eval_tcl(&tcl_word(body), out);
    if !result.is_empty() {
        out.push(result);
    }
    let status = if code == 1 { 1 } else { 0 };
    out.push(format!("TMUX_MCP_DONE_{status}_{seq}"));
}

/// Value of one Tcl word: brace-quoted or backslash-escaped.
fn tcl_word(word: &str) -> String {
    if let Some(inner) = word.strip_prefix('{').and_then(|w| w.strip_suffix('}')) {
        return inner.to_string();
    }
    let mut value = String::new();
    let mut chars = word.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            value.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => value.push('\n'),
            Some('t') => value.push('\t'),
            Some(other) => value.push(other),
            None => {}
        }
    }
    value
}

/// Evaluate a tiny Tcl subset; returns (catch code, result).
fn eval_tcl(body: &str, out: &mut Vec<String>) -> (i32, String) {
    let body = body.trim();
    let (command, rest) = body.split_once(' ').unwrap_or((body, ""));
    let arg = tcl_word(rest.trim()).trim_matches('"').to_string();
    match command {
        "puts" => {
            out.extend(arg.lines().map(str::to_string));
            (0, String::new())
        }
        "error" => (1, arg),
        "set" => (0, rest.split_whitespace().nth(1).unwrap_or_default().to_string()),
        "expr" => {
            let parts: Vec<&str> = arg.split_whitespace().collect();
            match parts.as_slice() {
                [a, "+", b] => match (a.parse::<i64>(), b.parse::<i64>()) {
                    (Ok(a), Ok(b)) => (0, (a + b).to_string()),
                    _ => (
                        1,
                        "can't use non-numeric string as operand of \"+\"".to_string(),
                    ),
                },
                _ => (1, format!("syntax error in expression \"{arg}\"")),
            }
        }
        other => (1, format!("invalid command name \"{other}\"")),
    }
}
