//! Command execution and completion tracking for tmux panes.
//!
//! Commands are typed into a pane wrapped between two sentinel lines carrying a
//! global sequence number. Status checks capture the pane, pair sentinels by
//! that number, and resolve each record exactly once. Nothing runs in the
//! background: records only move forward when somebody asks about them.

pub mod helper;
pub mod markers;
pub mod registry;
pub mod sequence;
pub mod shell;
pub mod slicer;
mod wait;

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::TrackerConfig;
use crate::contracts::{CaptureWindow, KeyInjector, PaneContentSource};
use crate::error::TrackerError;
use crate::tmux::keys::type_keys;

use helper::{tcl_helper_script, HelperInstalls};
use markers::scan_markers;
use registry::CommandRegistry;
use sequence::SequenceAllocator;
use shell::{wrap_command, ShellConfig};
use wait::poll_until;

pub use registry::{CommandRecord, CommandStatus, GrepMatch, RAW_MODE_NOTICE};
pub use shell::ShellKind;
pub use slicer::{OutputWindow, SliceOptions};

/// One request to run input in a pane.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExecuteRequest {
    pub pane_id: String,
    pub command: String,
    /// Send the text as-is with no sentinels; the record is never resolved.
    pub raw: bool,
    /// Do not press Enter. Implies `raw`.
    pub no_enter: bool,
    /// Pause between characters when typing without Enter.
    pub key_delay: Duration,
}

impl ExecuteRequest {
    pub fn new(pane_id: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            pane_id: pane_id.into(),
            command: command.into(),
            ..Self::default()
        }
    }

    pub fn raw(mut self) -> Self {
        self.raw = true;
        self
    }

    pub fn without_enter(mut self, key_delay: Duration) -> Self {
        self.raw = true;
        self.no_enter = true;
        self.key_delay = key_delay;
        self
    }

    fn is_raw(&self) -> bool {
        self.raw || self.no_enter
    }
}

/// Runtime knobs for [`CommandTracker`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrackerSettings {
    pub capture_lines: usize,
    pub default_window_lines: usize,
    pub preview_lines: usize,
    pub poll_interval: Duration,
    pub wait_timeout: Duration,
    pub reap_after: Duration,
}

impl From<&TrackerConfig> for TrackerSettings {
    fn from(config: &TrackerConfig) -> Self {
        Self {
            capture_lines: config.capture_lines.max(1),
            default_window_lines: config.default_window_lines,
            preview_lines: config.preview_lines,
            poll_interval: config.poll_interval(),
            wait_timeout: config.wait_timeout(),
            reap_after: config.reap_after(),
        }
    }
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self::from(&TrackerConfig::default())
    }
}

/// Dialect selection plus where the Tcl helper is already installed.
#[derive(Debug, Default)]
struct ShellState {
    config: ShellConfig,
    helpers: HelperInstalls,
}

/// Dispatches commands into panes and tracks them to completion.
///
/// Lock order is sequence ticket, then shell state, then registry. The
/// sequence ticket is held across the pane sends of one dispatch.
pub struct CommandTracker {
    source: Arc<dyn PaneContentSource>,
    keys: Arc<dyn KeyInjector>,
    sequence: SequenceAllocator,
    shells: Mutex<ShellState>,
    registry: Mutex<CommandRegistry>,
    settings: TrackerSettings,
}

impl CommandTracker {
    pub fn new(
        source: Arc<dyn PaneContentSource>,
        keys: Arc<dyn KeyInjector>,
        shells: ShellConfig,
        settings: TrackerSettings,
    ) -> Self {
        let registry = CommandRegistry::new(settings.default_window_lines, settings.preview_lines);
        Self {
            source,
            keys,
            sequence: SequenceAllocator::new(),
            shells: Mutex::new(ShellState {
                config: shells,
                helpers: HelperInstalls::default(),
            }),
            registry: Mutex::new(registry),
            settings,
        }
    }

    /// Build a tracker over one backend serving both collaborator roles.
    pub fn with_backend<B>(backend: Arc<B>, shells: ShellConfig, settings: TrackerSettings) -> Self
    where
        B: PaneContentSource + KeyInjector + 'static,
    {
        let source: Arc<dyn PaneContentSource> = backend.clone();
        let keys: Arc<dyn KeyInjector> = backend;
        Self::new(source, keys, shells, settings)
    }

    pub fn settings(&self) -> &TrackerSettings {
        &self.settings
    }

    // -----------------------------------------------------------------------
    // Dispatch
    // -----------------------------------------------------------------------

    /// Send `request` into its pane and return the new record id.
    ///
    /// The pane is captured first so the new sequence number is above any
    /// sentinel already in its history. A failed capture or send creates no
    /// record and consumes no sequence number.
    pub async fn execute(&self, request: ExecuteRequest) -> Result<String, TrackerError> {
        let pane_id = request.pane_id.trim();
        if pane_id.is_empty() {
            return Err(TrackerError::InvalidArguments(
                "pane id must not be empty".into(),
            ));
        }
        if request.is_raw() {
            return self.execute_raw(pane_id, &request).await;
        }
        if request.command.trim().is_empty() {
            return Err(TrackerError::InvalidArguments(
                "command must not be empty".into(),
            ));
        }

        let mut ticket = self.sequence.reserve().await;
        // Sentinels from earlier processes may still sit in the pane history.
        let visible = self
            .source
            .capture(pane_id, CaptureWindow::LastLines(self.settings.capture_lines))
            .await?;
        if let Some((&highest, _)) = scan_markers(&visible).last_key_value() {
            if highest >= ticket.seq() {
                debug!(pane_id, highest, "skipping sequence numbers already in pane");
                ticket.skip_past(highest);
            }
        }
        let seq = ticket.seq();
        let (shell, needs_helper) = {
            let shells = self.shells.lock().await;
            let shell = shells.config.shell_for(pane_id);
            (shell, shell.uses_helper() && !shells.helpers.is_installed(pane_id))
        };

        if needs_helper {
            self.keys
                .send_text(pane_id, &tcl_helper_script(), true)
                .await?;
            self.shells.lock().await.helpers.mark_installed(pane_id);
            info!(pane_id, %shell, "installed interpreter helper");
        }

        let wrapped = wrap_command(&request.command, shell, seq);
        self.keys.send_text(pane_id, &wrapped, true).await?;
        let seq = ticket.commit();

        let id = Uuid::new_v4().to_string();
        let record = CommandRecord::wrapped(id.clone(), pane_id, request.command, shell, seq);
        self.registry.lock().await.insert(record);
        debug!(id = %id, pane_id, seq, %shell, "dispatched command");
        Ok(id)
    }

    async fn execute_raw(
        &self,
        pane_id: &str,
        request: &ExecuteRequest,
    ) -> Result<String, TrackerError> {
        if request.no_enter {
            type_keys(self.keys.as_ref(), pane_id, &request.command, request.key_delay).await?;
        } else {
            self.keys.send_text(pane_id, &request.command, true).await?;
        }

        let shell = self.shell_for(pane_id).await;
        let id = Uuid::new_v4().to_string();
        let record = CommandRecord::raw(id.clone(), pane_id, request.command.clone(), shell);
        self.registry.lock().await.insert(record);
        debug!(id = %id, pane_id, no_enter = request.no_enter, "dispatched raw input");
        Ok(id)
    }

    // -----------------------------------------------------------------------
    // Status
    // -----------------------------------------------------------------------

    /// Current state of `id`, resolving it against a fresh capture if pending.
    ///
    /// Capture failures never fail the query: the record stays pending and
    /// carries the failure as its preview.
    pub async fn check_status(
        &self,
        id: &str,
        options: &SliceOptions,
    ) -> Result<CommandRecord, TrackerError> {
        let pane_id = {
            let registry = self.registry.lock().await;
            let record = registry
                .get(id)
                .ok_or_else(|| TrackerError::NotFound(id.to_string()))?;
            record.needs_snapshot().then(|| record.pane_id.clone())
        };

        let snapshot = match pane_id {
            Some(pane_id) => {
                let window = CaptureWindow::LastLines(self.settings.capture_lines);
                match self.source.capture(&pane_id, window).await {
                    Ok(lines) => Some(lines),
                    Err(err) => {
                        warn!(id, pane_id = %pane_id, error = %err, "status capture failed");
                        return self
                            .registry
                            .lock()
                            .await
                            .note_pending(id, format!("pane capture failed: {err}"))
                            .cloned();
                    }
                }
            }
            None => None,
        };

        self.registry
            .lock()
            .await
            .refresh(id, snapshot.as_deref(), options)
            .cloned()
    }

    /// Poll `id` until it is final or `timeout` elapses.
    ///
    /// A timeout is not an error: the still-pending record is returned.
    /// Raw-mode records return immediately since they never resolve.
    pub async fn wait(
        &self,
        id: &str,
        options: &SliceOptions,
        timeout: Option<Duration>,
    ) -> Result<CommandRecord, TrackerError> {
        let timeout = timeout.unwrap_or(self.settings.wait_timeout);
        poll_until(
            timeout,
            self.settings.poll_interval,
            |record: &CommandRecord| record.status.is_terminal() || record.raw,
            move || self.check_status(id, options),
        )
        .await
    }

    /// Last known state of `id` without capturing the pane.
    pub async fn get(&self, id: &str) -> Option<CommandRecord> {
        self.registry.lock().await.get(id).cloned()
    }

    /// Ids of every record still pending, oldest first.
    pub async fn active_ids(&self) -> Vec<String> {
        self.registry.lock().await.active_ids()
    }

    /// Search the full output of a final record.
    pub async fn grep(
        &self,
        id: &str,
        pattern: &str,
        case_insensitive: bool,
    ) -> Result<Vec<GrepMatch>, TrackerError> {
        self.registry.lock().await.grep(id, pattern, case_insensitive)
    }

    /// Drop final records older than `max_age` (default from settings).
    pub async fn reap(&self, max_age: Option<Duration>) -> usize {
        let max_age = max_age.unwrap_or(self.settings.reap_after);
        let removed = self.registry.lock().await.reap_older_than(max_age);
        if removed > 0 {
            info!(removed, ?max_age, "reaped finished commands");
        }
        removed
    }

    /// Raw pane text, for callers inspecting untracked input.
    pub async fn capture(
        &self,
        pane_id: &str,
        window: CaptureWindow,
    ) -> Result<Vec<String>, TrackerError> {
        if pane_id.trim().is_empty() {
            return Err(TrackerError::InvalidArguments(
                "pane id must not be empty".into(),
            ));
        }
        self.source.capture(pane_id.trim(), window).await
    }

    // -----------------------------------------------------------------------
    // Shell configuration
    // -----------------------------------------------------------------------

    pub async fn shell_for(&self, pane_id: &str) -> ShellKind {
        self.shells.lock().await.config.shell_for(pane_id)
    }

    /// Change the default dialect; panes without an override lose their
    /// helper install if the dialect changed.
    pub async fn set_default_shell(&self, shell: ShellKind) {
        let mut shells = self.shells.lock().await;
        let previous = shells.config.set_default(shell);
        if previous != shell {
            let ShellState { config, helpers } = &mut *shells;
            helpers.invalidate_where(|pane| !config.has_override(pane));
            debug!(%previous, %shell, "default shell changed");
        }
    }

    pub async fn set_pane_shell(&self, pane_id: &str, shell: ShellKind) {
        let mut shells = self.shells.lock().await;
        let previous = shells.config.set_pane(pane_id, shell);
        if previous != shell {
            shells.helpers.invalidate(pane_id);
            debug!(pane_id, %previous, %shell, "pane shell changed");
        }
    }

    /// Remove a pane override. Returns the override that was removed.
    pub async fn clear_pane_shell(&self, pane_id: &str) -> Option<ShellKind> {
        let mut shells = self.shells.lock().await;
        let removed = shells.config.clear_pane(pane_id);
        if removed.is_some() {
            shells.helpers.invalidate(pane_id);
        }
        removed
    }
}
