//! Environment variable overrides.
//!
//! `PANETRACK_*` variables win over every file source.

use crate::error::ConfigError;
use crate::tracker::shell::ShellKind;

use super::Config;

pub(super) const ENV_SHELL: &str = "PANETRACK_SHELL";
pub(super) const ENV_TMUX_SOCKET: &str = "PANETRACK_TMUX_SOCKET";
pub(super) const ENV_POLL_INTERVAL_MS: &str = "PANETRACK_POLL_INTERVAL_MS";
pub(super) const ENV_WAIT_TIMEOUT_SECS: &str = "PANETRACK_WAIT_TIMEOUT_SECS";

pub(super) fn apply_runtime_env_overrides<FEnv>(
    config: &mut Config,
    env_lookup: &FEnv,
) -> Result<(), ConfigError>
where
    FEnv: Fn(&str) -> Option<String>,
{
    if let Some(shell) = non_empty(env_lookup, ENV_SHELL) {
        config.shell.default = ShellKind::parse_or_default(&shell);
    }
    if let Some(socket) = non_empty(env_lookup, ENV_TMUX_SOCKET) {
        config.tmux.socket = Some(socket);
    }
    if let Some(interval) = non_empty(env_lookup, ENV_POLL_INTERVAL_MS) {
        config.tracker.poll_interval_ms =
            parse_u64(ENV_POLL_INTERVAL_MS, &interval, "milliseconds")?;
    }
    if let Some(timeout) = non_empty(env_lookup, ENV_WAIT_TIMEOUT_SECS) {
        config.tracker.wait_timeout_secs = parse_u64(ENV_WAIT_TIMEOUT_SECS, &timeout, "seconds")?;
    }
    Ok(())
}

fn non_empty<FEnv>(env_lookup: &FEnv, name: &str) -> Option<String>
where
    FEnv: Fn(&str) -> Option<String>,
{
    env_lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_u64(name: &str, value: &str, unit: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| {
        ConfigError::Invalid(format!(
            "invalid {name} value `{value}`: expected non-negative integer {unit}"
        ))
    })
}
