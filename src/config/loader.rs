//! Top-level config loading pipeline.

use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::ConfigError;

use super::env::apply_runtime_env_overrides;
use super::sources::{config_root_dir, read_config_text_with_sources};
use super::Config;

/// Load configuration from disk and environment.
///
/// `path_override` is an explicit config file path (from --config flag).
pub fn load_config(path_override: Option<&str>) -> Result<Config, ConfigError> {
    load_config_from_sources(
        path_override,
        |path| std::fs::read_to_string(path),
        |name| std::env::var(name).ok(),
        config_root_dir,
    )
}

pub(super) fn load_config_from_sources<FRead, FEnv, FRoot>(
    path_override: Option<&str>,
    read_file: FRead,
    env_lookup: FEnv,
    config_root: FRoot,
) -> Result<Config, ConfigError>
where
    FRead: Fn(&Path) -> Result<String, std::io::Error>,
    FEnv: Fn(&str) -> Option<String>,
    FRoot: Fn() -> Option<PathBuf>,
{
    let (config_text, source) =
        read_config_text_with_sources(path_override, &read_file, &config_root)?;
    debug!(%source, "loaded config");
    let mut config: Config = toml::from_str(&config_text)?;
    apply_runtime_env_overrides(&mut config, &env_lookup)?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.tmux.binary.trim().is_empty() {
        return Err(ConfigError::Invalid("tmux.binary must not be empty".into()));
    }
    if config.tracker.capture_lines == 0 {
        return Err(ConfigError::Invalid(
            "tracker.capture_lines must be positive".into(),
        ));
    }
    if config.tracker.poll_interval_ms == 0 {
        return Err(ConfigError::Invalid(
            "tracker.poll_interval_ms must be positive".into(),
        ));
    }
    Ok(())
}
