//! Top-level config loading pipeline.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

use super::env::apply_runtime_env_overrides;
use super::init::config_root_dir;
use super::sources::read_config_text_with_sources;
use super::{Config, LoadedConfig};

/// Load configuration from disk and environment.
///
/// `path_override` is an explicit config file path (from --config flag).
pub fn load_config(path_override: Option<&str>) -> Result<LoadedConfig, ConfigError> {
    load_config_from_sources(
        path_override,
        |path| std::fs::read_to_string(path),
        |name| std::env::var(name).ok(),
        config_root_dir,
        dirs::home_dir,
    )
}

pub(super) fn load_config_from_sources<FRead, FEnv, FRoot, FHome>(
    path_override: Option<&str>,
    read_file: FRead,
    env_lookup: FEnv,
    config_root: FRoot,
    home_dir: FHome,
) -> Result<LoadedConfig, ConfigError>
where
    FRead: Fn(&Path) -> Result<String, std::io::Error>,
    FEnv: Fn(&str) -> Option<String>,
    FRoot: Fn() -> Option<PathBuf>,
    FHome: Fn() -> Option<PathBuf>,
{
    let (config_text, source) =
        read_config_text_with_sources(path_override, &read_file, &config_root)?;
    let mut config: Config = toml::from_str(&config_text)?;
    apply_runtime_env_overrides(&mut config, &env_lookup)?;
    validate_config(&config)?;
    expand_tab_directories(&mut config, home_dir());
    Ok(LoadedConfig { config, source })
}

fn validate_config(config: &Config) -> Result<(), ConfigError> {
    for (workspace, declared) in &config.workspaces {
        if workspace.trim().is_empty() {
            return Err(ConfigError::Invalid("workspace ids must not be empty".into()));
        }
        let mut seen = HashSet::new();
        for tab in &declared.tabs {
            if tab.name.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "workspace `{workspace}` has a tab without a name"
                )));
            }
            if tab.cwd.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "tab `{}` in workspace `{workspace}` has an empty cwd",
                    tab.name
                )));
            }
            if !seen.insert(tab.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "workspace `{workspace}` declares tab `{}` more than once",
                    tab.name
                )));
            }
        }
    }
    Ok(())
}

fn expand_tab_directories(config: &mut Config, home: Option<PathBuf>) {
    let Some(home) = home else {
        return;
    };
    for declared in config.workspaces.values_mut() {
        for tab in &mut declared.tabs {
            tab.cwd = expand_home(&tab.cwd, &home);
        }
    }
}

/// Expand a leading `~` or `~/` against `home`.
pub(super) fn expand_home(raw: &str, home: &Path) -> String {
    let raw = raw.trim();
    if raw == "~" {
        return home.display().to_string();
    }
    match raw.strip_prefix("~/") {
        Some(rest) => home.join(rest).display().to_string(),
        None => raw.to_string(),
    }
}
