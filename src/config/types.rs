//! Configuration data model.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use tokio::time::Duration;

use crate::reconcile::{IdlePolicy, ReconcileOptions, TabSpec};

use super::defaults::{
    default_idle_shells, DEFAULT_POLL_INTERVAL_MS, DEFAULT_TIMEOUT_SECS, DEFAULT_WINDOW_TITLE,
};
use super::sources::ConfigSource;

/// Top-level runtime configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub settings: Settings,
    pub tmux: TmuxConfig,
    /// Declared workspaces keyed by workspace id.
    pub workspaces: BTreeMap<String, WorkspaceConfig>,
}

/// Engine behavior settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub timeout_secs: u64,
    pub poll_interval_ms: u64,
    pub idle_shells: Vec<String>,
    pub window_title: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            idle_shells: default_idle_shells(),
            window_title: DEFAULT_WINDOW_TITLE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TmuxConfig {
    /// Named server socket passed as `tmux -L`.
    pub socket: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    pub tabs: Vec<TabConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TabConfig {
    pub name: String,
    /// Working directory; `~` is expanded at load time.
    pub cwd: String,
    #[serde(default)]
    pub command: Option<String>,
}

impl Config {
    pub fn reconcile_options(&self) -> ReconcileOptions {
        ReconcileOptions {
            timeout: Duration::from_secs(self.settings.timeout_secs.max(1)),
            idle: self.idle_policy(),
            window_title: self.settings.window_title.clone(),
        }
    }

    pub fn idle_policy(&self) -> IdlePolicy {
        IdlePolicy::new(self.settings.idle_shells.iter().cloned())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.settings.poll_interval_ms.max(1))
    }

    /// Declared tabs for `workspace`, in order.
    pub fn tab_specs(&self, workspace: &str) -> Option<Vec<TabSpec>> {
        let declared = self.workspaces.get(workspace)?;
        Some(
            declared
                .tabs
                .iter()
                .map(|tab| TabSpec {
                    name: tab.name.clone(),
                    working_directory: PathBuf::from(&tab.cwd),
                    command: tab
                        .command
                        .as_deref()
                        .map(str::trim)
                        .filter(|command| !command.is_empty())
                        .map(str::to_string),
                })
                .collect(),
        )
    }
}

/// Loaded config plus where it came from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub source: ConfigSource,
}

/// What `termspace init` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitOutcome {
    Created { path: PathBuf },
    /// The file already existed and `--force` was not given.
    Unchanged { path: PathBuf },
    Replaced { path: PathBuf, backup: PathBuf },
}
