//! Declared workspace data and idle-session policy.

use std::path::{Path, PathBuf};

/// Declared desired state of one tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabSpec {
    /// Identity of the tab inside its workspace. Stamped on the tab at creation.
    pub name: String,
    pub working_directory: PathBuf,
    /// Startup command typed into the tab's shell, if any.
    pub command: Option<String>,
}

impl TabSpec {
    pub fn new(name: impl Into<String>, working_directory: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            working_directory: working_directory.into(),
            command: None,
        }
    }

    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }
}

/// Decides whether a session's foreground job is a bare interactive shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdlePolicy {
    shells: Vec<String>,
}

impl IdlePolicy {
    pub fn new<I, S>(shells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            shells: shells.into_iter().map(Into::into).collect(),
        }
    }

    pub fn shells(&self) -> &[String] {
        &self.shells
    }

    /// An unknown job counts as idle.
    pub fn is_idle(&self, job_name: Option<&str>) -> bool {
        let Some(raw) = job_name.map(str::trim).filter(|name| !name.is_empty()) else {
            return true;
        };
        let name = normalize_job_name(raw);
        self.shells.iter().any(|shell| shell == name)
    }
}

impl Default for IdlePolicy {
    fn default() -> Self {
        Self::new(["zsh", "bash", "sh", "fish"])
    }
}

/// Strip login-shell dashes and path prefixes (`-zsh`, `/bin/zsh`).
fn normalize_job_name(raw: &str) -> &str {
    let raw = raw.strip_prefix('-').unwrap_or(raw);
    Path::new(raw)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(raw)
}
