//! Error types for config loading, host transport, and reconciliation.

use std::fmt;
use std::time::Duration;

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Errors when loading or parsing configuration.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Toml(toml::de::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Toml(e) => write!(f, "toml: {e}"),
            Self::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        Self::Toml(e)
    }
}

// ---------------------------------------------------------------------------
// HostError
// ---------------------------------------------------------------------------

/// Errors raised while talking to the terminal host application.
#[derive(Debug)]
pub enum HostError {
    /// The host control program could not be started.
    Spawn(String),
    /// The host rejected a request.
    Command(String),
    /// The host answered with output we could not interpret.
    Parse(String),
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spawn(msg) => write!(f, "spawn failed: {msg}"),
            Self::Command(msg) => write!(f, "host command failed: {msg}"),
            Self::Parse(msg) => write!(f, "unexpected host output: {msg}"),
        }
    }
}

impl std::error::Error for HostError {}

// ---------------------------------------------------------------------------
// ReconcileError
// ---------------------------------------------------------------------------

/// Failures that escape a reconciliation run.
#[derive(Debug)]
pub enum ReconcileError {
    /// The run-wide deadline elapsed. Safe to re-invoke.
    Timeout(Duration),
    /// A mutation request against the host failed.
    Host(HostError),
    /// No tabs were declared and no window exists to reuse.
    EmptyWorkspace(String),
}

impl ReconcileError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

impl fmt::Display for ReconcileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout(budget) => write!(
                f,
                "operation timed out after {}s waiting for the terminal",
                budget.as_secs_f64()
            ),
            Self::Host(e) => write!(f, "host: {e}"),
            Self::EmptyWorkspace(id) => write!(
                f,
                "workspace `{id}` declares no tabs and has no open window"
            ),
        }
    }
}

impl std::error::Error for ReconcileError {}

impl From<HostError> for ReconcileError {
    fn from(e: HostError) -> Self {
        Self::Host(e)
    }
}
