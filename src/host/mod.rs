//! Capability surface consumed from the terminal host application.
//!
//! The reconciliation engine never models the host's internal state. It sees
//! windows, tabs, and sessions only as opaque handles and drives them through
//! [`TerminalHost`]. Backends own the transport.

use std::fmt;
use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::HostError;

pub mod tmux;

/// Tab variable holding the workspace id that owns the tab.
pub const WORKSPACE_TAG_VAR: &str = "workspace";
/// Tab variable holding the declared tab name the tab was created for.
pub const TAB_NAME_TAG_VAR: &str = "tab_name";

macro_rules! handle_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

handle_type!(
    /// Opaque handle to a live host window.
    WindowId
);
handle_type!(
    /// Opaque handle to a live tab inside a window.
    TabId
);
handle_type!(
    /// Opaque handle to the foreground session of a tab.
    SessionId
);

/// Per-tab profile applied when the engine creates a window or tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabProfile {
    /// Display name, normally the workspace id.
    pub name: String,
    /// Fixed initial working directory.
    pub working_directory: PathBuf,
    /// Window title template, when the profile pins one.
    pub custom_window_title: Option<String>,
    /// Whether programs running in the tab may retitle it.
    pub allow_title_setting: bool,
}

/// Most recent command-prompt state reported for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptState {
    /// The shell is waiting at an editable prompt.
    Editing,
    /// A command line was submitted and has not finished.
    Running,
}

/// Prompt lifecycle events a caller can wait for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptEvent {
    /// A fresh prompt was drawn.
    Prompt,
    /// The previous command finished.
    CommandEnd,
}

/// Operations the engine needs from a terminal host.
///
/// Every method is a single request against live host state; nothing here is
/// cached between calls.
#[async_trait]
pub trait TerminalHost: Send + Sync {
    /// Enumerate live windows in host order.
    async fn list_windows(&self) -> Result<Vec<WindowId>, HostError>;
    /// Enumerate a window's tabs in display order.
    async fn list_tabs(&self, window: &WindowId) -> Result<Vec<TabId>, HostError>;
    /// Read a named string variable on a tab. Unset reads as `None`.
    async fn tab_variable(&self, tab: &TabId, name: &str) -> Result<Option<String>, HostError>;
    /// Write a named string variable on a tab.
    async fn set_tab_variable(&self, tab: &TabId, name: &str, value: &str)
        -> Result<(), HostError>;
    /// Resolve the tab's active session.
    async fn current_session(&self, tab: &TabId) -> Result<SessionId, HostError>;
    /// Last-known working directory of the session.
    async fn session_path(&self, session: &SessionId) -> Result<Option<String>, HostError>;
    /// Name of the session's foreground job, if known.
    async fn session_job_name(&self, session: &SessionId) -> Result<Option<String>, HostError>;
    /// Inject literal text as if typed. A trailing `\n` submits the line.
    async fn send_text(&self, session: &SessionId, text: &str) -> Result<(), HostError>;
    /// Deliver an interrupt (Ctrl-C) to the session.
    async fn send_interrupt(&self, session: &SessionId) -> Result<(), HostError>;
    /// Create a window seeded with `profile`; returns the window and its current tab.
    async fn create_window(&self, profile: &TabProfile) -> Result<(WindowId, TabId), HostError>;
    /// Create a tab at `index` in `window`.
    async fn create_tab(
        &self,
        window: &WindowId,
        index: usize,
        profile: &TabProfile,
    ) -> Result<TabId, HostError>;
    async fn set_tab_title(&self, tab: &TabId, title: &str) -> Result<(), HostError>;
    async fn set_window_title(&self, window: &WindowId, title: &str) -> Result<(), HostError>;
    /// Bring a window to the foreground.
    async fn activate_window(&self, window: &WindowId) -> Result<(), HostError>;
    /// Most recent prompt state for the session, if the host knows one.
    async fn last_prompt(&self, session: &SessionId) -> Result<Option<PromptState>, HostError>;
    /// Block until one of `modes` is observed on the session.
    ///
    /// This may never resolve; callers bound it with a deadline.
    async fn wait_for_prompt(
        &self,
        session: &SessionId,
        modes: &[PromptEvent],
    ) -> Result<PromptEvent, HostError>;
}
