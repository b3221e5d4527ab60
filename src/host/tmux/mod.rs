//! tmux-backed terminal host.
//!
//! Mapping: a host window is a tmux session, a tab is a tmux window, and a
//! tab's session is that window's active pane. Tab variables live in
//! window-scoped user options (`@termspace_<name>`), so the identity stamp
//! travels with the tmux window for as long as it exists.

use async_trait::async_trait;
use tokio::time::{sleep, Duration};
use tracing::debug;

use crate::error::HostError;
use crate::host::{PromptEvent, PromptState, SessionId, TabId, TabProfile, TerminalHost, WindowId};
use crate::reconcile::IdlePolicy;

mod commands;
mod process;

use commands::{
    attach_command, display_args, keystrokes, list_sessions_args, list_windows_args,
    new_session_args, new_window_args, non_empty, parse_created_tab, parse_created_window,
    parse_ids, prompt_state, send_key_args, send_literal_args, session_name, set_option_args,
    show_option_args, Keystroke,
};
use process::{ensure_success, is_duplicate_session, is_missing_server, run_tmux};

/// Default interval between prompt-state polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone)]
pub struct TmuxHost {
    socket: Option<String>,
    poll_interval: Duration,
    idle: IdlePolicy,
    inside_tmux: bool,
}

impl TmuxHost {
    /// Talk to the default tmux server, or the one named by `socket` (`tmux -L`).
    pub fn new(socket: Option<String>) -> Self {
        Self {
            socket,
            poll_interval: DEFAULT_POLL_INTERVAL,
            idle: IdlePolicy::default(),
            inside_tmux: std::env::var_os("TMUX").is_some(),
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval.max(Duration::from_millis(1));
        self
    }

    /// Shells that count as an idle foreground job for prompt detection.
    pub fn with_idle_policy(mut self, idle: IdlePolicy) -> Self {
        self.idle = idle;
        self
    }

    pub fn socket(&self) -> Option<&str> {
        self.socket.as_deref()
    }

    /// Command that attaches a terminal to `window`, when this process is not
    /// already running inside tmux.
    pub fn attach_hint(&self, window: &WindowId) -> Option<String> {
        (!self.inside_tmux).then(|| attach_command(self.socket.as_deref(), window))
    }

    async fn tmux(&self, args: Vec<String>, context: &str) -> Result<String, HostError> {
        let output = run_tmux(self.socket.as_deref(), &args).await?;
        ensure_success(output, context).map(|out| out.stdout)
    }

    async fn display(&self, target: &str, format: &str) -> Result<String, HostError> {
        self.tmux(display_args(target, format), "failed to query tmux")
            .await
    }

    async fn set_option(
        &self,
        target: &str,
        scope: &str,
        name: &str,
        value: &str,
    ) -> Result<(), HostError> {
        let args = vec![
            "set-option".to_string(),
            scope.to_string(),
            "-t".to_string(),
            target.to_string(),
            name.to_string(),
            value.to_string(),
        ];
        self.tmux(args, &format!("failed to set tmux option {name}"))
            .await
            .map(|_| ())
    }

    /// Apply the per-tab part of a profile to a freshly created tmux window.
    async fn apply_tab_profile(&self, tab: &TabId, profile: &TabProfile) -> Result<(), HostError> {
        if !profile.allow_title_setting {
            self.set_option(tab.as_str(), "-w", "allow-rename", "off").await?;
            self.set_option(tab.as_str(), "-w", "automatic-rename", "off").await?;
        }
        Ok(())
    }
}

#[async_trait]
impl TerminalHost for TmuxHost {
    async fn list_windows(&self) -> Result<Vec<WindowId>, HostError> {
        let output = run_tmux(self.socket.as_deref(), &list_sessions_args()).await?;
        if is_missing_server(&output) {
            debug!("no tmux server running");
            return Ok(Vec::new());
        }
        let output = ensure_success(output, "failed to list tmux sessions")?;
        Ok(parse_ids(&output.stdout).into_iter().map(WindowId).collect())
    }

    async fn list_tabs(&self, window: &WindowId) -> Result<Vec<TabId>, HostError> {
        let stdout = self
            .tmux(list_windows_args(window), "failed to list tmux windows")
            .await?;
        Ok(parse_ids(&stdout).into_iter().map(TabId).collect())
    }

    async fn tab_variable(&self, tab: &TabId, name: &str) -> Result<Option<String>, HostError> {
        let stdout = self
            .tmux(show_option_args(tab, name), "failed to read tab variable")
            .await?;
        Ok(non_empty(&stdout))
    }

    async fn set_tab_variable(
        &self,
        tab: &TabId,
        name: &str,
        value: &str,
    ) -> Result<(), HostError> {
        self.tmux(
            set_option_args(tab, name, value),
            "failed to write tab variable",
        )
        .await
        .map(|_| ())
    }

    async fn current_session(&self, tab: &TabId) -> Result<SessionId, HostError> {
        let stdout = self.display(tab.as_str(), "#{pane_id}").await?;
        non_empty(&stdout)
            .map(SessionId)
            .ok_or_else(|| HostError::Parse(format!("tab {tab} has no active pane")))
    }

    async fn session_path(&self, session: &SessionId) -> Result<Option<String>, HostError> {
        let stdout = self.display(session.as_str(), "#{pane_current_path}").await?;
        Ok(non_empty(&stdout))
    }

    async fn session_job_name(&self, session: &SessionId) -> Result<Option<String>, HostError> {
        let stdout = self
            .display(session.as_str(), "#{pane_current_command}")
            .await?;
        Ok(non_empty(&stdout))
    }

    async fn send_text(&self, session: &SessionId, text: &str) -> Result<(), HostError> {
        for keystroke in keystrokes(text) {
            let args = match keystroke {
                Keystroke::Literal(chunk) => send_literal_args(session.as_str(), chunk),
                Keystroke::Enter => send_key_args(session.as_str(), "Enter"),
            };
            self.tmux(args, "failed to send keys to tmux pane").await?;
        }
        Ok(())
    }

    async fn send_interrupt(&self, session: &SessionId) -> Result<(), HostError> {
        self.tmux(
            send_key_args(session.as_str(), "C-c"),
            "failed to interrupt tmux pane",
        )
        .await
        .map(|_| ())
    }

    async fn create_window(&self, profile: &TabProfile) -> Result<(WindowId, TabId), HostError> {
        let directory = profile.working_directory.display().to_string();
        let name = session_name(&profile.name);
        let mut output = run_tmux(
            self.socket.as_deref(),
            &new_session_args(&directory, name.as_deref()),
        )
        .await?;
        if name.is_some() && is_duplicate_session(&output) {
            debug!(name = %profile.name, "session name taken; letting tmux pick one");
            let unnamed = new_session_args(&directory, None);
            output = run_tmux(self.socket.as_deref(), &unnamed).await?;
        }
        let output = ensure_success(output, "failed to create tmux session")?;
        let (window, tab) = parse_created_window(&output.stdout)?;
        if let Some(title) = &profile.custom_window_title {
            self.set_window_title(&window, title).await?;
        }
        self.apply_tab_profile(&tab, profile).await?;
        Ok((window, tab))
    }

    async fn create_tab(
        &self,
        window: &WindowId,
        index: usize,
        profile: &TabProfile,
    ) -> Result<TabId, HostError> {
        let existing = self.list_tabs(window).await?;
        let directory = profile.working_directory.display().to_string();
        let stdout = self
            .tmux(
                new_window_args(window, &existing, index, &directory),
                "failed to create tmux window",
            )
            .await?;
        let tab = parse_created_tab(&stdout)?;
        self.apply_tab_profile(&tab, profile).await?;
        Ok(tab)
    }

    async fn set_tab_title(&self, tab: &TabId, title: &str) -> Result<(), HostError> {
        let args = vec![
            "rename-window".to_string(),
            "-t".to_string(),
            tab.to_string(),
            title.to_string(),
        ];
        self.tmux(args, "failed to rename tmux window")
            .await
            .map(|_| ())
    }

    async fn set_window_title(&self, window: &WindowId, title: &str) -> Result<(), HostError> {
        self.set_option(window.as_str(), "-q", "set-titles", "on").await?;
        self.set_option(window.as_str(), "-q", "set-titles-string", title)
            .await
    }

    async fn activate_window(&self, window: &WindowId) -> Result<(), HostError> {
        if !self.inside_tmux {
            debug!(%window, "no tmux client to switch; nothing to activate");
            return Ok(());
        }
        let args = vec![
            "switch-client".to_string(),
            "-t".to_string(),
            window.to_string(),
        ];
        self.tmux(args, "failed to switch tmux client")
            .await
            .map(|_| ())
    }

    async fn last_prompt(&self, session: &SessionId) -> Result<Option<PromptState>, HostError> {
        let target = session.as_str();
        let stdout = self
            .display(target, "#{pane_current_command}\t#{cursor_y}")
            .await?;
        let line = stdout.trim_end_matches(['\n', '\r']);
        let (job, cursor) = line
            .split_once('\t')
            .ok_or_else(|| HostError::Parse(format!("pane state `{line}`")))?;
        let row = cursor.trim().to_string();
        let capture = vec![
            "capture-pane".to_string(),
            "-p".to_string(),
            "-t".to_string(),
            target.to_string(),
            "-S".to_string(),
            row.clone(),
            "-E".to_string(),
            row,
        ];
        let cursor_row = self.tmux(capture, "failed to capture tmux pane").await?;
        let job = (!job.is_empty()).then_some(job);
        Ok(prompt_state(job, &cursor_row, &self.idle))
    }

    async fn wait_for_prompt(
        &self,
        session: &SessionId,
        _modes: &[PromptEvent],
    ) -> Result<PromptEvent, HostError> {
        // tmux has no prompt events; poll until the pane settles at a prompt.
        loop {
            if self.last_prompt(session).await? == Some(PromptState::Editing) {
                return Ok(PromptEvent::Prompt);
            }
            sleep(self.poll_interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host(socket: Option<&str>, inside_tmux: bool) -> TmuxHost {
        TmuxHost {
            inside_tmux,
            ..TmuxHost::new(socket.map(str::to_string))
        }
    }

    #[test]
    fn attach_hint_only_outside_tmux() {
        let window = WindowId::from("$3");
        assert_eq!(
            host(Some("work"), false).attach_hint(&window).as_deref(),
            Some("tmux -L work attach -t '$3'")
        );
        assert_eq!(host(None, true).attach_hint(&window), None);
    }

    #[test]
    fn poll_interval_has_a_floor() {
        let host = TmuxHost::new(None).with_poll_interval(Duration::ZERO);
        assert_eq!(host.poll_interval, Duration::from_millis(1));
    }
}
