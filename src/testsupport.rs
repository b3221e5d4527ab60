//! Shared test fixtures for config and reconciliation test modules.
//!
//! `FakeHost` is an in-memory terminal host that records every mutation and
//! prompt wait, so tests can assert exact operation order per session.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;

use crate::error::HostError;
use crate::host::{
    PromptEvent, PromptState, SessionId, TabId, TabProfile, TerminalHost, WindowId,
    TAB_NAME_TAG_VAR, WORKSPACE_TAG_VAR,
};

static TEST_DIR_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Temporary directory fixture with best-effort cleanup.
#[derive(Debug)]
pub struct TestTempDir {
    path: PathBuf,
}

impl TestTempDir {
    /// Create a unique temporary directory with a readable prefix.
    pub fn new(prefix: &str) -> Self {
        let suffix = TEST_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        let dir = std::env::temp_dir().join(format!("termspace-{prefix}-{millis}-{suffix}"));
        fs::create_dir_all(&dir).expect("failed to create temporary fixture directory");
        Self { path: dir }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write UTF-8 text to a child path, creating parent directories as needed.
    pub fn write_text(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.path.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create parent directories for fixture");
        }
        fs::write(&path, content).expect("failed to write fixture file");
        path
    }
}

impl Drop for TestTempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

/// One recorded host request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostOp {
    CreateWindow {
        profile: TabProfile,
    },
    CreateTab {
        window: WindowId,
        index: usize,
        profile: TabProfile,
    },
    SetVariable {
        tab: TabId,
        name: String,
        value: String,
    },
    SetTabTitle { tab: TabId, title: String },
    Interrupt { session: SessionId },
    WaitPrompt { session: SessionId },
    SendText { session: SessionId, text: String },
    SetWindowTitle { window: WindowId, title: String },
    Activate { window: WindowId },
}

impl HostOp {
    fn session(&self) -> Option<&SessionId> {
        match self {
            Self::Interrupt { session }
            | Self::WaitPrompt { session }
            | Self::SendText { session, .. } => Some(session),
            _ => None,
        }
    }
}

/// Scripted state for one fake session.
#[derive(Debug, Clone, Default)]
pub struct FakeSession {
    pub path: Option<String>,
    pub job: Option<String>,
    pub prompt: Option<PromptState>,
    /// `wait_for_prompt` never resolves.
    pub prompt_hangs: bool,
    pub fail_job_read: bool,
}

impl FakeSession {
    /// Session sitting at a shell prompt in `path`.
    pub fn idle(path: &str) -> Self {
        Self {
            path: Some(path.to_string()),
            job: Some("zsh".to_string()),
            ..Self::default()
        }
    }

    /// Session running `job` in the foreground.
    pub fn running(path: &str, job: &str) -> Self {
        Self {
            path: Some(path.to_string()),
            job: Some(job.to_string()),
            prompt: Some(PromptState::Running),
            ..Self::default()
        }
    }
}

#[derive(Debug)]
struct FakeTab {
    session: SessionId,
    vars: BTreeMap<String, String>,
    title: Option<String>,
    fail_reads: bool,
}

#[derive(Debug)]
struct FakeWindow {
    id: WindowId,
    tabs: Vec<TabId>,
    title: Option<String>,
}

#[derive(Debug, Default)]
struct FakeState {
    windows: Vec<FakeWindow>,
    tabs: BTreeMap<TabId, FakeTab>,
    sessions: BTreeMap<SessionId, FakeSession>,
    ops: Vec<HostOp>,
    next_id: u64,
    new_sessions_hang: bool,
    list_tabs_calls: usize,
    failing_list_tabs_calls: BTreeSet<usize>,
}

impl FakeState {
    fn next(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}{}", self.next_id)
    }

    fn window_mut(&mut self, id: &WindowId) -> Result<&mut FakeWindow, HostError> {
        self.windows
            .iter_mut()
            .find(|window| &window.id == id)
            .ok_or_else(|| HostError::Command(format!("no such window: {id}")))
    }

    fn tab(&self, id: &TabId) -> Result<&FakeTab, HostError> {
        self.tabs
            .get(id)
            .ok_or_else(|| HostError::Command(format!("no such tab: {id}")))
    }

    fn session(&self, id: &SessionId) -> Result<&FakeSession, HostError> {
        self.sessions
            .get(id)
            .ok_or_else(|| HostError::Command(format!("no such session: {id}")))
    }

    fn spawn_tab(&mut self, session: FakeSession) -> TabId {
        let tab = TabId(self.next("@"));
        let session_id = SessionId(self.next("%"));
        self.sessions.insert(session_id.clone(), session);
        self.tabs.insert(
            tab.clone(),
            FakeTab {
                session: session_id,
                vars: BTreeMap::new(),
                title: None,
                fail_reads: false,
            },
        );
        tab
    }

    fn fresh_session(&self, profile: &TabProfile) -> FakeSession {
        FakeSession {
            path: Some(profile.working_directory.display().to_string()),
            job: None,
            prompt: None,
            prompt_hangs: self.new_sessions_hang,
            fail_job_read: false,
        }
    }
}

/// In-memory terminal host for engine tests.
#[derive(Debug, Default)]
pub struct FakeHost {
    state: Mutex<FakeState>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().expect("fake host state poisoned")
    }

    pub fn add_window(&self) -> WindowId {
        let mut state = self.lock();
        let id = WindowId(state.next("$"));
        state.windows.push(FakeWindow {
            id: id.clone(),
            tabs: Vec::new(),
            title: None,
        });
        id
    }

    /// Append a tab; `tags` is `(workspace, tab name)` as stamped by a previous run.
    pub fn add_tab(
        &self,
        window: &WindowId,
        tags: Option<(&str, &str)>,
        session: FakeSession,
    ) -> TabId {
        let mut state = self.lock();
        let tab = state.spawn_tab(session);
        if let Some((workspace, name)) = tags {
            let entry = state.tabs.get_mut(&tab).expect("tab just created");
            entry
                .vars
                .insert(WORKSPACE_TAG_VAR.to_string(), workspace.to_string());
            entry
                .vars
                .insert(TAB_NAME_TAG_VAR.to_string(), name.to_string());
        }
        state
            .window_mut(window)
            .expect("window registered")
            .tabs
            .push(tab.clone());
        tab
    }

    pub fn fail_reads_on(&self, tab: &TabId) {
        if let Some(entry) = self.lock().tabs.get_mut(tab) {
            entry.fail_reads = true;
        }
    }

    /// Make the given `list_tabs` calls fail, counted from 1 across all windows.
    pub fn fail_list_tabs_calls(&self, calls: &[usize]) {
        self.lock().failing_list_tabs_calls.extend(calls.iter().copied());
    }

    /// Every session created from now on never reaches a prompt.
    pub fn hang_new_sessions(&self) {
        self.lock().new_sessions_hang = true;
    }

    pub fn ops(&self) -> Vec<HostOp> {
        self.lock().ops.clone()
    }

    pub fn clear_ops(&self) {
        self.lock().ops.clear();
    }

    /// Recorded interrupt/wait/send operations targeting one session.
    pub fn session_ops(&self, session: &SessionId) -> Vec<HostOp> {
        self.lock()
            .ops
            .iter()
            .filter(|op| op.session() == Some(session))
            .cloned()
            .collect()
    }

    pub fn windows(&self) -> Vec<WindowId> {
        self.lock().windows.iter().map(|w| w.id.clone()).collect()
    }

    pub fn tabs_of(&self, window: &WindowId) -> Vec<TabId> {
        self.lock()
            .windows
            .iter()
            .find(|w| &w.id == window)
            .map(|w| w.tabs.clone())
            .unwrap_or_default()
    }

    pub fn session_of(&self, tab: &TabId) -> SessionId {
        self.lock().tabs[tab].session.clone()
    }

    pub fn variable(&self, tab: &TabId, name: &str) -> Option<String> {
        self.lock().tabs[tab].vars.get(name).cloned()
    }

    /// Tab-name tags of a window's tabs, in display order.
    pub fn tab_names(&self, window: &WindowId) -> Vec<Option<String>> {
        self.tabs_of(window)
            .iter()
            .map(|tab| self.variable(tab, TAB_NAME_TAG_VAR))
            .collect()
    }

    pub fn tab_title(&self, tab: &TabId) -> Option<String> {
        self.lock().tabs[tab].title.clone()
    }

    pub fn window_title(&self, window: &WindowId) -> Option<String> {
        self.lock()
            .windows
            .iter()
            .find(|w| &w.id == window)
            .and_then(|w| w.title.clone())
    }
}

#[async_trait]
impl TerminalHost for FakeHost {
    async fn list_windows(&self) -> Result<Vec<WindowId>, HostError> {
        Ok(self.windows())
    }

    async fn list_tabs(&self, window: &WindowId) -> Result<Vec<TabId>, HostError> {
        let mut state = self.lock();
        state.list_tabs_calls += 1;
        if state.failing_list_tabs_calls.contains(&state.list_tabs_calls) {
            return Err(HostError::Command(format!("cannot list tabs of {window}")));
        }
        Ok(state.window_mut(window)?.tabs.clone())
    }

    async fn tab_variable(&self, tab: &TabId, name: &str) -> Result<Option<String>, HostError> {
        let state = self.lock();
        let entry = state.tab(tab)?;
        if entry.fail_reads {
            return Err(HostError::Command(format!("tab {tab} is not ready")));
        }
        Ok(entry.vars.get(name).cloned())
    }

    async fn set_tab_variable(
        &self,
        tab: &TabId,
        name: &str,
        value: &str,
    ) -> Result<(), HostError> {
        let mut state = self.lock();
        state
            .tabs
            .get_mut(tab)
            .ok_or_else(|| HostError::Command(format!("no such tab: {tab}")))?
            .vars
            .insert(name.to_string(), value.to_string());
        state.ops.push(HostOp::SetVariable {
            tab: tab.clone(),
            name: name.to_string(),
            value: value.to_string(),
        });
        Ok(())
    }

    async fn current_session(&self, tab: &TabId) -> Result<SessionId, HostError> {
        Ok(self.lock().tab(tab)?.session.clone())
    }

    async fn session_path(&self, session: &SessionId) -> Result<Option<String>, HostError> {
        Ok(self.lock().session(session)?.path.clone())
    }

    async fn session_job_name(&self, session: &SessionId) -> Result<Option<String>, HostError> {
        let state = self.lock();
        let entry = state.session(session)?;
        if entry.fail_job_read {
            return Err(HostError::Command(format!("session {session} vanished")));
        }
        Ok(entry.job.clone())
    }

    async fn send_text(&self, session: &SessionId, text: &str) -> Result<(), HostError> {
        let mut state = self.lock();
        state.session(session)?;
        state.ops.push(HostOp::SendText {
            session: session.clone(),
            text: text.to_string(),
        });
        Ok(())
    }

    async fn send_interrupt(&self, session: &SessionId) -> Result<(), HostError> {
        let mut state = self.lock();
        state.session(session)?;
        state.ops.push(HostOp::Interrupt {
            session: session.clone(),
        });
        Ok(())
    }

    async fn create_window(&self, profile: &TabProfile) -> Result<(WindowId, TabId), HostError> {
        let mut state = self.lock();
        let window = WindowId(state.next("$"));
        let session = state.fresh_session(profile);
        let tab = state.spawn_tab(session);
        state.windows.push(FakeWindow {
            id: window.clone(),
            tabs: vec![tab.clone()],
            title: profile.custom_window_title.clone(),
        });
        state.ops.push(HostOp::CreateWindow {
            profile: profile.clone(),
        });
        Ok((window, tab))
    }

    async fn create_tab(
        &self,
        window: &WindowId,
        index: usize,
        profile: &TabProfile,
    ) -> Result<TabId, HostError> {
        let mut state = self.lock();
        state.window_mut(window)?;
        let session = state.fresh_session(profile);
        let tab = state.spawn_tab(session);
        let entry = state.window_mut(window)?;
        let at = index.min(entry.tabs.len());
        entry.tabs.insert(at, tab.clone());
        state.ops.push(HostOp::CreateTab {
            window: window.clone(),
            index,
            profile: profile.clone(),
        });
        Ok(tab)
    }

    async fn set_tab_title(&self, tab: &TabId, title: &str) -> Result<(), HostError> {
        let mut state = self.lock();
        state
            .tabs
            .get_mut(tab)
            .ok_or_else(|| HostError::Command(format!("no such tab: {tab}")))?
            .title = Some(title.to_string());
        state.ops.push(HostOp::SetTabTitle {
            tab: tab.clone(),
            title: title.to_string(),
        });
        Ok(())
    }

    async fn set_window_title(&self, window: &WindowId, title: &str) -> Result<(), HostError> {
        let mut state = self.lock();
        state.window_mut(window)?.title = Some(title.to_string());
        state.ops.push(HostOp::SetWindowTitle {
            window: window.clone(),
            title: title.to_string(),
        });
        Ok(())
    }

    async fn activate_window(&self, window: &WindowId) -> Result<(), HostError> {
        let mut state = self.lock();
        state.window_mut(window)?;
        state.ops.push(HostOp::Activate {
            window: window.clone(),
        });
        Ok(())
    }

    async fn last_prompt(&self, session: &SessionId) -> Result<Option<PromptState>, HostError> {
        Ok(self.lock().session(session)?.prompt)
    }

    async fn wait_for_prompt(
        &self,
        session: &SessionId,
        _modes: &[PromptEvent],
    ) -> Result<PromptEvent, HostError> {
        let hangs = {
            let mut state = self.lock();
            let hangs = state.session(session)?.prompt_hangs;
            state.ops.push(HostOp::WaitPrompt {
                session: session.clone(),
            });
            hangs
        };
        if hangs {
            std::future::pending::<()>().await;
        }
        Ok(PromptEvent::Prompt)
    }
}
