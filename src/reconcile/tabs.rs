//! Tab reconciler: drive each declared tab to create, reuse, or skip.

use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::ReconcileError;
use crate::host::{
    SessionId, TabId, TabProfile, TerminalHost, WindowId, TAB_NAME_TAG_VAR, WORKSPACE_TAG_VAR,
};

use super::deadline::Deadline;
use super::prompt::{await_prompt, run_command};
use super::types::TabSpec;
use super::ReconcileOptions;

/// What happened to one declared tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabOutcome {
    /// A new tab was created and stamped.
    Created,
    /// An idle matching tab was reset and its command re-issued.
    Reused,
    /// A matching tab was running something other than its shell.
    SkippedBusy,
    /// The name was already declared earlier in the same list.
    SkippedDuplicate,
}

impl TabOutcome {
    pub fn label(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Reused => "reused",
            Self::SkippedBusy => "busy, left untouched",
            Self::SkippedDuplicate => "duplicate name, skipped",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabReport {
    pub name: String,
    pub tab: Option<TabId>,
    pub outcome: TabOutcome,
}

/// Result of one pass: the window now holding the workspace and per-tab outcomes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceReport {
    pub window: WindowId,
    pub tabs: Vec<TabReport>,
}

/// Existing tab plus the name it was stamped with, if readable.
struct SnapshotTab {
    tab: TabId,
    name: Option<String>,
}

pub struct TabReconciler<'a, H: TerminalHost + ?Sized> {
    host: &'a H,
    workspace: &'a str,
    options: &'a ReconcileOptions,
    deadline: &'a Deadline,
}

impl<'a, H: TerminalHost + ?Sized> TabReconciler<'a, H> {
    pub fn new(
        host: &'a H,
        workspace: &'a str,
        options: &'a ReconcileOptions,
        deadline: &'a Deadline,
    ) -> Self {
        Self {
            host,
            workspace,
            options,
            deadline,
        }
    }

    /// Bring `window` (or a new window) in line with `tabs`, in declared order.
    ///
    /// Matching runs against the tabs that existed when the pass began; tabs
    /// created during the pass are never matched.
    pub async fn reconcile(
        &self,
        window: Option<WindowId>,
        tabs: &[TabSpec],
    ) -> Result<WorkspaceReport, ReconcileError> {
        let snapshot = match &window {
            Some(window) => self.snapshot(window).await,
            None => Vec::new(),
        };
        let mut window = window;
        let mut seen = HashSet::new();
        let mut reports = Vec::with_capacity(tabs.len());

        for (index, spec) in tabs.iter().enumerate() {
            if !seen.insert(spec.name.as_str()) {
                warn!(
                    workspace = self.workspace,
                    tab = %spec.name,
                    "duplicate tab name; keeping first declaration"
                );
                reports.push(TabReport {
                    name: spec.name.clone(),
                    tab: None,
                    outcome: TabOutcome::SkippedDuplicate,
                });
                continue;
            }

            let existing = snapshot
                .iter()
                .find(|entry| entry.name.as_deref() == Some(spec.name.as_str()))
                .map(|entry| entry.tab.clone());

            let (tab, outcome) = match existing {
                Some(tab) => {
                    let outcome = if self.reuse(&tab, spec).await? {
                        TabOutcome::Reused
                    } else {
                        TabOutcome::SkippedBusy
                    };
                    (tab, outcome)
                }
                None => (
                    self.create(&mut window, index, spec).await?,
                    TabOutcome::Created,
                ),
            };
            info!(
                workspace = self.workspace,
                tab = %spec.name,
                outcome = outcome.label(),
                "tab reconciled"
            );
            reports.push(TabReport {
                name: spec.name.clone(),
                tab: Some(tab),
                outcome,
            });
        }

        let window =
            window.ok_or_else(|| ReconcileError::EmptyWorkspace(self.workspace.to_string()))?;
        Ok(WorkspaceReport {
            window,
            tabs: reports,
        })
    }

    /// Existing tabs of `window` with their name tags.
    ///
    /// Listing is retried once; if it still fails the window is treated as
    /// holding no matching tabs.
    async fn snapshot(&self, window: &WindowId) -> Vec<SnapshotTab> {
        let tabs = match self.host.list_tabs(window).await {
            Ok(tabs) => tabs,
            Err(first) => {
                debug!(%window, error = %first, "listing tabs failed; retrying once");
                match self.host.list_tabs(window).await {
                    Ok(tabs) => tabs,
                    Err(err) => {
                        warn!(%window, error = %err, "cannot list tabs; treating none as matching");
                        return Vec::new();
                    }
                }
            }
        };

        let mut snapshot = Vec::with_capacity(tabs.len());
        for tab in tabs {
            let name = match self.host.tab_variable(&tab, TAB_NAME_TAG_VAR).await {
                Ok(name) => name,
                Err(err) => {
                    debug!(%tab, error = %err, "tab name unreadable; treating as unmanaged");
                    None
                }
            };
            snapshot.push(SnapshotTab { tab, name });
        }
        snapshot
    }

    fn profile_for(&self, spec: &TabSpec) -> TabProfile {
        TabProfile {
            name: self.workspace.to_string(),
            working_directory: spec.working_directory.clone(),
            custom_window_title: Some(self.options.window_title_for(self.workspace)),
            allow_title_setting: false,
        }
    }

    async fn create(
        &self,
        window: &mut Option<WindowId>,
        index: usize,
        spec: &TabSpec,
    ) -> Result<TabId, ReconcileError> {
        let profile = self.profile_for(spec);
        let tab = match window.as_ref() {
            Some(existing) => self.host.create_tab(existing, index, &profile).await?,
            None => {
                let (created, tab) = self.host.create_window(&profile).await?;
                info!(workspace = self.workspace, window = %created, "created window");
                *window = Some(created);
                tab
            }
        };

        // Identity stamp; written once here and never touched again.
        self.host
            .set_tab_variable(&tab, TAB_NAME_TAG_VAR, &spec.name)
            .await?;
        self.host
            .set_tab_variable(&tab, WORKSPACE_TAG_VAR, self.workspace)
            .await?;
        self.host.set_tab_title(&tab, &spec.name).await?;

        let session = self.host.current_session(&tab).await?;
        await_prompt(self.host, &session, self.deadline).await?;
        if let Some(command) = &spec.command {
            self.host
                .send_text(&session, &format!("{command}\n"))
                .await?;
        }
        Ok(tab)
    }

    /// Reset an idle matching tab. Returns `false` when the tab was left alone.
    async fn reuse(&self, tab: &TabId, spec: &TabSpec) -> Result<bool, ReconcileError> {
        let session = match self.host.current_session(tab).await {
            Ok(session) => session,
            Err(err) => {
                warn!(%tab, error = %err, "cannot resolve session; leaving tab untouched");
                return Ok(false);
            }
        };
        let job = match self.host.session_job_name(&session).await {
            Ok(job) => job,
            Err(err) => {
                warn!(%session, error = %err, "cannot read foreground job; leaving tab untouched");
                return Ok(false);
            }
        };
        if !self.options.idle.is_idle(job.as_deref()) {
            info!(
                tab = %spec.name,
                job = job.as_deref().unwrap_or_default(),
                "tab busy; skipping"
            );
            return Ok(false);
        }

        self.host.send_interrupt(&session).await?;
        if !self.in_directory(&session, &spec.working_directory).await {
            let target = shell_quote(&spec.working_directory.display().to_string());
            run_command(self.host, &session, &format!("cd {target}"), self.deadline).await?;
        }
        run_command(self.host, &session, "clear", self.deadline).await?;
        if let Some(command) = &spec.command {
            run_command(self.host, &session, command, self.deadline).await?;
        }
        Ok(true)
    }

    async fn in_directory(&self, session: &SessionId, target: &Path) -> bool {
        match self.host.session_path(session).await {
            Ok(Some(current)) => Path::new(&current) == target,
            Ok(None) => false,
            Err(err) => {
                debug!(%session, error = %err, "working directory unreadable");
                false
            }
        }
    }
}

/// Quote a path for the shell only when it needs it.
fn shell_quote(s: &str) -> String {
    let plain = !s.is_empty()
        && s.chars().all(|c| {
            c.is_ascii_alphanumeric() || matches!(c, '/' | '.' | '_' | '-' | '+' | ',' | ':' | '@')
        });
    if plain {
        s.to_string()
    } else {
        format!("'{}'", s.replace('\'', "'\\''"))
    }
}
