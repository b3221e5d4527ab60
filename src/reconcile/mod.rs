//! Workspace reconciliation engine.
//!
//! Each run re-observes the host, locates the window that best matches the
//! workspace, and converges its tabs toward the declared list. Identity lives
//! on the live tabs as variables stamped at creation, so repeated runs reuse
//! what earlier runs built instead of duplicating it.
//!
//! The whole run is bounded by one [`Deadline`]. When it expires the run fails
//! with [`ReconcileError::Timeout`]; tabs already created stay in place and are
//! matched on the next invocation.

use tokio::time::Duration;
use tracing::{info, warn};

use crate::error::ReconcileError;
use crate::host::TerminalHost;

pub mod deadline;
pub mod locate;
pub mod prompt;
pub mod tabs;
pub mod types;

pub use deadline::Deadline;
pub use locate::{locate_window, LocatedWindow};
pub use tabs::{TabOutcome, TabReconciler, TabReport, WorkspaceReport};
pub use types::{IdlePolicy, TabSpec};

/// Default run-wide budget.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Knobs for one reconciliation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileOptions {
    pub timeout: Duration,
    pub idle: IdlePolicy,
    /// Window title template; `{workspace}` is replaced with the workspace id.
    pub window_title: String,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            idle: IdlePolicy::default(),
            window_title: "{workspace}".to_string(),
        }
    }
}

impl ReconcileOptions {
    pub fn window_title_for(&self, workspace: &str) -> String {
        self.window_title.replace("{workspace}", workspace)
    }
}

/// Locate, reconcile, then retitle and raise the workspace window.
pub async fn open_workspace<H>(
    host: &H,
    workspace: &str,
    tabs: &[TabSpec],
    options: &ReconcileOptions,
) -> Result<WorkspaceReport, ReconcileError>
where
    H: TerminalHost + ?Sized,
{
    let deadline = Deadline::after(options.timeout);
    deadline
        .run(async {
            let located = locate_window(host, workspace).await?;
            match &located {
                Some(found) => info!(
                    workspace,
                    window = %found.window,
                    matching_tabs = found.matching_tabs,
                    "reusing window"
                ),
                None => info!(workspace, "no window found; one will be created"),
            }

            let report = TabReconciler::new(host, workspace, options, &deadline)
                .reconcile(located.map(|found| found.window), tabs)
                .await?;

            host.set_window_title(&report.window, &options.window_title_for(workspace))
                .await?;
            if let Err(err) = host.activate_window(&report.window).await {
                warn!(window = %report.window, error = %err, "could not activate window");
            }
            Ok(report)
        })
        .await
}
