//! Window locator: find the live window that best matches a workspace.

use tracing::debug;

use crate::error::HostError;
use crate::host::{TerminalHost, WindowId, WORKSPACE_TAG_VAR};

/// A window that carries at least one tab tagged with the workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedWindow {
    pub window: WindowId,
    /// Number of the window's tabs tagged with the workspace.
    pub matching_tabs: usize,
}

/// Return the window with the most tabs tagged `workspace`.
///
/// Ties go to the window enumerated first. A tab or window whose metadata
/// cannot be read counts as "no match" and does not abort the scan. Only a
/// failure to enumerate windows at all is reported.
pub async fn locate_window<H>(
    host: &H,
    workspace: &str,
) -> Result<Option<LocatedWindow>, HostError>
where
    H: TerminalHost + ?Sized,
{
    let mut best: Option<LocatedWindow> = None;
    for window in host.list_windows().await? {
        let matching_tabs = count_matching_tabs(host, &window, workspace).await;
        if matching_tabs == 0 {
            continue;
        }
        debug!(%window, matching_tabs, workspace, "candidate window");
        let better = match &best {
            Some(current) => matching_tabs > current.matching_tabs,
            None => true,
        };
        if better {
            best = Some(LocatedWindow {
                window,
                matching_tabs,
            });
        }
    }
    Ok(best)
}

async fn count_matching_tabs<H>(host: &H, window: &WindowId, workspace: &str) -> usize
where
    H: TerminalHost + ?Sized,
{
    let tabs = match host.list_tabs(window).await {
        Ok(tabs) => tabs,
        Err(err) => {
            debug!(%window, error = %err, "skipping window with unreadable tabs");
            return 0;
        }
    };

    let mut count = 0;
    for tab in &tabs {
        match host.tab_variable(tab, WORKSPACE_TAG_VAR).await {
            Ok(Some(tag)) if tag == workspace => count += 1,
            Ok(_) => {}
            Err(err) => debug!(%tab, error = %err, "treating unreadable tab as unmatched"),
        }
    }
    count
}
