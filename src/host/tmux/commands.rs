//! tmux argument builders and output parsers.
//!
//! Kept free of I/O so the mapping from host operations to tmux invocations
//! can be tested without a server.

use crate::error::HostError;
use crate::host::{PromptState, TabId, WindowId};
use crate::reconcile::IdlePolicy;

/// Window-scoped user option backing a tab variable.
pub(super) fn option_name(variable: &str) -> String {
    format!("@termspace_{variable}")
}

fn args(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|part| part.to_string()).collect()
}

pub(super) fn list_sessions_args() -> Vec<String> {
    args(&["list-sessions", "-F", "#{session_id}"])
}

pub(super) fn list_windows_args(session: &WindowId) -> Vec<String> {
    args(&["list-windows", "-t", session.as_str(), "-F", "#{window_id}"])
}

pub(super) fn display_args(target: &str, format: &str) -> Vec<String> {
    args(&["display-message", "-p", "-t", target, format])
}

pub(super) fn show_option_args(tab: &TabId, variable: &str) -> Vec<String> {
    let option = option_name(variable);
    args(&[
        "show-options",
        "-w",
        "-v",
        "-q",
        "-t",
        tab.as_str(),
        option.as_str(),
    ])
}

pub(super) fn set_option_args(tab: &TabId, variable: &str, value: &str) -> Vec<String> {
    let option = option_name(variable);
    args(&[
        "set-option",
        "-w",
        "-q",
        "-t",
        tab.as_str(),
        option.as_str(),
        value,
    ])
}

pub(super) fn new_session_args(directory: &str, name: Option<&str>) -> Vec<String> {
    let mut out = args(&[
        "new-session",
        "-d",
        "-P",
        "-F",
        "#{session_id}\t#{window_id}",
        "-c",
        directory,
    ]);
    if let Some(name) = name {
        out.extend(args(&["-s", name]));
    }
    out
}

/// tmux session name for a window opened for `workspace`.
///
/// tmux rejects `:` and `.` in session names, so they become `_`.
pub(super) fn session_name(workspace: &str) -> Option<String> {
    let name: String = workspace
        .trim()
        .chars()
        .map(|c| if matches!(c, ':' | '.') { '_' } else { c })
        .collect();
    (!name.is_empty()).then_some(name)
}

/// Shell command that attaches a terminal to `window`.
pub(super) fn attach_command(socket: Option<&str>, window: &WindowId) -> String {
    match socket {
        Some(socket) => format!("tmux -L {socket} attach -t '{window}'"),
        None => format!("tmux attach -t '{window}'"),
    }
}

/// Insert before the tab currently at `index`, or append after the last tab.
pub(super) fn new_window_args(
    session: &WindowId,
    existing: &[TabId],
    index: usize,
    directory: &str,
) -> Vec<String> {
    let mut out = args(&["new-window", "-d", "-P", "-F", "#{window_id}"]);
    match (existing.get(index), existing.last()) {
        (Some(anchor), _) => out.extend(args(&["-b", "-t", anchor.as_str()])),
        (None, Some(last)) => out.extend(args(&["-a", "-t", last.as_str()])),
        (None, None) => out.extend(args(&["-t", format!("{session}:").as_str()])),
    }
    out.extend(args(&["-c", directory]));
    out
}

pub(super) fn send_literal_args(pane: &str, text: &str) -> Vec<String> {
    args(&["send-keys", "-l", "-t", pane, text])
}

pub(super) fn send_key_args(pane: &str, key: &str) -> Vec<String> {
    args(&["send-keys", "-t", pane, key])
}

/// Split typed text into literal chunks and Enter presses.
pub(super) fn keystrokes(text: &str) -> Vec<Keystroke<'_>> {
    let mut out = Vec::new();
    for chunk in text.split_inclusive('\n') {
        let (line, enter) = match chunk.strip_suffix('\n') {
            Some(line) => (line, true),
            None => (chunk, false),
        };
        if !line.is_empty() {
            out.push(Keystroke::Literal(line));
        }
        if enter {
            out.push(Keystroke::Enter);
        }
    }
    out
}

#[derive(Debug, PartialEq, Eq)]
pub(super) enum Keystroke<'a> {
    Literal(&'a str),
    Enter,
}

/// Non-empty trimmed lines of tmux list output.
pub(super) fn parse_ids(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

pub(super) fn parse_created_window(stdout: &str) -> Result<(WindowId, TabId), HostError> {
    let line = stdout.trim();
    let (session, window) = line
        .split_once('\t')
        .filter(|(session, window)| !session.is_empty() && !window.is_empty())
        .ok_or_else(|| HostError::Parse(format!("new-session printed `{line}`")))?;
    Ok((WindowId(session.to_string()), TabId(window.to_string())))
}

pub(super) fn parse_created_tab(stdout: &str) -> Result<TabId, HostError> {
    let line = stdout.trim();
    if line.is_empty() {
        return Err(HostError::Parse("new-window printed nothing".into()));
    }
    Ok(TabId(line.to_string()))
}

/// Empty option or format output reads as absent.
pub(super) fn non_empty(stdout: &str) -> Option<String> {
    let value = stdout.trim_end_matches(['\n', '\r']);
    (!value.is_empty()).then(|| value.to_string())
}

/// A pane is at an editable prompt when its shell is in the foreground and
/// the cursor row already shows prompt text.
pub(super) fn prompt_state(
    job: Option<&str>,
    cursor_row: &str,
    idle: &IdlePolicy,
) -> Option<PromptState> {
    if !idle.is_idle(job) {
        return Some(PromptState::Running);
    }
    if cursor_row.trim().is_empty() {
        return None;
    }
    Some(PromptState::Editing)
}
