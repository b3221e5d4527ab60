//! Default configuration constants.

/// Embedded default `termspace.toml` written by `termspace init`.
pub(super) const DEFAULT_TERMSPACE_CONFIG_TEMPLATE: &str =
    include_str!("../templates/termspace.toml");
/// Config file name looked up locally and under the config root.
pub(super) const CONFIG_FILE_NAME: &str = "termspace.toml";
/// Directory under the config root holding the global config.
pub(super) const CONFIG_DIR_NAME: &str = "termspace";
/// Default whole-run reconciliation budget.
pub(super) const DEFAULT_TIMEOUT_SECS: u64 = 10;
/// Default prompt polling interval for the tmux backend.
pub(super) const DEFAULT_POLL_INTERVAL_MS: u64 = 50;
/// Default window title template.
pub(super) const DEFAULT_WINDOW_TITLE: &str = "{workspace} - #W";

/// Shell names treated as an idle foreground job.
pub(super) fn default_idle_shells() -> Vec<String> {
    ["zsh", "bash", "sh", "fish"]
        .into_iter()
        .map(str::to_string)
        .collect()
}
