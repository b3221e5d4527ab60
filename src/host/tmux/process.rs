//! tmux process invocation helpers.

use std::process::Stdio;

use tokio::process::Command;
use tracing::trace;

use crate::error::HostError;

/// Captured result of one tmux invocation.
#[derive(Debug)]
pub(super) struct TmuxOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Spawn `tmux [-L socket] <args>` and wait for it.
pub(super) async fn run_tmux(
    socket: Option<&str>,
    args: &[String],
) -> Result<TmuxOutput, HostError> {
    let mut cmd = Command::new("tmux");
    // Dropped futures (deadline expiry) must not leave tmux clients behind.
    cmd.kill_on_drop(true);
    if let Some(socket) = socket {
        cmd.arg("-L").arg(socket);
    }
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    trace!(?args, "tmux");

    let output = cmd
        .output()
        .await
        .map_err(|e| HostError::Spawn(format!("tmux: {e}")))?;

    Ok(TmuxOutput {
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    })
}

/// Convert non-zero tmux status into contextual host errors.
pub(super) fn ensure_success(output: TmuxOutput, context: &str) -> Result<TmuxOutput, HostError> {
    if output.exit_code == 0 {
        return Ok(output);
    }

    let mut details = if output.stderr.trim().is_empty() {
        output.stdout.trim().to_string()
    } else {
        output.stderr.trim().to_string()
    };
    if details.is_empty() {
        details = format!("tmux exited with {}", output.exit_code);
    }

    Err(HostError::Command(format!("{context}: {details}")))
}

/// Whether a failure only means no tmux server is running yet.
pub(super) fn is_missing_server(output: &TmuxOutput) -> bool {
    let stderr = output.stderr.to_ascii_lowercase();
    output.exit_code != 0
        && (stderr.contains("no server running") || stderr.contains("error connecting to"))
}

/// Whether `new-session -s` failed because the name is already in use.
pub(super) fn is_duplicate_session(output: &TmuxOutput) -> bool {
    output.exit_code != 0 && output.stderr.contains("duplicate session")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(exit_code: i32, stdout: &str, stderr: &str) -> TmuxOutput {
        TmuxOutput {
            exit_code,
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
        }
    }

    #[test]
    fn ensure_success_prefers_stderr_details() {
        let err = ensure_success(
            output(1, "ignored", "can't find window: @7\n"),
            "rename tab",
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "host command failed: rename tab: can't find window: @7"
        );
    }

    #[test]
    fn ensure_success_falls_back_to_exit_code() {
        let err = ensure_success(output(2, "", ""), "list tabs").unwrap_err();
        assert!(err.to_string().ends_with("list tabs: tmux exited with 2"));
    }

    #[test]
    fn missing_server_is_detected() {
        assert!(is_missing_server(&output(1, "", "no server running on /tmp/tmux-501/default")));
        assert!(is_missing_server(&output(
            1,
            "",
            "error connecting to /tmp/tmux-501/work (No such file or directory)"
        )));
        assert!(!is_missing_server(&output(1, "", "unknown command")));
        assert!(!is_missing_server(&output(0, "", "")));
    }

    #[test]
    fn duplicate_session_name_is_detected() {
        assert!(is_duplicate_session(&output(1, "", "duplicate session: Development\n")));
        assert!(!is_duplicate_session(&output(1, "", "no server running")));
        assert!(!is_duplicate_session(&output(0, "$1\t@1\n", "")));
    }
}
