//! Prompt-wait primitive: text meant for the shell is only injected once the
//! session sits at an editable prompt.

use tracing::debug;

use crate::error::ReconcileError;
use crate::host::{PromptEvent, PromptState, SessionId, TerminalHost};

use super::deadline::Deadline;

const READY_EVENTS: [PromptEvent; 2] = [PromptEvent::Prompt, PromptEvent::CommandEnd];

/// Suspend until `session` is at an editable prompt or the deadline passes.
pub async fn await_prompt<H>(
    host: &H,
    session: &SessionId,
    deadline: &Deadline,
) -> Result<(), ReconcileError>
where
    H: TerminalHost + ?Sized,
{
    deadline.check()?;
    match host.last_prompt(session).await {
        Ok(Some(PromptState::Editing)) => return Ok(()),
        Ok(state) => debug!(%session, ?state, "session not at an editable prompt"),
        Err(err) => debug!(%session, error = %err, "prompt state unavailable"),
    }

    let event = deadline
        .run(async {
            host.wait_for_prompt(session, &READY_EVENTS)
                .await
                .map_err(ReconcileError::from)
        })
        .await?;
    debug!(%session, ?event, "prompt ready");
    Ok(())
}

/// Wait for a prompt, then type `command` followed by a newline.
pub async fn run_command<H>(
    host: &H,
    session: &SessionId,
    command: &str,
    deadline: &Deadline,
) -> Result<(), ReconcileError>
where
    H: TerminalHost + ?Sized,
{
    await_prompt(host, session, deadline).await?;
    host.send_text(session, &format!("{command}\n")).await?;
    Ok(())
}
