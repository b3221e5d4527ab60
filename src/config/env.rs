//! Environment overrides applied after the config file is parsed.

use crate::error::ConfigError;

use super::Config;

pub(super) fn apply_runtime_env_overrides<FEnv>(
    config: &mut Config,
    env_lookup: &FEnv,
) -> Result<(), ConfigError>
where
    FEnv: Fn(&str) -> Option<String>,
{
    if let Some(timeout) = env_lookup("TERMSPACE_TIMEOUT_SECS") {
        let parsed = timeout.trim().parse::<u64>().map_err(|_| {
            ConfigError::Invalid(format!(
                "invalid TERMSPACE_TIMEOUT_SECS value `{timeout}`: expected whole seconds"
            ))
        })?;
        // Zero would make every run time out immediately.
        config.settings.timeout_secs = parsed.max(1);
    }
    if let Some(socket) = env_lookup("TERMSPACE_TMUX_SOCKET") {
        let socket = socket.trim();
        config.tmux.socket = (!socket.is_empty()).then(|| socket.to_string());
    }
    Ok(())
}
