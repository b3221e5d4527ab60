//! Configuration loading from TOML files and environment variables.
//!
//! Config is loaded in this order of precedence (highest wins):
//! 1. Environment variables (`TERMSPACE_TIMEOUT_SECS`, `TERMSPACE_TMUX_SOCKET`)
//! 2. TOML file specified via --config CLI flag
//! 3. ./termspace.toml in the current directory
//! 4. $XDG_CONFIG_HOME/termspace/termspace.toml (or ~/.config/termspace/termspace.toml)
//! 5. Built-in defaults

mod defaults;
mod env;
mod init;
mod loader;
mod sources;
mod types;

pub use init::{config_root_dir, global_config_path, write_default_config};
pub use loader::load_config;
pub use sources::ConfigSource;
pub use types::{
    Config, InitOutcome, LoadedConfig, Settings, TabConfig, TmuxConfig, WorkspaceConfig,
};
