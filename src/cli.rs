//! CLI argument parsing via clap.

use clap::{ArgAction, Parser, Subcommand};

/// Open declared terminal workspaces, reusing tabs from earlier runs.
#[derive(Debug, Parser)]
#[command(name = "termspace", version = termspace::build_info::CLI_VERSION_TEXT)]
pub struct Args {
    /// Path to config file (default: ./termspace.toml or ~/.config/termspace/termspace.toml).
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<String>,

    /// Increase log verbosity (-v info, -vv debug). TERMSPACE_LOG wins when set.
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Disable color output.
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Open a workspace: find or create its window and reconcile its tabs.
    Open {
        /// Workspace id as declared under `[workspaces.<id>]`.
        workspace: String,
        /// Override the run-wide timeout in seconds.
        #[arg(long = "timeout", value_name = "SECS")]
        timeout: Option<u64>,
    },
    /// Report which window currently holds a workspace, without changing anything.
    Locate {
        workspace: String,
        /// Print the result as JSON on stdout.
        #[arg(long = "json")]
        json: bool,
    },
    /// List declared workspaces and their tabs.
    List {
        /// Print the result as JSON on stdout.
        #[arg(long = "json")]
        json: bool,
    },
    /// Write the default config to ~/.config/termspace/termspace.toml.
    Init {
        /// Overwrite an existing config after backing it up.
        #[arg(long = "force")]
        force: bool,
    },
}
