//! termspace: open declared terminal workspaces idempotently.
//!
//! A workspace is a named list of tabs (name, directory, optional startup
//! command). Opening it finds the window that already holds the most of its
//! tabs, reuses idle tabs, skips busy ones, and creates whatever is missing.
//! Tabs are recognized across runs by variables stamped on them at creation.
//!
//! # Quick start
//!
//! ```no_run
//! use termspace::config::load_config;
//! use termspace::host::tmux::TmuxHost;
//! use termspace::reconcile::open_workspace;
//!
//! # async fn example() {
//! let loaded = load_config(None).unwrap();
//! let tabs = loaded.config.tab_specs("Development").unwrap();
//! let host = TmuxHost::new(loaded.config.tmux.socket.clone());
//! let options = loaded.config.reconcile_options();
//! let report = open_workspace(&host, "Development", &tabs, &options).await.unwrap();
//! println!("{}", report.window);
//! # }
//! ```

pub mod build_info;
pub mod config;
pub mod error;
pub mod host;
pub mod reconcile;
pub mod render;
#[cfg(test)]
pub mod testsupport;
