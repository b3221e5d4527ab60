//! CLI entry point for termspace.

mod cli;

use clap::Parser;
use serde_json::{json, Value};
use tokio::time::Duration;
use tracing_subscriber::EnvFilter;

use termspace::config::{load_config, write_default_config, InitOutcome, LoadedConfig};
use termspace::host::tmux::TmuxHost;
use termspace::reconcile::{locate_window, open_workspace, LocatedWindow};
use termspace::render::Renderer;

const LOG_ENV_VAR: &str = "TERMSPACE_LOG";

#[tokio::main]
async fn main() {
    let args = cli::Args::parse();
    init_tracing(args.verbose);

    let renderer = Renderer::new(!args.no_color);
    let result = match args.command {
        cli::Command::Init { force } => run_init(&renderer, force),
        command => match load_config(args.config.as_deref()) {
            Ok(loaded) => run_command(&renderer, &loaded, command).await,
            Err(e) => Err(format!("failed to load config: {e}")),
        },
    };

    if let Err(msg) = result {
        renderer.error(&msg);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn tmux_host(loaded: &LoadedConfig) -> TmuxHost {
    let config = &loaded.config;
    TmuxHost::new(config.tmux.socket.clone())
        .with_poll_interval(config.poll_interval())
        .with_idle_policy(config.idle_policy())
}

async fn run_command(
    renderer: &Renderer,
    loaded: &LoadedConfig,
    command: cli::Command,
) -> Result<(), String> {
    tracing::debug!(source = %loaded.source, "config loaded");
    match command {
        cli::Command::Open { workspace, timeout } => {
            run_open(renderer, loaded, &workspace, timeout).await
        }
        cli::Command::Locate { workspace, json } => {
            run_locate(renderer, loaded, &workspace, json).await
        }
        cli::Command::List { json } => run_list(renderer, loaded, json),
        cli::Command::Init { force } => run_init(renderer, force),
    }
}

async fn run_open(
    renderer: &Renderer,
    loaded: &LoadedConfig,
    workspace: &str,
    timeout: Option<u64>,
) -> Result<(), String> {
    let tabs = loaded
        .config
        .tab_specs(workspace)
        .ok_or_else(|| {
            format!(
                "workspace `{workspace}` is not declared in {}",
                loaded.source
            )
        })?;
    let mut options = loaded.config.reconcile_options();
    if let Some(secs) = timeout {
        options.timeout = Duration::from_secs(secs.max(1));
    }

    let host = tmux_host(loaded);
    let report = open_workspace(&host, workspace, &tabs, &options)
        .await
        .map_err(|e| e.to_string())?;

    renderer.section(&format!("workspace {workspace}"));
    renderer.field("window", report.window.as_str());
    renderer.tab_reports(&report.tabs);
    if let Some(hint) = host.attach_hint(&report.window) {
        renderer.field("attach", &hint);
    }
    Ok(())
}

async fn run_locate(
    renderer: &Renderer,
    loaded: &LoadedConfig,
    workspace: &str,
    json: bool,
) -> Result<(), String> {
    let host = tmux_host(loaded);
    let located = locate_window(&host, workspace)
        .await
        .map_err(|e| e.to_string())?;

    if json {
        print_json(&locate_json(workspace, located.as_ref()))?;
        return Ok(());
    }
    match located {
        Some(found) => {
            renderer.section(&format!("workspace {workspace}"));
            renderer.field("window", found.window.as_str());
            renderer.field("matching tabs", &found.matching_tabs.to_string());
        }
        None => renderer.activity(&format!("no window holds workspace `{workspace}`")),
    }
    Ok(())
}

fn locate_json(workspace: &str, located: Option<&LocatedWindow>) -> Value {
    json!({
        "workspace": workspace,
        "window": located.map(|found| found.window.as_str()),
        "matching_tabs": located.map_or(0, |found| found.matching_tabs),
    })
}

fn run_list(renderer: &Renderer, loaded: &LoadedConfig, json: bool) -> Result<(), String> {
    let workspaces = &loaded.config.workspaces;
    if json {
        let value = serde_json::to_value(workspaces).map_err(|e| e.to_string())?;
        return print_json(&value);
    }
    if workspaces.is_empty() {
        renderer.warn(&format!("no workspaces declared in {}", loaded.source));
        return Ok(());
    }
    for (id, declared) in workspaces {
        renderer.section(id);
        for tab in &declared.tabs {
            let value = match &tab.command {
                Some(command) => format!("{} $ {command}", tab.cwd),
                None => tab.cwd.clone(),
            };
            renderer.field(&tab.name, &value);
        }
    }
    Ok(())
}

fn run_init(renderer: &Renderer, force: bool) -> Result<(), String> {
    let outcome = write_default_config(force).map_err(|e| e.to_string())?;
    match outcome {
        InitOutcome::Created { path } => {
            renderer.activity(&format!("wrote {}", path.display()));
        }
        InitOutcome::Unchanged { path } => {
            renderer.warn(&format!(
                "{} already exists; pass --force to overwrite it",
                path.display()
            ));
        }
        InitOutcome::Replaced { path, backup } => {
            renderer.activity(&format!("wrote {}", path.display()));
            renderer.field("backup", &backup.display().to_string());
        }
    }
    Ok(())
}

fn print_json(value: &Value) -> Result<(), String> {
    let text = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    println!("{text}");
    Ok(())
}
