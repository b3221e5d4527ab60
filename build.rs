//! Injects commit hash and build time for `termspace --version`.
//!
//! Either value can be pinned from the environment; otherwise git and date are
//! asked, falling back to `unknown` / a unix timestamp.

use std::env;
use std::fs;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

const GIT_HASH_VAR: &str = "TERMSPACE_BUILD_GIT_HASH";
const TIMESTAMP_VAR: &str = "TERMSPACE_BUILD_TIMESTAMP";

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    if let Some(reference) = head_reference() {
        println!("cargo:rerun-if-changed=.git/{reference}");
    }

    for (var, fallback) in [
        (GIT_HASH_VAR, git_short_hash as fn() -> String),
        (TIMESTAMP_VAR, build_timestamp_utc),
    ] {
        println!("cargo:rerun-if-env-changed={var}");
        let value = env::var(var).unwrap_or_else(|_| fallback());
        println!("cargo:rustc-env={var}={value}");
    }
}

/// Branch ref that HEAD points at, if HEAD is symbolic.
fn head_reference() -> Option<String> {
    let head = fs::read_to_string(".git/HEAD").ok()?;
    head.trim().strip_prefix("ref: ").map(str::to_string)
}

fn git_short_hash() -> String {
    stdout_of("git", &["rev-parse", "--short=12", "HEAD"]).unwrap_or_else(|| "unknown".into())
}

fn build_timestamp_utc() -> String {
    stdout_of("date", &["-u", "+%Y-%m-%dT%H:%M:%SZ"]).unwrap_or_else(|| {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|delta| delta.as_secs())
            .unwrap_or(0);
        format!("unix:{secs}")
    })
}

fn stdout_of(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8(output.stdout).ok()?;
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}
