//! Where the per-user config lives, and `termspace init`.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::ConfigError;

use super::defaults::{CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_TERMSPACE_CONFIG_TEMPLATE};
use super::InitOutcome;

/// `$XDG_CONFIG_HOME`, else `~/.config`, else the platform config dir.
pub fn config_root_dir() -> Option<PathBuf> {
    let xdg = std::env::var("XDG_CONFIG_HOME").unwrap_or_default();
    if !xdg.trim().is_empty() {
        return Some(PathBuf::from(xdg.trim()));
    }
    dirs::home_dir()
        .map(|home| home.join(".config"))
        .or_else(dirs::config_dir)
}

/// `<config root>/termspace/termspace.toml`.
pub fn global_config_path() -> Option<PathBuf> {
    config_root_dir().map(|root| root.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Write the bundled template to the global config path.
///
/// An existing file is kept unless `force` is set, in which case it is first
/// copied next to itself as `termspace.toml.bak-<unix secs>`.
pub fn write_default_config(force: bool) -> Result<InitOutcome, ConfigError> {
    let path = global_config_path()
        .ok_or_else(|| ConfigError::Invalid("no home or config directory found".into()))?;
    write_default_config_at(&path, force)
}

pub(super) fn write_default_config_at(
    path: &Path,
    force: bool,
) -> Result<InitOutcome, ConfigError> {
    let path = path.to_path_buf();
    let backup = match (path.exists(), force) {
        (true, false) => return Ok(InitOutcome::Unchanged { path }),
        (true, true) => {
            let backup = free_backup_path(&path);
            fs::copy(&path, &backup)?;
            Some(backup)
        }
        (false, _) => {
            if let Some(dir) = path.parent() {
                fs::create_dir_all(dir)?;
            }
            None
        }
    };

    fs::write(&path, DEFAULT_TERMSPACE_CONFIG_TEMPLATE)?;
    Ok(match backup {
        Some(backup) => InitOutcome::Replaced { path, backup },
        None => InitOutcome::Created { path },
    })
}

fn free_backup_path(path: &Path) -> PathBuf {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0);
    let base = format!("{}.bak-{secs}", path.display());
    let mut candidate = PathBuf::from(&base);
    let mut n = 1;
    while candidate.exists() {
        candidate = PathBuf::from(format!("{base}-{n}"));
        n += 1;
    }
    candidate
}
