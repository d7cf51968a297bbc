//! Default path helpers and symlink checks.

use dirs::{config_dir, data_dir};
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::{APP_DIR, CONFIG_ENV};

/// OS-appropriate default config path (`<config_dir>/safe_tree/config.xml`).
pub fn default_config_path() -> Option<PathBuf> {
    if let Some(base) = config_dir() {
        Some(base.join(APP_DIR).join("config.xml"))
    } else {
        env::var_os("HOME").map(|h| PathBuf::from(h).join(".config").join(APP_DIR).join("config.xml"))
    }
}

/// Config file in effect: `$SAFE_TREE_CONFIG` if set and non-empty,
/// otherwise the default location.
pub fn config_path() -> Option<PathBuf> {
    match env::var_os(CONFIG_ENV) {
        Some(p) if !p.is_empty() => Some(PathBuf::from(p)),
        _ => default_config_path(),
    }
}

/// OS-appropriate default log file path (`<data_dir>/safe_tree/safe_tree.log`).
pub fn default_log_path() -> Option<PathBuf> {
    if let Some(base) = data_dir() {
        Some(base.join(APP_DIR).join("safe_tree.log"))
    } else {
        env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join(".local")
                .join("share")
                .join(APP_DIR)
                .join("safe_tree.log")
        })
    }
}

/// Return true if any existing ancestor of `path` is a symlink.
pub fn path_has_symlink_ancestor(path: &Path) -> io::Result<bool> {
    let mut p = path.parent();
    while let Some(anc) = p {
        match fs::symlink_metadata(anc) {
            Ok(meta) if meta.file_type().is_symlink() => return Ok(true),
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
        p = anc.parent();
    }
    Ok(false)
}
