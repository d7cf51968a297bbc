//! XML configuration support.
//! - Loads settings from config.xml (quick_xml + serde).
//! - Writes a commented template on request (`init-config`).
//!
//! Unknown elements are rejected so typos surface instead of being ignored.

use anyhow::{Context, Result, anyhow, bail};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use super::paths::{config_path, default_log_path, path_has_symlink_ancestor};
use super::types::{Config, LogLevel};
use super::CONFIG_ENV;
use crate::platform::{set_dir_mode_0700, write_config_secure_new_0600};
use crate::tree::ConflictPolicy;

/// Mirror of the XML document.
#[derive(Debug, Default, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    log_level: Option<String>,
    log_file: Option<String>,
    safe_mode: Option<bool>,
    copy_attributes: Option<bool>,
    on_conflict: Option<String>,
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

fn xml_to_config(parsed: XmlConfig) -> Result<Config> {
    let mut cfg = Config::default();

    if let Some(s) = non_empty(parsed.log_level.as_deref()) {
        cfg.log_level = s.parse::<LogLevel>().map_err(|e| anyhow!(e))?;
    }
    if let Some(s) = non_empty(parsed.log_file.as_deref()) {
        cfg.log_file = Some(PathBuf::from(s));
    }
    if let Some(s) = non_empty(parsed.on_conflict.as_deref()) {
        cfg.on_conflict = s.parse::<ConflictPolicy>().map_err(|e| anyhow!(e))?;
    }
    if let Some(b) = parsed.safe_mode {
        cfg.safe_mode = b;
    }
    if let Some(b) = parsed.copy_attributes {
        cfg.copy_attributes = b;
    }
    Ok(cfg)
}

/// Load a Config from a specific XML file.
pub fn load_config_from_xml_path(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path).with_context(|| format!("read config xml '{}'", path.display()))?;
    let parsed: XmlConfig =
        from_xml_str(&contents).with_context(|| format!("parse config xml '{}'", path.display()))?;
    xml_to_config(parsed).with_context(|| format!("invalid value in config xml '{}'", path.display()))
}

/// Load the effective config.
///
/// - `$SAFE_TREE_CONFIG` set: that file must exist and parse.
/// - Otherwise the default location is read if present; a missing file
///   means defaults.
pub fn load_config() -> Result<Config> {
    let explicit = env::var_os(CONFIG_ENV).is_some_and(|v| !v.is_empty());
    let Some(path) = config_path() else {
        return Ok(Config::default());
    };
    if !path.exists() {
        if explicit {
            bail!("{CONFIG_ENV} points to '{}', which does not exist", path.display());
        }
        return Ok(Config::default());
    }
    load_config_from_xml_path(&path)
}

/// Write a commented template config to `path` (0600, parent 0700 on Unix).
/// Refuses to overwrite an existing file or to write through a symlinked
/// ancestor.
pub fn create_template_config(path: &Path) -> Result<()> {
    if path_has_symlink_ancestor(path)? {
        bail!("Refusing to create config: ancestor of {} is a symlink", path.display());
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create config dir '{}'", parent.display()))?;
        let _ = set_dir_mode_0700(parent);
    }

    let suggested_log = default_log_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "/path/to/safe_tree.log".into());

    let content = format!(
        "<!--\n  safe_tree configuration (XML)\n\n  log_level        -> quiet | normal | info | debug\n  log_file         -> path to a log file (optional; remove the element to log to stdout only)\n  safe_mode        -> true/false: back up before delete/move and restore on failure\n  copy_attributes  -> true/false: preserve timestamps and permissions when copying\n  on_conflict      -> fail | skip | replace: what copy does when the destination exists\n\n  CLI flags override these values.\n-->\n<config>\n  <log_level>normal</log_level>\n  <!-- <log_file>{suggested_log}</log_file> -->\n  <safe_mode>true</safe_mode>\n  <copy_attributes>true</copy_attributes>\n  <on_conflict>replace</on_conflict>\n</config>\n"
    );

    write_config_secure_new_0600(path, content.as_bytes())?;
    info!(path = %path.display(), "created template config");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn template_round_trips_to_defaults() {
        let td = tempdir().unwrap();
        let path = td.path().join("nested/config.xml");
        create_template_config(&path).unwrap();
        let cfg = load_config_from_xml_path(&path).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(create_template_config(&path).is_err());
    }

    #[test]
    fn values_are_applied() {
        let td = tempdir().unwrap();
        let path = td.path().join("config.xml");
        fs::write(
            &path,
            "<config><log_level>debug</log_level><safe_mode>false</safe_mode><on_conflict>skip</on_conflict><log_file> /tmp/x.log </log_file></config>",
        )
        .unwrap();
        let cfg = load_config_from_xml_path(&path).unwrap();
        assert_eq!(cfg.log_level, LogLevel::Debug);
        assert!(!cfg.safe_mode);
        assert!(cfg.copy_attributes);
        assert_eq!(cfg.on_conflict, ConflictPolicy::Skip);
        assert_eq!(cfg.log_file, Some(PathBuf::from("/tmp/x.log")));
    }

    #[test]
    fn unknown_element_is_rejected() {
        let td = tempdir().unwrap();
        let path = td.path().join("config.xml");
        fs::write(&path, "<config><colour>blue</colour></config>").unwrap();
        assert!(load_config_from_xml_path(&path).is_err());
    }

    #[test]
    fn bad_policy_is_rejected() {
        let td = tempdir().unwrap();
        let path = td.path().join("config.xml");
        fs::write(&path, "<config><on_conflict>merge</on_conflict></config>").unwrap();
        let err = load_config_from_xml_path(&path).unwrap_err();
        assert!(format!("{err:#}").contains("invalid conflict policy"));
    }
}
