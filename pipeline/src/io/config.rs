//! Configuration and checkpoint record files.
//!
//! Hand-written pipeline configs may be TOML (`.toml`) or JSON. Checkpoint
//! records (`.incfg`, `.outcfg`) are always written as pretty JSON so that
//! every value a stage can return (nested mappings, lists, `null`) survives a
//! write/read round trip unchanged.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::core::types::ConfigMap;

/// Read a configuration mapping from disk.
pub fn read_config_file(path: &Path) -> Result<ConfigMap> {
    debug!(path = %path.display(), "reading config");
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let config: ConfigMap = if is_toml(path) {
        toml::from_str(&contents).with_context(|| format!("parse toml {}", path.display()))?
    } else {
        serde_json::from_str(&contents).with_context(|| format!("parse json {}", path.display()))?
    };
    debug!(keys = config.len(), "config loaded");
    Ok(config)
}

/// Atomically write a configuration mapping as pretty JSON (temp file + rename).
pub fn write_config_file(path: &Path, config: &ConfigMap) -> Result<()> {
    debug!(path = %path.display(), keys = config.len(), "writing config");
    let mut buf = serde_json::to_string_pretty(config).context("serialize config json")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn is_toml(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("toml"))
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("config path missing parent {}", path.display()))?;
    if !parent.as_os_str().is_empty() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    let mut tmp_name = path
        .file_name()
        .with_context(|| format!("config path missing file name {}", path.display()))?
        .to_owned();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}
