//! Filesystem checks and folder creation for run prefixes.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::error::PipelineError;

/// Create the folder a path prefix lives in (idempotent).
///
/// For `/out/run1/align/run1` this creates `/out/run1/align/`.
pub fn create_prefix_folders(prefix: &Path) -> Result<()> {
    let Some(parent) = prefix.parent() else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    debug!(dir = %parent.display(), "creating prefix folders");
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))
}

/// True when `path` exists and, if it is a file, is not empty.
pub fn is_valid_resource(path: &Path) -> bool {
    fs::metadata(path).is_ok_and(|meta| meta.is_dir() || meta.len() > 0)
}

/// Fail with `MissingResource` if any of `paths` is missing or empty.
pub fn verify_resources<P: AsRef<Path>>(message: &str, paths: &[P]) -> Result<(), PipelineError> {
    let missing: Vec<String> = paths
        .iter()
        .map(|path| path.as_ref())
        .filter(|path| !is_valid_resource(path))
        .map(|path| path.display().to_string())
        .collect();
    if missing.is_empty() {
        return Ok(());
    }
    Err(PipelineError::MissingResource(format!(
        "{message} (missing or empty: {})",
        missing.join(", ")
    )))
}
