//! Discovery of artifact paths declared in stage outputs.

use serde_json::Value;

use crate::core::types::{ConfigMap, FILE_KEY_SUFFIX};
use crate::error::PipelineError;

/// Collect the paths of every required artifact declared in `output`.
///
/// An artifact is any key ending in `_file`. A `null` value declares that the
/// stage produced no such artifact and is skipped. Any other non-string value
/// is rejected because it cannot name a path.
pub fn declared_artifacts(stage: &str, output: &ConfigMap) -> Result<Vec<String>, PipelineError> {
    let mut paths = Vec::new();
    for (key, value) in output {
        if !key.ends_with(FILE_KEY_SUFFIX) {
            continue;
        }
        match value {
            Value::String(path) => paths.push(path.clone()),
            Value::Null => {}
            other => {
                return Err(PipelineError::InvalidParameter(format!(
                    "output '{key}' of stage '{stage}' must be a path, got {other}"
                )));
            }
        }
    }
    Ok(paths)
}
