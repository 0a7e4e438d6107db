//! Validation of a top-level pipeline configuration.
//!
//! Turns the raw configuration mapping into an [`ExecutionRequest`] before
//! any side effect happens, so malformed configs fail without touching disk.

use serde_json::Value;

use crate::core::registry::{PipelineDefinition, resolve};
use crate::core::types::ConfigMap;
use crate::error::PipelineError;

/// Top-level keys every pipeline configuration must carry.
pub const REQUIRED_KEYS: [&str; 3] = ["pipeline", "stages", "global"];

/// Fail with `MissingParameter` naming every key of `keys` absent from `config`.
pub fn check_required(config: &ConfigMap, keys: &[&str]) -> Result<(), PipelineError> {
    let missing: Vec<&str> = keys
        .iter()
        .copied()
        .filter(|key| !config.contains_key(*key))
        .collect();
    if missing.is_empty() {
        return Ok(());
    }
    Err(PipelineError::MissingParameter(format!(
        "missing required configuration keys: {}",
        missing.join(", ")
    )))
}

/// A validated view of a pipeline configuration.
#[derive(Debug, Clone)]
pub struct ExecutionRequest<'a> {
    pub pipeline: &'static PipelineDefinition,
    /// Distinct stage names the caller asked to execute, in request order.
    pub requested: Vec<String>,
    /// Seed for the global state.
    pub global: ConfigMap,
    /// Base path for every output of the run.
    pub prefix: String,
    pub tools: ConfigMap,
    pub databases: ConfigMap,
    config: &'a ConfigMap,
}

impl<'a> ExecutionRequest<'a> {
    pub fn from_config(config: &'a ConfigMap) -> Result<Self, PipelineError> {
        check_required(config, &REQUIRED_KEYS)?;

        let pipeline_name = config["pipeline"].as_str().ok_or_else(|| {
            PipelineError::InvalidParameter("'pipeline' must be a pipeline name".to_string())
        })?;
        let pipeline = resolve(pipeline_name)?;
        let requested = requested_stages(&config["stages"])?;

        let global = section(config, "global")?.unwrap_or_default();
        let prefix = match global.get("prefix") {
            None => {
                return Err(PipelineError::MissingParameter(
                    "'global' section must define an output 'prefix'".to_string(),
                ));
            }
            Some(Value::String(prefix)) if !prefix.is_empty() => prefix.clone(),
            Some(other) => {
                return Err(PipelineError::InvalidParameter(format!(
                    "'global.prefix' must be a non-empty path, got {other}"
                )));
            }
        };

        Ok(Self {
            pipeline,
            requested,
            global,
            prefix,
            tools: section(config, "tools")?.unwrap_or_default(),
            databases: section(config, "databases")?.unwrap_or_default(),
            config,
        })
    }

    pub fn is_requested(&self, stage: &str) -> bool {
        self.requested.iter().any(|name| name == stage)
    }

    /// Requested names that are not part of the resolved pipeline.
    ///
    /// These are never executed, but still count toward the number of
    /// stages the executor waits for before stopping early.
    pub fn unknown_stages(&self) -> Vec<&str> {
        self.requested
            .iter()
            .map(String::as_str)
            .filter(|name| self.pipeline.stage(name).is_none())
            .collect()
    }

    /// Stage-specific settings section, required for every stage reached.
    pub fn stage_settings(&self, stage: &str) -> Result<ConfigMap, PipelineError> {
        section(self.config, stage)?.ok_or_else(|| {
            PipelineError::MissingParameter(format!(
                "configuration section for stage '{stage}' is missing"
            ))
        })
    }
}

fn requested_stages(value: &Value) -> Result<Vec<String>, PipelineError> {
    let entries: &[Value] = match value {
        Value::Null => &[],
        Value::Array(entries) => entries,
        other => {
            return Err(PipelineError::InvalidParameter(format!(
                "'stages' must be a list of stage names, got {other}"
            )));
        }
    };
    if entries.is_empty() {
        return Err(PipelineError::InvalidParameter(
            "no stages defined, need at least one".to_string(),
        ));
    }

    let mut requested: Vec<String> = Vec::with_capacity(entries.len());
    for entry in entries {
        let name = entry.as_str().ok_or_else(|| {
            PipelineError::InvalidParameter(format!("stage names must be strings, got {entry}"))
        })?;
        if !requested.iter().any(|seen| seen == name) {
            requested.push(name.to_string());
        }
    }
    Ok(requested)
}

/// Read an optional mapping section. `null` reads as an empty mapping.
fn section(config: &ConfigMap, key: &str) -> Result<Option<ConfigMap>, PipelineError> {
    match config.get(key) {
        None => Ok(None),
        Some(Value::Null) => Ok(Some(ConfigMap::new())),
        Some(Value::Object(map)) => Ok(Some(map.clone())),
        Some(other) => Err(PipelineError::InvalidParameter(format!(
            "'{key}' must be a mapping of settings, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config(value: Value) -> ConfigMap {
        value.as_object().cloned().expect("object")
    }

    fn monomer(stages: Value) -> ConfigMap {
        config(json!({
            "pipeline": "protein_monomer",
            "stages": stages,
            "global": {"prefix": "/out/run1"},
            "align": {},
        }))
    }

    #[test]
    fn check_required_names_every_missing_key() {
        let cfg = config(json!({"pipeline": "protein_monomer"}));
        let err = check_required(&cfg, &REQUIRED_KEYS).expect_err("missing");
        assert_eq!(
            err,
            PipelineError::MissingParameter(
                "missing required configuration keys: stages, global".to_string()
            )
        );
    }

    #[test]
    fn parses_valid_request() {
        let cfg = monomer(json!(["align", "couplings", "align"]));
        let request = ExecutionRequest::from_config(&cfg).expect("request");

        assert_eq!(request.pipeline.name, "protein_monomer");
        assert_eq!(request.requested, vec!["align", "couplings"]);
        assert_eq!(request.prefix, "/out/run1");
        assert!(request.tools.is_empty());
        assert!(request.databases.is_empty());
        assert!(request.is_requested("couplings"));
        assert!(!request.is_requested("fold"));
    }

    #[test]
    fn null_or_empty_stages_are_invalid() {
        for stages in [Value::Null, json!([])] {
            let cfg = monomer(stages);
            let err = ExecutionRequest::from_config(&cfg).expect_err("invalid");
            assert!(matches!(err, PipelineError::InvalidParameter(_)), "{err:?}");
        }
    }

    #[test]
    fn unknown_pipeline_is_invalid() {
        let mut cfg = monomer(json!(["align"]));
        cfg.insert("pipeline".to_string(), json!("rna_monomer"));
        let err = ExecutionRequest::from_config(&cfg).expect_err("invalid");
        assert!(matches!(err, PipelineError::InvalidParameter(ref m) if m.contains("protein_complex")));
    }

    #[test]
    fn missing_global_prefix_is_missing_parameter() {
        let mut cfg = monomer(json!(["align"]));
        cfg.insert("global".to_string(), json!({"cpu": 4}));
        let err = ExecutionRequest::from_config(&cfg).expect_err("missing");
        assert!(matches!(err, PipelineError::MissingParameter(ref m) if m.contains("prefix")));
    }

    #[test]
    fn non_mapping_tools_section_is_invalid() {
        let mut cfg = monomer(json!(["align"]));
        cfg.insert("tools".to_string(), json!(["jackhmmer"]));
        let err = ExecutionRequest::from_config(&cfg).expect_err("invalid");
        assert!(matches!(err, PipelineError::InvalidParameter(ref m) if m.contains("tools")));
    }

    #[test]
    fn unknown_stages_lists_names_outside_pipeline() {
        let cfg = monomer(json!(["align", "concatenate"]));
        let request = ExecutionRequest::from_config(&cfg).expect("request");
        assert_eq!(request.unknown_stages(), vec!["concatenate"]);
    }

    #[test]
    fn stage_settings_requires_section() {
        let cfg = monomer(json!(["align"]));
        let request = ExecutionRequest::from_config(&cfg).expect("request");

        assert!(request.stage_settings("align").expect("align").is_empty());
        let err = request.stage_settings("couplings").expect_err("missing");
        assert!(matches!(err, PipelineError::MissingParameter(ref m) if m.contains("'couplings'")));
    }
}
