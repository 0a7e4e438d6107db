//! Test-only helpers: scripted stage runners and scratch run directories.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde_json::{Value, json};
use tempfile::TempDir;

use crate::core::paths::{StagePaths, final_record};
use crate::core::registry::{StageDescriptor, resolve};
use crate::core::types::ConfigMap;
use crate::io::config::read_config_file;
use crate::io::stage::StageRunner;

/// Unwrap a JSON object literal into a `ConfigMap`.
pub fn json_map(value: Value) -> ConfigMap {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

/// One invocation observed by a [`ScriptedRunner`].
#[derive(Debug, Clone)]
struct RecordedCall {
    stage: String,
    input: ConfigMap,
}

#[derive(Debug, Clone)]
struct ScriptedArtifact {
    key: String,
    suffix: String,
}

/// Stage runner returning predetermined outputs keyed by stage name.
///
/// Stages without a scripted output return an empty mapping. Artifacts are
/// written next to the stage prefix the executor hands in, and their paths
/// are added to the output under the configured key.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    outputs: HashMap<String, ConfigMap>,
    artifacts: HashMap<String, Vec<ScriptedArtifact>>,
    failures: HashMap<String, String>,
    calls: RefCell<Vec<RecordedCall>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output(mut self, stage: &str, output: Value) -> Self {
        self.outputs.insert(stage.to_string(), json_map(output));
        self
    }

    /// Write `<prefix><suffix>` when `stage` runs and report it under `key`.
    pub fn with_artifact(mut self, stage: &str, key: &str, suffix: &str) -> Self {
        self.artifacts
            .entry(stage.to_string())
            .or_default()
            .push(ScriptedArtifact {
                key: key.to_string(),
                suffix: suffix.to_string(),
            });
        self
    }

    pub fn with_failure(mut self, stage: &str, message: &str) -> Self {
        self.failures.insert(stage.to_string(), message.to_string());
        self
    }

    pub fn called_stages(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .map(|call| call.stage.clone())
            .collect()
    }

    /// Input the runner received for `stage`, if it ran.
    pub fn input_for(&self, stage: &str) -> Option<ConfigMap> {
        self.calls
            .borrow()
            .iter()
            .find(|call| call.stage == stage)
            .map(|call| call.input.clone())
    }
}

impl StageRunner for ScriptedRunner {
    fn run(&self, stage: &StageDescriptor, input: &ConfigMap) -> Result<ConfigMap> {
        self.calls.borrow_mut().push(RecordedCall {
            stage: stage.name.to_string(),
            input: input.clone(),
        });
        if let Some(message) = self.failures.get(stage.name) {
            return Err(anyhow!("{message}"));
        }

        let mut output = self.outputs.get(stage.name).cloned().unwrap_or_default();
        if let Some(artifacts) = self.artifacts.get(stage.name) {
            let prefix = input
                .get("prefix")
                .and_then(Value::as_str)
                .context("stage input missing prefix")?;
            for artifact in artifacts {
                let path = format!("{prefix}{}", artifact.suffix);
                fs::write(&path, format!("{} artifact\n", stage.name))
                    .with_context(|| format!("write artifact {path}"))?;
                output.insert(artifact.key.clone(), Value::String(path));
            }
        }
        Ok(output)
    }
}

/// Scratch directory holding one run prefix (`<tmp>/out/run1`).
pub struct TestRun {
    _temp: TempDir,
    prefix: PathBuf,
}

impl TestRun {
    pub fn new() -> Result<Self> {
        let temp = tempfile::tempdir().context("create tempdir")?;
        let prefix = temp.path().join("out").join("run1");
        Ok(Self {
            _temp: temp,
            prefix,
        })
    }

    pub fn prefix(&self) -> &Path {
        &self.prefix
    }

    pub fn prefix_str(&self) -> String {
        self.prefix.to_string_lossy().into_owned()
    }

    /// Minimal valid config with an empty settings section for every stage.
    pub fn config(&self, pipeline: &str, stages: &[&str]) -> ConfigMap {
        let mut config = json_map(json!({
            "pipeline": pipeline,
            "stages": stages,
            "global": {"prefix": self.prefix_str()},
            "tools": {},
            "databases": {},
        }));
        if let Ok(definition) = resolve(pipeline) {
            for stage in definition.stages {
                config.insert(stage.name.to_string(), json!({}));
            }
        }
        config
    }

    pub fn stage_paths(&self, stage: &str) -> StagePaths {
        StagePaths::new(&self.prefix, stage)
    }

    pub fn final_record(&self) -> PathBuf {
        final_record(&self.prefix)
    }

    pub fn read_final(&self) -> Result<ConfigMap> {
        read_config_file(&self.final_record())
    }
}
