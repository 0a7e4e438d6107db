//! Stage runner abstraction.
//!
//! The [`StageRunner`] trait decouples pipeline orchestration from the
//! computation each stage performs. Production runs use
//! [`CommandStageRunner`], which hands each stage to an external program;
//! tests use scripted runners that return predetermined outputs.

use std::process::Command;

use anyhow::{Context, Result, anyhow};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::core::registry::{StageDescriptor, StageKind};
use crate::core::types::ConfigMap;
use crate::error::PipelineError;
use crate::io::process::run_command;

/// Runs the computation behind a stage.
///
/// Implementations receive the full layered stage input and return the stage
/// output. Given identical input they must produce identical output, and any
/// output naming a required artifact must use a key ending in `_file`.
pub trait StageRunner {
    fn run(&self, stage: &StageDescriptor, input: &ConfigMap) -> Result<ConfigMap>;
}

/// Runner that executes one external program per stage kind.
///
/// The program for kind `k` is read from the stage input key `<k>_command`
/// (usually set in the `tools` section), either as a single program name or
/// as a list of program and arguments. The stage input is written to the
/// program's stdin as JSON; its stdout must be a JSON object.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandStageRunner;

impl StageRunner for CommandStageRunner {
    #[instrument(skip_all, fields(stage = stage.name, kind = %stage.kind))]
    fn run(&self, stage: &StageDescriptor, input: &ConfigMap) -> Result<ConfigMap> {
        let argv = stage_command(stage.kind, input)?;
        info!(program = %argv[0], "starting stage program");

        let mut cmd = Command::new(&argv[0]);
        cmd.args(&argv[1..]);
        let payload = serde_json::to_vec_pretty(input).context("serialize stage input")?;
        let output = run_command(cmd, Some(&payload))
            .with_context(|| format!("run program for stage '{}'", stage.name))?;

        if !output.status.success() {
            warn!(exit_code = ?output.status.code(), "stage program failed");
            return Err(anyhow!(
                "program for stage '{}' failed with status {:?}",
                stage.name,
                output.status.code()
            ));
        }

        let outcfg: ConfigMap = serde_json::from_slice(&output.stdout).with_context(|| {
            format!(
                "parse output of stage '{}' (expected a JSON object on stdout)",
                stage.name
            )
        })?;
        debug!(keys = outcfg.len(), "stage program completed");
        Ok(outcfg)
    }
}

/// Key under which the program for `kind` is configured.
pub fn command_key(kind: StageKind) -> String {
    format!("{kind}_command")
}

fn stage_command(kind: StageKind, input: &ConfigMap) -> Result<Vec<String>, PipelineError> {
    let key = command_key(kind);
    let argv = match input.get(&key) {
        None | Some(Value::Null) => {
            return Err(PipelineError::MissingParameter(format!(
                "no program configured for {kind} stages (set '{key}' in the tools section)"
            )));
        }
        Some(Value::String(program)) => vec![program.clone()],
        Some(Value::Array(parts)) => parts
            .iter()
            .map(|part| part.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| {
                PipelineError::InvalidParameter(format!("'{key}' must contain only strings"))
            })?,
        Some(other) => {
            return Err(PipelineError::InvalidParameter(format!(
                "'{key}' must be a program name or a list of arguments, got {other}"
            )));
        }
    };
    if argv.first().is_none_or(|program| program.trim().is_empty()) {
        return Err(PipelineError::InvalidParameter(format!(
            "'{key}' must name a program"
        )));
    }
    Ok(argv)
}
