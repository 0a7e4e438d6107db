//! Shared types for pipeline core logic.
//!
//! These types define stable contracts between the executor, the stage
//! runners and the on-disk checkpoint records.

use std::path::PathBuf;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::core::registry::StageKind;

/// Flat mapping of named settings, used for configs, stage I/O and global state.
pub type ConfigMap = Map<String, Value>;

/// Output keys ending in this suffix name a required artifact on disk.
pub const FILE_KEY_SUFFIX: &str = "_file";

/// Suffix appended to the run prefix for the final merged-state record.
pub const FINAL_CONFIG_SUFFIX: &str = "_final.outcfg";

/// Extension of the per-stage input record.
pub const INPUT_RECORD_EXT: &str = "incfg";

/// Extension of the per-stage output record.
pub const OUTPUT_RECORD_EXT: &str = "outcfg";

/// How a stage's output entered the global state during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StageOutcome {
    /// The stage runner was invoked and its output record written.
    Executed,
    /// The output record of a previous run was verified and read back.
    Resumed,
}

/// One stage touched during a run, in execution order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageReport {
    pub name: String,
    pub kind: StageKind,
    pub outcome: StageOutcome,
}

/// Result of a completed pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionReport {
    /// Name of the pipeline that was run.
    pub pipeline: String,
    /// Stages touched before the run finished, in definition order.
    pub stages: Vec<StageReport>,
    /// Global state after merging every touched stage's output.
    pub global_state: ConfigMap,
    /// Location of the final merged-state record.
    pub final_record: PathBuf,
}

impl ExecutionReport {
    /// Names of stages whose runner was invoked.
    pub fn executed(&self) -> Vec<&str> {
        self.stages_with(StageOutcome::Executed)
    }

    /// Names of stages recovered from their output records.
    pub fn resumed(&self) -> Vec<&str> {
        self.stages_with(StageOutcome::Resumed)
    }

    fn stages_with(&self, outcome: StageOutcome) -> Vec<&str> {
        self.stages
            .iter()
            .filter(|stage| stage.outcome == outcome)
            .map(|stage| stage.name.as_str())
            .collect()
    }
}
