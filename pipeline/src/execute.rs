//! Orchestration for a full pipeline run.
//!
//! Each stage in the resolved definition is either executed fresh (when the
//! caller requested it) or resumed from its output record. A stage counts as
//! completed purely by the presence of a valid output record, so a failed run
//! can be picked up later by requesting only the stages that remain.
//!
//! The executor assumes exclusive ownership of the run prefix. Two runs
//! sharing a prefix at the same time interleave their records unpredictably.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info, instrument, warn};

use crate::core::artifacts::declared_artifacts;
use crate::core::overlay::{StageInputLayers, apply_key_prefix, merge_state, stage_input};
use crate::core::paths::{StagePaths, final_record};
use crate::core::registry::StageDescriptor;
use crate::core::request::ExecutionRequest;
use crate::core::types::{ConfigMap, ExecutionReport, StageOutcome, StageReport};
use crate::io::config::{read_config_file, write_config_file};
use crate::io::resources::{create_prefix_folders, verify_resources};
use crate::io::stage::StageRunner;

/// Execute a pipeline configuration.
///
/// Stops early once every requested stage has run; stages after that point
/// are never touched. The final merged state is written to
/// `<prefix>_final.outcfg` only when the loop finishes without error.
#[instrument(skip_all)]
pub fn execute<R: StageRunner>(config: &ConfigMap, runner: &R) -> Result<ExecutionReport> {
    let request = ExecutionRequest::from_config(config)?;
    let pipeline = request.pipeline;
    let prefix = PathBuf::from(&request.prefix);
    info!(
        pipeline = pipeline.name,
        prefix = %prefix.display(),
        requested = ?request.requested,
        "starting pipeline"
    );

    create_prefix_folders(&prefix)?;

    let unknown = request.unknown_stages();
    if !unknown.is_empty() {
        warn!(
            pipeline = pipeline.name,
            stages = ?unknown,
            "requested stages are not part of the pipeline and will not run"
        );
    }

    let mut global_state = request.global.clone();
    let mut remaining = request.requested.len();
    let mut stages = Vec::new();

    for descriptor in pipeline.stages {
        if remaining == 0 {
            debug!(stage = descriptor.name, "all requested stages ran, stopping early");
            break;
        }

        let settings = request.stage_settings(descriptor.name)?;
        let paths = StagePaths::new(&prefix, descriptor.name);
        create_prefix_folders(&paths.prefix)?;

        let (output, outcome) = if request.is_requested(descriptor.name) {
            let layers = StageInputLayers {
                tools: &request.tools,
                databases: &request.databases,
                stage: &settings,
                global: &global_state,
            };
            let output = run_stage(runner, descriptor, layers, &paths)?;
            remaining -= 1;
            (output, StageOutcome::Executed)
        } else {
            (resume_stage(descriptor, &paths)?, StageOutcome::Resumed)
        };

        global_state = merge_state(&global_state, &output);
        stages.push(StageReport {
            name: descriptor.name.to_string(),
            kind: descriptor.kind,
            outcome,
        });
    }

    let final_path = final_record(&prefix);
    write_config_file(&final_path, &global_state).context("write final state")?;
    let summary = serde_json::to_string(&stages).context("render stage summary")?;
    info!(
        pipeline = pipeline.name,
        stages = %summary,
        final_record = %final_path.display(),
        "pipeline finished"
    );

    Ok(ExecutionReport {
        pipeline: pipeline.name.to_string(),
        stages,
        global_state,
        final_record: final_path,
    })
}

/// Read a configuration file and execute it.
pub fn execute_config_file<R: StageRunner>(path: &Path, runner: &R) -> Result<ExecutionReport> {
    verify_resources("config file does not exist or is empty", &[path])?;
    let config = read_config_file(path)?;
    execute(&config, runner)
}

#[instrument(skip_all, fields(stage = descriptor.name, kind = %descriptor.kind))]
fn run_stage<R: StageRunner>(
    runner: &R,
    descriptor: &StageDescriptor,
    layers: StageInputLayers<'_>,
    paths: &StagePaths,
) -> Result<ConfigMap> {
    let input = stage_input(layers, &paths.prefix_string());
    write_config_file(&paths.input_record, &input)
        .with_context(|| format!("write input record for stage '{}'", descriptor.name))?;

    info!("running stage");
    let output = runner
        .run(descriptor, &input)
        .with_context(|| format!("stage '{}' failed", descriptor.name))?;
    let output = apply_key_prefix(output, descriptor.key_prefix);

    write_config_file(&paths.output_record, &output)
        .with_context(|| format!("write output record for stage '{}'", descriptor.name))?;
    debug!(keys = output.len(), "stage output recorded");
    Ok(output)
}

#[instrument(skip_all, fields(stage = descriptor.name))]
fn resume_stage(descriptor: &StageDescriptor, paths: &StagePaths) -> Result<ConfigMap> {
    verify_resources(
        &format!(
            "trying to skip stage '{}', but its output configuration does not exist; \
             the stage must have been run before it can be skipped",
            descriptor.name
        ),
        &[&paths.output_record],
    )?;

    // Records are written already prefixed, so no key prefix is applied here.
    let output = read_config_file(&paths.output_record)
        .with_context(|| format!("read output record for stage '{}'", descriptor.name))?;

    let artifacts = declared_artifacts(descriptor.name, &output)?;
    verify_resources(
        &format!("output files from stage '{}' missing", descriptor.name),
        &artifacts,
    )?;
    info!(artifacts = artifacts.len(), "resumed stage from output record");
    Ok(output)
}
