//! Stable exit codes for the pipeline CLI.

use crate::error::PipelineError;

/// Pipeline ran to completion.
pub const OK: i32 = 0;
/// Failure outside the parameter/resource taxonomy (I/O, stage program errors).
pub const FAILURE: i32 = 1;
/// A configuration value was semantically wrong.
pub const INVALID_PARAMETER: i32 = 2;
/// A required configuration key was absent.
pub const MISSING_PARAMETER: i32 = 3;
/// A required file, checkpoint record or artifact was missing or empty.
pub const MISSING_RESOURCE: i32 = 4;

/// Map an error to the exit code the CLI reports for it.
pub fn for_error(err: &anyhow::Error) -> i32 {
    match PipelineError::find(err) {
        Some(PipelineError::InvalidParameter(_)) => INVALID_PARAMETER,
        Some(PipelineError::MissingParameter(_)) => MISSING_PARAMETER,
        Some(PipelineError::MissingResource(_)) => MISSING_RESOURCE,
        None => FAILURE,
    }
}
