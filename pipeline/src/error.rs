//! Failure taxonomy for pipeline execution.
//!
//! Every variant carries a human-readable message naming the offending key,
//! stage or resource. Callers that need to branch on the kind of failure can
//! recover the variant from an `anyhow::Error` with `downcast_ref`.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// A configuration value is present but semantically wrong.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A structurally required configuration key is absent.
    #[error("missing parameter: {0}")]
    MissingParameter(String),

    /// An expected file, checkpoint record or output artifact is missing or empty.
    #[error("missing resource: {0}")]
    MissingResource(String),
}

impl PipelineError {
    /// Find the first `PipelineError` in an error chain.
    pub fn find(err: &anyhow::Error) -> Option<&PipelineError> {
        err.chain().find_map(|cause| cause.downcast_ref::<PipelineError>())
    }
}
