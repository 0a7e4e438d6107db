//! Static catalog of supported pipelines.
//!
//! A pipeline is an ordered list of stage descriptors. Order is both the
//! execution order and the dependency chain: a stage may read global state
//! written by any stage before it. The same stage kind may appear more than
//! once, in which case each instance gets its own name (its checkpoint
//! namespace) and a key prefix so their outputs do not shadow each other.

use std::fmt;

use serde::Serialize;

use crate::error::PipelineError;

/// Runner capability referenced by a stage descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StageKind {
    /// Multiple sequence alignment.
    Align,
    /// Evolutionary couplings inference.
    Couplings,
    /// Comparison of couplings against known structures.
    Compare,
    /// Mutation effect prediction.
    Mutate,
    /// Structure prediction from couplings.
    Fold,
    /// Concatenation of two monomer alignments into a complex alignment.
    Concatenate,
}

impl StageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StageKind::Align => "align",
            StageKind::Couplings => "couplings",
            StageKind::Compare => "compare",
            StageKind::Mutate => "mutate",
            StageKind::Fold => "fold",
            StageKind::Concatenate => "concatenate",
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One named stage within a pipeline definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageDescriptor {
    /// Unique within the pipeline; names the config section and checkpoint files.
    pub name: &'static str,
    pub kind: StageKind,
    /// Prepended to every output key before merging into global state.
    pub key_prefix: Option<&'static str>,
}

impl StageDescriptor {
    const fn new(name: &'static str, kind: StageKind) -> Self {
        Self {
            name,
            kind,
            key_prefix: None,
        }
    }

    const fn prefixed(name: &'static str, kind: StageKind, key_prefix: &'static str) -> Self {
        Self {
            name,
            kind,
            key_prefix: Some(key_prefix),
        }
    }
}

/// Named, ordered list of stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineDefinition {
    pub name: &'static str,
    pub stages: &'static [StageDescriptor],
}

impl PipelineDefinition {
    /// Look up a stage of this pipeline by name.
    pub fn stage(&self, name: &str) -> Option<&'static StageDescriptor> {
        self.stages.iter().find(|stage| stage.name == name)
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name).collect()
    }
}

const PROTEIN_MONOMER: &[StageDescriptor] = &[
    StageDescriptor::new("align", StageKind::Align),
    StageDescriptor::new("couplings", StageKind::Couplings),
    StageDescriptor::new("compare", StageKind::Compare),
    StageDescriptor::new("mutate", StageKind::Mutate),
    StageDescriptor::new("fold", StageKind::Fold),
];

// Two alignments are computed independently and joined by `concatenate`.
const PROTEIN_COMPLEX: &[StageDescriptor] = &[
    StageDescriptor::prefixed("align_1", StageKind::Align, "first_"),
    StageDescriptor::prefixed("align_2", StageKind::Align, "second_"),
    StageDescriptor::new("concatenate", StageKind::Concatenate),
    StageDescriptor::new("couplings", StageKind::Couplings),
];

static PIPELINES: &[PipelineDefinition] = &[
    PipelineDefinition {
        name: "protein_monomer",
        stages: PROTEIN_MONOMER,
    },
    PipelineDefinition {
        name: "protein_complex",
        stages: PROTEIN_COMPLEX,
    },
];

/// All registered pipelines, in registration order.
pub fn pipelines() -> &'static [PipelineDefinition] {
    PIPELINES
}

pub fn pipeline_names() -> Vec<&'static str> {
    PIPELINES.iter().map(|pipeline| pipeline.name).collect()
}

/// Resolve a pipeline by name.
///
/// Unknown names fail with `InvalidParameter` listing every valid choice.
pub fn resolve(name: &str) -> Result<&'static PipelineDefinition, PipelineError> {
    PIPELINES
        .iter()
        .find(|pipeline| pipeline.name == name)
        .ok_or_else(|| {
            PipelineError::InvalidParameter(format!(
                "'{name}' is not a valid pipeline selection; valid choices are: {}",
                pipeline_names().join(", ")
            ))
        })
}
