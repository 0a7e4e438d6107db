//! Deterministic path construction for a run's checkpoint tree.
//!
//! For a run prefix `/out/run1` and stage `align`:
//!
//! ```text
//! /out/run1/align/run1                 stage prefix
//! /out/run1/align/run1_align.incfg     input record
//! /out/run1/align/run1_align.outcfg    output record
//! /out/run1_final.outcfg               final merged state
//! ```

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::core::types::{FINAL_CONFIG_SUFFIX, INPUT_RECORD_EXT, OUTPUT_RECORD_EXT};

/// Nest `prefix` inside a directory named `dir` below the prefix itself.
///
/// `insert_dir("/out/run1", "align")` yields `/out/run1/align/run1`, so every
/// stage keeps the run's file stem but writes into its own folder.
pub fn insert_dir(prefix: &Path, dir: &str) -> PathBuf {
    let stem = prefix.file_name().unwrap_or_default();
    prefix.join(dir).join(stem)
}

/// Append `suffix` to the final component of `prefix` without a separator.
pub fn append_suffix(prefix: &Path, suffix: &str) -> PathBuf {
    let mut raw: OsString = prefix.as_os_str().to_owned();
    raw.push(suffix);
    PathBuf::from(raw)
}

/// Location of the final merged-state record for a run.
pub fn final_record(prefix: &Path) -> PathBuf {
    append_suffix(prefix, FINAL_CONFIG_SUFFIX)
}

/// Resolved paths for a single stage of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagePaths {
    /// Output prefix handed to the stage runner.
    pub prefix: PathBuf,
    pub input_record: PathBuf,
    pub output_record: PathBuf,
}

impl StagePaths {
    pub fn new(run_prefix: &Path, stage: &str) -> Self {
        let prefix = insert_dir(run_prefix, stage);
        Self {
            input_record: append_suffix(&prefix, &format!("_{stage}.{INPUT_RECORD_EXT}")),
            output_record: append_suffix(&prefix, &format!("_{stage}.{OUTPUT_RECORD_EXT}")),
            prefix,
        }
    }

    /// Stage prefix rendered for inclusion in a stage input.
    pub fn prefix_string(&self) -> String {
        self.prefix.to_string_lossy().into_owned()
    }
}
