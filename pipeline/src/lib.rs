//! Resumable multi-stage pipeline executor.
//!
//! A pipeline is a fixed, ordered list of named stages. Running it drives each
//! requested stage to completion, checkpoints its input and output to disk,
//! and merges its output into a global state threaded through later stages.
//! Stages not requested are resumed from their checkpoints, so a later run
//! can pick up where an earlier one stopped. The architecture enforces a
//! strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (registry, config validation,
//!   layered merges, path construction). No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting operations (config records, filesystem checks,
//!   stage programs). Isolated behind the [`io::stage::StageRunner`] seam so
//!   tests can script stage outputs.
//!
//! [`execute`] coordinates core logic with I/O to implement a run.

pub mod core;
pub mod error;
pub mod execute;
pub mod exit_codes;
pub mod io;
pub mod logging;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
