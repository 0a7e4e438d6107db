//! Deterministic, pure logic shared by the pipeline executor.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! configuration mappings and return deterministic outputs suitable for tests.

pub mod artifacts;
pub mod overlay;
pub mod paths;
pub mod registry;
pub mod request;
pub mod types;
