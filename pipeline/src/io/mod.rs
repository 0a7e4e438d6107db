//! I/O helpers for pipeline runs.

pub mod config;
pub mod process;
pub mod resources;
pub mod stage;
