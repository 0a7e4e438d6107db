//! Resumable multi-stage pipeline runner.
//!
//! Reads a pipeline configuration file, runs the requested stages (resuming
//! the rest from their checkpoints under the run prefix) and prints the final
//! merged state as JSON.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use pipeline::execute::execute_config_file;
use pipeline::exit_codes;
use pipeline::io::stage::CommandStageRunner;
use pipeline::logging;

#[derive(Parser)]
#[command(
    name = "pipeline",
    version,
    about = "Run a resumable multi-stage pipeline from a configuration file"
)]
struct Cli {
    /// Pipeline configuration file (`.toml` or JSON).
    config: PathBuf,
}

fn main() {
    logging::init();
    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        eprintln!("{:#}", err);
        std::process::exit(exit_codes::for_error(&err));
    }
}

fn run(cli: &Cli) -> Result<()> {
    let report = execute_config_file(&cli.config, &CommandStageRunner)?;
    let rendered =
        serde_json::to_string_pretty(&report.global_state).context("render final state")?;
    println!("{rendered}");
    Ok(())
}
