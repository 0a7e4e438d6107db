//! Helpers for running stage programs as child processes.

use std::io::{self, Read, Write};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;

use anyhow::{Context, Result, anyhow};
use tracing::{debug, error, instrument};

/// Captured child process output. Stderr is inherited, not captured.
#[derive(Debug)]
pub struct CommandOutput {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
}

/// Run a command to completion, feeding `stdin` and capturing stdout.
///
/// Stdout is drained on a separate thread while stdin is written so a child
/// that produces output before consuming all of its input cannot deadlock.
/// A child that exits without reading its input is not an error; the result
/// is judged by exit status and stdout alone. There is no timeout: a child
/// that never exits blocks the caller.
#[instrument(skip_all, fields(program = ?cmd.get_program()))]
pub fn run_command(mut cmd: Command, stdin: Option<&[u8]>) -> Result<CommandOutput> {
    if stdin.is_some() {
        cmd.stdin(Stdio::piped());
    } else {
        cmd.stdin(Stdio::null());
    }
    cmd.stdout(Stdio::piped()).stderr(Stdio::inherit());

    debug!("spawning child process");
    let mut child = match cmd.spawn() {
        Ok(c) => c,
        Err(e) => {
            error!(err = %e, "failed to spawn command");
            return Err(e).context("spawn command");
        }
    };

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| anyhow!("stdout was not piped"))?;
    let stdout_handle = thread::spawn(move || read_stream(stdout));

    let written = match stdin {
        Some(input) => write_stdin(&mut child, input),
        None => Ok(()),
    };

    // Always reap the child and join the reader, even when the write failed.
    let status = child.wait().context("wait for command")?;
    let stdout = match stdout_handle.join() {
        Ok(result) => result.context("join stdout")?,
        Err(_) => return Err(anyhow!("output reader thread panicked")),
    };
    written?;

    debug!(exit_code = ?status.code(), stdout_bytes = stdout.len(), "command finished");
    Ok(CommandOutput { status, stdout })
}

fn write_stdin(child: &mut Child, input: &[u8]) -> Result<()> {
    let mut child_stdin = child
        .stdin
        .take()
        .ok_or_else(|| anyhow!("stdin was not piped"))?;
    match child_stdin.write_all(input) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
            debug!("child closed stdin before reading all input");
        }
        Err(e) => return Err(e).context("write stdin"),
    }
    // Dropping closes the pipe so the child sees EOF.
    drop(child_stdin);
    Ok(())
}

fn read_stream<R: Read>(mut reader: R) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf).context("read output")?;
    Ok(buf)
}
