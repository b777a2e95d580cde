//! # Drim Process Execution (`common::process`)
//!
//! File: cli/src/common/process.rs
//!
//! ## Overview
//!
//! Synchronous wrappers around `std::process::Command` for the container
//! runtime and the editor. Every call blocks until the child exits; no
//! timeout is applied.
//!
//! - **`run_streamed`**: child inherits stdio (pull progress, logs, editors).
//! - **`run_captured`**: stdout is captured and returned (`ps -q`).
//! - **`probe`**: only asks "does this run and exit zero?".
//!
//! Failures are mapped to `DrimError::ExternalCommand` carrying the command
//! line, the exit status and whatever output is available. No attempt is
//! made to interpret the child's output.
//!
use crate::core::error::{DrimError, Result};
use anyhow::anyhow;
use std::io::ErrorKind;
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::{debug, info};

/// Human-readable command line for messages.
pub fn describe(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

fn build(program: &str, args: &[&str], cwd: Option<&Path>) -> Command {
    let mut command = Command::new(program);
    command.args(args);
    if let Some(dir) = cwd {
        command.current_dir(dir);
    }
    command
}

fn spawn_error(cmd: String, err: std::io::Error) -> anyhow::Error {
    let status = if err.kind() == ErrorKind::NotFound {
        "not found".to_string()
    } else {
        "failed to start".to_string()
    };
    anyhow!(DrimError::ExternalCommand {
        cmd,
        status,
        output: err.to_string(),
    })
}

/// Runs a command with inherited stdio, failing on a non-zero exit.
pub fn run_streamed(program: &str, args: &[&str], cwd: Option<&Path>) -> Result<()> {
    let cmd = describe(program, args);
    info!("Running: {}", cmd);
    let status = build(program, args, cwd)
        .status()
        .map_err(|e| spawn_error(cmd.clone(), e))?;
    debug!("'{}' exited with {}", cmd, status);
    if status.success() {
        Ok(())
    } else {
        Err(anyhow!(DrimError::ExternalCommand {
            cmd,
            status: status.to_string(),
            output: "(see output above)".to_string(),
        }))
    }
}

/// Runs a command and returns its stdout, failing on a non-zero exit.
pub fn run_captured(program: &str, args: &[&str], cwd: Option<&Path>) -> Result<String> {
    let cmd = describe(program, args);
    debug!("Running (captured): {}", cmd);
    let output = build(program, args, cwd)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| spawn_error(cmd.clone(), e))?;
    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    if output.status.success() {
        Ok(stdout)
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(anyhow!(DrimError::ExternalCommand {
            cmd,
            status: output.status.to_string(),
            output: stderr.trim().to_string(),
        }))
    }
}

/// True when the command starts and exits zero. A missing binary is `false`.
pub fn probe(program: &str, args: &[&str]) -> bool {
    let result = build(program, args, None)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();
    match result {
        Ok(status) => {
            debug!("Probe '{}' -> {}", describe(program, args), status);
            status.success()
        }
        Err(e) => {
            debug!("Probe '{}' failed to start: {}", describe(program, args), e);
            false
        }
    }
}
