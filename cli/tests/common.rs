//! # Drim CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! Shared helpers for the integration tests in `cli/tests/`. Every test runs
//! the compiled `drim` binary inside its own temporary directory, with the
//! user config directory redirected there too, so no settings from the
//! machine running the tests leak in.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::path::Path;
use tempfile::TempDir;

/// `drim` command running in `workdir`, never prompting, without colors.
pub fn drim_cmd(workdir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("drim").expect("Failed to find drim binary for testing");
    cmd.current_dir(workdir)
        .env("XDG_CONFIG_HOME", workdir.join(".config"))
        .env("HOME", workdir)
        .env("NO_COLOR", "1")
        .env_remove("DRIM_RUNTIME")
        .env_remove("RUST_LOG")
        .arg("--non-interactive");
    cmd
}

/// `drim` without a working directory, for help/version checks.
pub fn drim_bare() -> Command {
    Command::cargo_bin("drim").expect("Failed to find drim binary for testing")
}

/// Fresh working directory.
pub fn workspace() -> TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}
