//! # Drim Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//!
//! ## Overview
//!
//! Shared glue between the commands and the outside world:
//!
//! - **`docker`**: the `ComposeDriver` trait and the `DockerCompose`
//!   implementation that shells out to `<runtime> compose`.
//! - **`fs`**: file writes with explicit permissions.
//! - **`process`**: blocking execution of external programs.
//! - **`ui`**: colored console output and operator prompts.
//!
//! Command handlers import from the specific submodule, e.g.
//! `crate::common::fs::io::ensure_dir_exists`.
//!

/// Deployment driver over the container runtime's compose subcommand.
pub mod docker;
/// Filesystem helpers (`io`).
pub mod fs;
/// External process execution.
pub mod process;
/// Console output and prompting.
pub mod ui;
