//! # Compose Driver
//!
//! File: cli/src/common/docker/compose.rs
//!
//! ## Overview
//!
//! `DockerCompose` implements `ComposeDriver` by running
//! `<binary> compose <subcommand>` in the project directory. The binary
//! defaults to `docker` and is configurable (`--runtime`, `DRIM_RUNTIME`,
//! `runtime.binary` in the settings file), which lets the same driver run
//! `podman compose`.
//!
//! Long-running and operator-facing subcommands stream to the terminal. Only
//! `ps -q` is captured, to read a container ID.
//!
use super::{ComposeDriver, LogOptions};
use crate::common::process;
use crate::core::error::Result;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Process-backed `ComposeDriver`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DockerCompose {
    binary: String,
    project_dir: PathBuf,
}

impl DockerCompose {
    pub fn new(binary: impl Into<String>, project_dir: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            project_dir: project_dir.into(),
        }
    }

    /// Full argument list for `<binary> compose <args>`.
    fn compose_args<'a>(&self, args: &[&'a str]) -> Vec<&'a str> {
        std::iter::once("compose").chain(args.iter().copied()).collect()
    }

    fn compose(&self, args: &[&str]) -> Result<()> {
        process::run_streamed(&self.binary, &self.compose_args(args), Some(self.project_dir.as_path()))
    }

    fn compose_services(&self, subcommand: &str, services: &[&str]) -> Result<()> {
        let mut args = vec![subcommand];
        args.extend_from_slice(services);
        self.compose(&args)
    }
}

impl ComposeDriver for DockerCompose {
    fn runtime_available(&self) -> bool {
        process::probe(&self.binary, &["--version"])
    }

    fn compose_available(&self) -> bool {
        process::probe(&self.binary, &["compose", "version"])
    }

    fn pull(&self) -> Result<()> {
        self.compose(&["pull"])
    }

    fn up(&self) -> Result<()> {
        self.compose(&["up", "-d"])
    }

    fn start(&self, services: &[&str]) -> Result<()> {
        self.compose_services("start", services)
    }

    fn stop(&self, services: &[&str]) -> Result<()> {
        self.compose_services("stop", services)
    }

    fn restart(&self, services: &[&str]) -> Result<()> {
        self.compose_services("restart", services)
    }

    fn down(&self, remove_volumes: bool) -> Result<()> {
        if remove_volumes {
            self.compose(&["down", "-v"])
        } else {
            self.compose(&["down"])
        }
    }

    fn ps(&self) -> Result<()> {
        self.compose(&["ps"])
    }

    fn logs(&self, options: &LogOptions) -> Result<()> {
        let extra = options.to_args();
        let mut args = vec!["logs"];
        args.extend(extra.iter().map(String::as_str));
        self.compose(&args)
    }

    fn container_id(&self, service: &str, include_stopped: bool) -> Result<Option<String>> {
        let mut args = vec!["ps", "-q"];
        if include_stopped {
            args.push("-a");
        }
        args.push(service);
        let stdout = process::run_captured(
            &self.binary,
            &self.compose_args(&args),
            Some(self.project_dir.as_path()),
        )?;
        let id = stdout.lines().map(str::trim).find(|l| !l.is_empty());
        debug!("Container for service '{}': {:?}", service, id);
        Ok(id.map(str::to_string))
    }

    fn copy_from_container(&self, container: &str, source: &str, destination: &Path) -> Result<()> {
        let from = format!("{}:{}", container, source);
        let to = destination.to_string_lossy().into_owned();
        process::run_streamed(
            &self.binary,
            &["cp", from.as_str(), to.as_str()],
            Some(self.project_dir.as_path()),
        )
    }

    fn copy_into_container(&self, source: &Path, container: &str, destination: &str) -> Result<()> {
        let from = source.to_string_lossy().into_owned();
        let to = format!("{}:{}", container, destination);
        process::run_streamed(
            &self.binary,
            &["cp", from.as_str(), to.as_str()],
            Some(self.project_dir.as_path()),
        )
    }

    fn remove_image(&self, image: &str) -> Result<()> {
        process::run_captured(&self.binary, &["rmi", image], Some(self.project_dir.as_path())).map(|_| ())
    }
}
