//! # Drim Deployment Driver (`common::docker`)
//!
//! File: cli/src/common/docker/mod.rs
//!
//! ## Overview
//!
//! The interface Drim uses to realize a topology: a `compose`-capable
//! container runtime invoked in the directory holding the generated
//! `compose.yml`. Commands depend on the `ComposeDriver` trait only; the
//! shipped implementation is `compose::DockerCompose`, which shells out to
//! `<runtime> compose ...`.
//!
//! Every method is a pass-through. A failure means the process could not be
//! started or exited non-zero; the runtime's output is never parsed beyond
//! reading a container ID.
//!
//! ## Architecture
//!
//! - **`compose`**: `DockerCompose`, the process-backed driver.
//! - `LogOptions`: arguments for `compose logs`.
//!
pub mod compose;

pub use compose::DockerCompose;

use crate::core::error::Result;
use std::path::Path;

/// Options for `compose logs`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogOptions {
    /// Restrict output to one service.
    pub service: Option<String>,
    /// Keep streaming new lines.
    pub follow: bool,
    /// Number of lines from the end, or `all`.
    pub tail: Option<String>,
}

impl LogOptions {
    /// Arguments following `compose logs`.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if self.follow {
            args.push("--follow".to_string());
        }
        if let Some(tail) = &self.tail {
            args.push("--tail".to_string());
            args.push(tail.clone());
        }
        if let Some(service) = &self.service {
            args.push(service.clone());
        }
        args
    }
}

/// Operations Drim needs from the container runtime.
///
/// Service lists name compose services; an empty list means every service.
pub trait ComposeDriver {
    /// Runtime binary exists and runs (`<runtime> --version`).
    fn runtime_available(&self) -> bool;
    /// Compose subcommand exists (`<runtime> compose version`).
    fn compose_available(&self) -> bool;
    fn pull(&self) -> Result<()>;
    /// `up -d`: create or recreate and start every service.
    fn up(&self) -> Result<()>;
    fn start(&self, services: &[&str]) -> Result<()>;
    fn stop(&self, services: &[&str]) -> Result<()>;
    fn restart(&self, services: &[&str]) -> Result<()>;
    fn down(&self, remove_volumes: bool) -> Result<()>;
    /// Prints container states.
    fn ps(&self) -> Result<()>;
    fn logs(&self, options: &LogOptions) -> Result<()>;
    /// ID of the service's container. `include_stopped` also matches
    /// containers that exist but are not running.
    fn container_id(&self, service: &str, include_stopped: bool) -> Result<Option<String>>;
    fn copy_from_container(&self, container: &str, source: &str, destination: &Path)
        -> Result<()>;
    fn copy_into_container(&self, source: &Path, container: &str, destination: &str)
        -> Result<()>;
    fn remove_image(&self, image: &str) -> Result<()>;
}
