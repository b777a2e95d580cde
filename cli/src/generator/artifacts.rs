//! # Artifact Set
//!
//! File: cli/src/generator/artifacts.rs
//!
//! ## Overview
//!
//! The rendered output of one generation pass, held in memory until every
//! artifact rendered successfully, then written in a fixed order:
//!
//! 1. `compose.yml`
//! 2. the proxy file (`nginx.conf` or `Caddyfile`), if the mode has one
//! 3. `.env` (mode 0600)
//!
//! Writes overwrite unconditionally; manual edits to generated files are
//! not preserved. The three writes are not transactional. Callers run
//! external processes (pull, up) only after `write_to` returns.
//!
use crate::common::fs::io;
use crate::core::error::Result;
use anyhow::Context;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const COMPOSE_FILE: &str = "compose.yml";
pub const NGINX_CONF_FILE: &str = "nginx.conf";
pub const CADDYFILE: &str = "Caddyfile";
pub const ENV_FILE: &str = ".env";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Compose,
    NginxConf,
    Caddyfile,
    Env,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 4] = [
        ArtifactKind::Compose,
        ArtifactKind::NginxConf,
        ArtifactKind::Caddyfile,
        ArtifactKind::Env,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            ArtifactKind::Compose => COMPOSE_FILE,
            ArtifactKind::NginxConf => NGINX_CONF_FILE,
            ArtifactKind::Caddyfile => CADDYFILE,
            ArtifactKind::Env => ENV_FILE,
        }
    }

    /// Only `.env` carries secrets in plain text.
    pub fn is_private(self) -> bool {
        self == ArtifactKind::Env
    }

    pub fn is_proxy_file(self) -> bool {
        matches!(self, ArtifactKind::NginxConf | ArtifactKind::Caddyfile)
    }
}

/// One rendered file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub file_name: &'static str,
    pub contents: String,
}

impl Artifact {
    pub fn new(kind: ArtifactKind, contents: String) -> Self {
        Self {
            kind,
            file_name: kind.file_name(),
            contents,
        }
    }
}

/// Everything one `setup`/`deploy` run writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSet {
    pub compose: Artifact,
    pub proxy: Option<Artifact>,
    pub env: Artifact,
}

impl ArtifactSet {
    /// Artifacts in write order.
    pub fn iter(&self) -> impl Iterator<Item = &Artifact> {
        std::iter::once(&self.compose)
            .chain(self.proxy.iter())
            .chain(std::iter::once(&self.env))
    }

    /// Writes every artifact into `dir`, returning the written paths.
    pub fn write_to(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();
        for artifact in self.iter() {
            let path = dir.join(artifact.file_name);
            let result = if artifact.kind.is_private() {
                io::write_private_file(&path, &artifact.contents)
            } else {
                io::write_string_to_file(&path, &artifact.contents)
            };
            result.with_context(|| format!("Failed to write {}", artifact.file_name))?;
            debug!("Wrote {} ({} bytes)", path.display(), artifact.contents.len());
            written.push(path);
        }
        Ok(written)
    }

    /// Proxy files in `dir` left behind by a run with another proxy mode.
    /// Compose never reads them, but they can mislead an operator.
    pub fn stale_proxy_files(&self, dir: &Path) -> Vec<PathBuf> {
        let current = self.proxy.as_ref().map(|p| p.kind);
        ArtifactKind::ALL
            .into_iter()
            .filter(|kind| kind.is_proxy_file() && Some(*kind) != current)
            .map(|kind| dir.join(kind.file_name()))
            .filter(|path| path.is_file())
            .collect()
    }
}
