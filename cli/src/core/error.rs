//! # Drim Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error types used throughout Drim. Failures fall
//! into four groups, and each one surfaces differently:
//!
//! - **Validation**: contradictory or missing configuration inputs. These are
//!   produced by the topology builder (`generator::builder::ValidationError`)
//!   and resolved or reported as close to the input as possible.
//! - **External commands**: the container runtime or the editor is missing or
//!   exits non-zero. Surfaced verbatim, never retried.
//! - **Filesystem**: artifact files or backup paths cannot be written/resolved.
//! - **Random source**: secret generation could not reach the OS RNG
//!   (`core::secrets::SecretError`). The command aborts; no fallback secret.
//!
//! `DrimError` wraps the domain-specific failures; `Result<T>` is an alias for
//! `anyhow::Result<T>` so command handlers can attach context with
//! `.with_context(...)` before the error reaches `main`.
//!
//! ```rust
//! let content = fs::read_to_string(&path)
//!     .with_context(|| format!("Failed to read file: {}", path.display()))?;
//! ```
//!
use thiserror::Error;

/// Custom error type for the Drim application.
#[derive(Error, Debug)]
pub enum DrimError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Filesystem error: {0}")]
    FileSystem(String),

    #[error("Invalid configuration input: {source}")]
    Validation {
        #[from]
        source: crate::generator::builder::ValidationError,
    },

    #[error("Secret generation failed: {source}")]
    Secret {
        #[from]
        source: crate::core::secrets::SecretError,
    },

    #[error("Template rendering error: {source}")]
    Template {
        #[from]
        source: tera::Error,
    },

    #[error("External command failed: {cmd}, Status: {status}, Output:\n{output}")]
    ExternalCommand {
        cmd: String,
        status: String,
        output: String,
    },

    #[error("Service '{name}' has no running container.")]
    ServiceNotRunning { name: String },

    #[error("Confirmation required for '{action}'. Re-run with --yes to proceed non-interactively.")]
    ConfirmationRequired { action: String },
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;
