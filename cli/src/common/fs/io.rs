//! # Drim Filesystem I/O
//!
//! File: cli/src/common/fs/io.rs
//!
//! ## Overview
//!
//! Thin wrappers around `std::fs` used for artifact and backup paths:
//!
//! - **`ensure_dir_exists`**: `mkdir -p`, failing if the path is a file.
//! - **`read_file_to_string`**: `fs::read_to_string` with path context.
//! - **`write_string_to_file`**: overwrite a file with mode 0644.
//! - **`write_private_file`**: overwrite a file with mode 0600. Used for
//!   `.env`, which holds secrets in plain text.
//!
//! Modes are applied on Unix only. An existing file keeps its inode, so the
//! mode is reset explicitly after writing; `OpenOptions::mode` alone only
//! affects newly created files.
//!
use crate::core::error::{DrimError, Result};
use anyhow::Context;
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

const PUBLIC_MODE: u32 = 0o644;
const PRIVATE_MODE: u32 = 0o600;

/// Ensures that a directory exists at `path`, creating parents as needed.
///
/// # Errors
///
/// Returns an `Err` if the path exists but is not a directory, or if creating
/// the directory fails.
pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory {:?}", path))?;
        info!("Created directory: {:?}", path);
    } else if !path.is_dir() {
        anyhow::bail!(DrimError::FileSystem(format!(
            "Path exists but is not a directory: {:?}",
            path
        )));
    } else {
        debug!("Directory already exists: {:?}", path);
    }
    Ok(())
}

/// Reads the entire content of a file into a string.
pub fn read_file_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read file {:?}", path))
}

/// Writes `content` to `path` (mode 0644), overwriting any existing file.
pub fn write_string_to_file(path: &Path, content: &str) -> Result<()> {
    write_with_mode(path, content, PUBLIC_MODE)
}

/// Writes `content` to `path` readable by the owner only (mode 0600).
pub fn write_private_file(path: &Path, content: &str) -> Result<()> {
    write_with_mode(path, content, PRIVATE_MODE)
}

fn write_with_mode(path: &Path, content: &str, mode: u32) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_dir_exists(parent)?;
        }
    }

    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode);
    }
    let mut file = options
        .open(path)
        .with_context(|| format!("Failed to open file for writing {:?}", path))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(mode))
            .with_context(|| format!("Failed to set permissions on {:?}", path))?;
    }
    #[cfg(not(unix))]
    let _ = mode;

    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write to file {:?}", path))?;
    info!("Wrote content to file: {:?}", path);
    Ok(())
}
