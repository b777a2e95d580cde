//! # Drim Filesystem Utilities (`common::fs`)
//!
//! File: cli/src/common/fs/mod.rs
//!
//! ## Overview
//!
//! - **`io`**: directory creation, reads, and writes with mode 0644 or 0600.
//!   Used for the generated artifacts and backup directories.
//!

/// Basic file I/O with permission control.
pub mod io;
