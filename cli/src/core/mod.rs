//! # Drim Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//!
//! ## Overview
//!
//! Foundational pieces shared by the generator and the commands:
//! - `config`: tool settings loading, merging and validation
//! - `error`: error types and the `Result` alias
//! - `secrets`: the fail-closed secret generator
//! - `templating`: the embedded Tera templates for every artifact
//!
pub mod config;
pub mod error;
pub mod secrets;
pub mod templating;
