//! # Drim Artifact Generator
//!
//! File: cli/src/generator/mod.rs
//!
//! ## Overview
//!
//! Everything between operator input and the files on disk:
//!
//! - `builder`: resolves flags and prompts into a `TopologyConfig`
//! - `topology`: the resolved record and every value derived from it
//! - `render`: pure rendering of each artifact from the record
//! - `artifacts`: the rendered set and its ordered writes
//!
//! ```rust
//! let resolution = TopologyBuilder::new(Profile::Deploy, &settings, &secrets)
//!     .build(inputs, prompter)?;
//! let artifacts = render::render_artifacts(&resolution.config)?;
//! artifacts.write_to(&workdir)?;
//! ```
//!
pub mod artifacts;
pub mod builder;
pub mod render;
pub mod topology;
