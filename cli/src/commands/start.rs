//! # Drim Start Handler
//!
//! File: cli/src/commands/start.rs
//!
//! `drim start` runs `compose up -d` against the generated `compose.yml`,
//! creating any missing containers.
//!
use super::AppContext;
use crate::core::error::Result;
use anyhow::Context;
use clap::Parser;
use tracing::info;

#[derive(Parser, Debug, Default)]
#[command(about = "Start the Kaneo services")]
pub struct StartArgs {}

pub fn handle_start(ctx: &mut AppContext, _args: StartArgs) -> Result<()> {
    info!("Handling start command...");
    ctx.require_compose_file()?;
    ctx.ensure_runtime()?;
    ctx.console.info("Starting services...");
    ctx.driver.up().context("Failed to start services")?;
    ctx.console.success("Services started.");
    Ok(())
}
