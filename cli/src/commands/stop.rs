//! # Drim Stop Handler
//!
//! File: cli/src/commands/stop.rs
//!
//! `drim stop` stops every service and keeps the containers. With `--down`
//! the containers and network are removed as well; named volumes (the
//! database) survive either way.
//!
use super::AppContext;
use crate::core::error::Result;
use anyhow::Context;
use clap::Parser;
use tracing::info;

#[derive(Parser, Debug, Default)]
#[command(about = "Stop the Kaneo services")]
pub struct StopArgs {
    /// Remove the containers too (`compose down`). Data volumes are kept.
    #[arg(long)]
    down: bool,
}

pub fn handle_stop(ctx: &mut AppContext, args: StopArgs) -> Result<()> {
    info!("Handling stop command (down: {})...", args.down);
    ctx.require_compose_file()?;
    if args.down {
        ctx.console.info("Stopping and removing containers...");
        ctx.driver.down(false).context("Failed to bring the stack down")?;
    } else {
        ctx.console.info("Stopping services...");
        ctx.driver.stop(&[]).context("Failed to stop services")?;
    }
    ctx.console.success("Services stopped.");
    Ok(())
}
