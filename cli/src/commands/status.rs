//! # Drim Status Handler
//!
//! File: cli/src/commands/status.rs
//!
//! `drim status` prints the runtime's view of the stack (`compose ps`).
//!
use super::AppContext;
use crate::core::error::Result;
use anyhow::Context;
use clap::Parser;
use tracing::info;

#[derive(Parser, Debug, Default)]
#[command(about = "Show the state of the Kaneo services")]
pub struct StatusArgs {}

pub fn handle_status(ctx: &mut AppContext, _args: StatusArgs) -> Result<()> {
    info!("Handling status command...");
    ctx.require_compose_file()?;
    ctx.driver.ps().context("Failed to query service status")?;
    Ok(())
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::*;

    #[test]
    fn test_status_runs_ps() {
        let dir = tempfile::tempdir().unwrap();
        write_compose(dir.path());
        let (fake, calls) = driver();
        let mut ctx = context(dir.path(), fake);
        handle_status(&mut ctx, StatusArgs::default()).unwrap();
        assert_eq!(*calls.borrow(), vec!["ps"]);
    }
}
