//! # Drim Restart Handler
//!
//! File: cli/src/commands/restart.rs
//!
//! `drim restart` restarts every service in place. Containers are not
//! recreated, so image or `compose.yml` changes need `drim start` or
//! `drim upgrade` instead.
//!
use super::AppContext;
use crate::core::error::Result;
use anyhow::Context;
use clap::Parser;
use tracing::info;

#[derive(Parser, Debug, Default)]
#[command(about = "Restart the Kaneo services")]
pub struct RestartArgs {}

pub fn handle_restart(ctx: &mut AppContext, _args: RestartArgs) -> Result<()> {
    info!("Handling restart command...");
    ctx.require_compose_file()?;
    ctx.console.info("Restarting services...");
    ctx.driver.restart(&[]).context("Failed to restart services")?;
    ctx.console.success("Services restarted.");
    Ok(())
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::*;

    #[test]
    fn test_restart() {
        let dir = tempfile::tempdir().unwrap();
        write_compose(dir.path());
        let (fake, calls) = driver();
        let mut ctx = context(dir.path(), fake);
        handle_restart(&mut ctx, RestartArgs::default()).unwrap();
        assert_eq!(*calls.borrow(), vec!["restart"]);
    }

    #[test]
    fn test_restart_failure_propagates() {
        let dir = tempfile::tempdir().unwrap();
        write_compose(dir.path());
        let (mut fake, _) = driver();
        fake.fail_on = Some("restart");
        let mut ctx = context(dir.path(), fake);
        let err = handle_restart(&mut ctx, RestartArgs::default()).unwrap_err();
        assert!(format!("{:#}", err).contains("simulated failure"));
    }
}
