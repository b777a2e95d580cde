//! # Drim Upgrade Handler
//!
//! File: cli/src/commands/upgrade.rs
//!
//! `drim upgrade` (alias `update`) pulls the configured images and
//! recreates any container whose image changed. Data volumes are kept.
//!
use super::AppContext;
use crate::core::error::Result;
use anyhow::Context;
use clap::Parser;
use tracing::info;

#[derive(Parser, Debug, Default)]
#[command(about = "Pull newer images and recreate the services")]
pub struct UpgradeArgs {}

pub fn handle_upgrade(ctx: &mut AppContext, _args: UpgradeArgs) -> Result<()> {
    info!("Handling upgrade command...");
    ctx.require_compose_file()?;
    ctx.ensure_runtime()?;
    ctx.console.info("Pulling images...");
    ctx.driver.pull().context("Failed to pull images")?;
    ctx.console.info("Recreating services...");
    ctx.driver.up().context("Failed to recreate services")?;
    ctx.console.success("Kaneo upgraded.");
    Ok(())
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::*;

    #[test]
    fn test_upgrade_pulls_then_recreates() {
        let dir = tempfile::tempdir().unwrap();
        write_compose(dir.path());
        let (fake, calls) = driver();
        let mut ctx = context(dir.path(), fake);
        handle_upgrade(&mut ctx, UpgradeArgs::default()).unwrap();
        assert_eq!(*calls.borrow(), vec!["pull", "up"]);
    }

    #[test]
    fn test_upgrade_stops_on_pull_failure() {
        let dir = tempfile::tempdir().unwrap();
        write_compose(dir.path());
        let (mut fake, calls) = driver();
        fake.fail_on = Some("pull");
        let mut ctx = context(dir.path(), fake);
        assert!(handle_upgrade(&mut ctx, UpgradeArgs::default()).is_err());
        assert_eq!(*calls.borrow(), vec!["pull"]);
    }
}
