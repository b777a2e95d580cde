//! # Drim Restore Handler
//!
//! File: cli/src/commands/restore.rs
//!
//! ## Overview
//!
//! `drim restore --file <backup.db>` replaces the backend's SQLite database
//! with a file made by `drim backup`.
//!
//! ## Architecture
//!
//! 1. Check the file exists and the deployment uses SQLite.
//! 2. Confirm: the current database is overwritten.
//! 3. Locate the backend container, running or stopped.
//! 4. Stop the backend, copy the file in, start the backend.
//!
//! If the copy fails the backend is left stopped and the error names the
//! failed step. `drim start` brings it back with the old database.
//!
use super::backup::ensure_sqlite_deployment;
use super::AppContext;
use crate::core::error::{DrimError, Result};
use crate::generator::topology::{BACKEND_SERVICE, SQLITE_DB_PATH};
use anyhow::{anyhow, Context};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug, Default)]
#[command(about = "Restore the SQLite database from a backup file")]
pub struct RestoreArgs {
    /// Backup file created by `drim backup`.
    #[arg(short, long)]
    file: PathBuf,
}

pub fn handle_restore(ctx: &mut AppContext, args: RestoreArgs) -> Result<()> {
    info!("Handling restore command...");
    let file = ctx.workdir.join(&args.file);
    if !file.is_file() {
        return Err(anyhow!(DrimError::FileSystem(format!(
            "Backup file not found: {}",
            file.display()
        ))));
    }
    ctx.require_compose_file()?;
    ensure_sqlite_deployment(ctx)?;

    ctx.console
        .warn("Restoring replaces the current database. Data written since the backup is lost.");
    if !ctx.confirm_destructive("Continue with the restore?", "restore")? {
        ctx.console.info("Restore cancelled.");
        return Ok(());
    }

    let container = ctx
        .driver
        .container_id(BACKEND_SERVICE, true)
        .context("Failed to look up the backend container")?
        .ok_or_else(|| {
            anyhow!(DrimError::Config(
                "No backend container exists. Run `drim start` once, then retry the restore."
                    .to_string()
            ))
        })?;

    ctx.console.info("Stopping backend...");
    ctx.driver
        .stop(&[BACKEND_SERVICE])
        .context("Failed to stop the backend")?;
    ctx.console.info("Copying database...");
    ctx.driver
        .copy_into_container(&file, &container, SQLITE_DB_PATH)
        .context("Failed to copy the backup into the backend container; the backend is stopped")?;
    ctx.console.info("Starting backend...");
    ctx.driver
        .start(&[BACKEND_SERVICE])
        .context("Failed to start the backend")?;

    ctx.console.success("Database restored.");
    Ok(())
}
