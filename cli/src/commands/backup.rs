//! # Drim Backup Handler
//!
//! File: cli/src/commands/backup.rs
//!
//! ## Overview
//!
//! `drim backup` copies the SQLite database out of the running backend
//! container into a timestamped file:
//!
//! ```text
//! <dir>/kaneo-backup-20250101-120000.db
//! ```
//!
//! Only deployments made with `drim deploy` keep their data in a SQLite
//! file. A `drim setup` deployment stores it in PostgreSQL; those are
//! detected through `DATABASE_URL` in `.env` and refused with a hint to use
//! `pg_dump` instead.
//!
//! ## Usage
//!
//! ```bash
//! drim backup
//! drim backup --dir /srv/kaneo-backups
//! ```
//!
use super::AppContext;
use crate::common::fs::io;
use crate::core::error::{DrimError, Result};
use crate::generator::artifacts::ENV_FILE;
use crate::generator::topology::{BACKEND_SERVICE, SQLITE_DB_PATH};
use anyhow::{anyhow, Context};
use chrono::Local;
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Parser, Debug, Default)]
#[command(about = "Back up the SQLite database")]
pub struct BackupArgs {
    /// Directory for the backup file. Defaults to `[backup] directory`.
    #[arg(long)]
    dir: Option<PathBuf>,
}

/// Backup file name for the current local time.
pub fn backup_file_name() -> String {
    format!("kaneo-backup-{}.db", Local::now().format("%Y%m%d-%H%M%S"))
}

/// Fails for deployments whose data lives in PostgreSQL.
pub(super) fn ensure_sqlite_deployment(ctx: &AppContext) -> Result<()> {
    let env_path = ctx.workdir.join(ENV_FILE);
    if !env_path.is_file() {
        debug!("No {} found; assuming a SQLite deployment", ENV_FILE);
        return Ok(());
    }
    let env = io::read_file_to_string(&env_path)?;
    if env.lines().any(|line| line.trim_start().starts_with("DATABASE_URL=")) {
        return Err(anyhow!(DrimError::Config(
            "This deployment uses PostgreSQL. Back it up with `pg_dump` inside the postgres container."
                .to_string()
        )));
    }
    Ok(())
}

pub fn handle_backup(ctx: &mut AppContext, args: BackupArgs) -> Result<()> {
    info!("Handling backup command...");
    ctx.require_compose_file()?;
    ensure_sqlite_deployment(ctx)?;

    let container = ctx
        .driver
        .container_id(BACKEND_SERVICE, false)
        .context("Failed to look up the backend container")?
        .ok_or_else(|| {
            anyhow!(DrimError::ServiceNotRunning {
                name: BACKEND_SERVICE.to_string(),
            })
        })?;

    let dir = args
        .dir
        .unwrap_or_else(|| PathBuf::from(&ctx.settings.backup.directory));
    let dir = ctx.workdir.join(dir);
    io::ensure_dir_exists(&dir)?;
    let target = dir.join(backup_file_name());

    ctx.console.info("Creating backup...");
    ctx.driver
        .copy_from_container(&container, SQLITE_DB_PATH, &target)
        .context("Failed to copy the database out of the backend container")?;
    ctx.console
        .success(&format!("Backup created: {}", target.display()));
    Ok(())
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::*;
    use std::fs;

    #[test]
    fn test_backup_file_name_shape() {
        let name = backup_file_name();
        assert!(name.starts_with("kaneo-backup-"));
        assert!(name.ends_with(".db"));
        // kaneo-backup-YYYYmmdd-HHMMSS.db
        assert_eq!(name.len(), "kaneo-backup-".len() + 15 + ".db".len());
    }

    #[test]
    fn test_backup_copies_into_default_dir() {
        let dir = tempfile::tempdir().unwrap();
        write_compose(dir.path());
        let (mut fake, calls) = driver();
        fake.running_id = Some("abc123".into());
        let mut ctx = context(dir.path(), fake);
        handle_backup(&mut ctx, BackupArgs::default()).unwrap();

        let backups: Vec<_> = fs::read_dir(dir.path().join("backups"))
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        assert_eq!(backups.len(), 1);
        let calls = calls.borrow();
        assert_eq!(calls[0], "id backend false");
        assert!(calls[1].starts_with("cp abc123:/app/apps/api/data/kaneo.db "));
    }

    #[test]
    fn test_backup_requires_running_backend() {
        let dir = tempfile::tempdir().unwrap();
        write_compose(dir.path());
        let (fake, _) = driver();
        let mut ctx = context(dir.path(), fake);
        let err = handle_backup(&mut ctx, BackupArgs::default()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DrimError>(),
            Some(DrimError::ServiceNotRunning { name }) if name == "backend"
        ));
        assert!(!dir.path().join("backups").exists());
    }

    #[test]
    fn test_backup_refuses_postgres_deployment() {
        let dir = tempfile::tempdir().unwrap();
        write_compose(dir.path());
        fs::write(
            dir.path().join(".env"),
            "DATABASE_URL=postgresql://kaneo:pw@postgres:5432/kaneo\n",
        )
        .unwrap();
        let (mut fake, calls) = driver();
        fake.running_id = Some("abc123".into());
        let mut ctx = context(dir.path(), fake);
        let err = handle_backup(&mut ctx, BackupArgs::default()).unwrap_err();
        assert!(err.to_string().contains("pg_dump"));
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_backup_explicit_dir() {
        let dir = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        write_compose(dir.path());
        let (mut fake, _) = driver();
        fake.running_id = Some("abc123".into());
        let mut ctx = context(dir.path(), fake);
        let args = BackupArgs {
            dir: Some(out.path().join("nested")),
        };
        handle_backup(&mut ctx, args).unwrap();
        assert_eq!(fs::read_dir(out.path().join("nested")).unwrap().count(), 1);
    }
}
