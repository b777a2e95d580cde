//! # Drim Configure Handler
//!
//! File: cli/src/commands/configure.rs
//!
//! ## Overview
//!
//! `drim configure` opens the generated `.env` in an editor and offers to
//! restart the stack afterwards.
//!
//! The editor is taken from `[runtime] editor` in the settings, then
//! `$EDITOR`, then `nano`. The value may carry arguments (`"code --wait"`);
//! it is split on whitespace, not parsed by a shell.
//!
//! `compose.yml` holds literal values rather than `${VAR}` references, so
//! edits to `.env` only affect what the containers read from it directly.
//! Changing the domain or proxy means running `setup`/`deploy` again.
//!
use super::AppContext;
use crate::common::process;
use crate::core::error::{DrimError, Result};
use crate::generator::artifacts::ENV_FILE;
use anyhow::{anyhow, Context};
use clap::Parser;
use tracing::{debug, info};

const FALLBACK_EDITOR: &str = "nano";

#[derive(Parser, Debug, Default)]
#[command(about = "Edit the generated .env file")]
pub struct ConfigureArgs {
    /// Restart the services after editing without asking.
    #[arg(long)]
    restart: bool,
}

/// Editor program and arguments, first non-empty source wins.
pub fn editor_command(configured: Option<&str>, env_editor: Option<&str>) -> Vec<String> {
    [configured, env_editor]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|value| !value.is_empty())
        .unwrap_or(FALLBACK_EDITOR)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

pub fn handle_configure(ctx: &mut AppContext, args: ConfigureArgs) -> Result<()> {
    info!("Handling configure command...");
    let env_path = ctx.workdir.join(ENV_FILE);
    if !env_path.is_file() {
        return Err(anyhow!(DrimError::FileSystem(format!(
            "No {} in {}. Run `drim setup` or `drim deploy` first.",
            ENV_FILE,
            ctx.workdir.display()
        ))));
    }

    let env_editor = std::env::var("EDITOR").ok();
    let command = editor_command(ctx.settings.runtime.editor.as_deref(), env_editor.as_deref());
    let (program, editor_args) = command
        .split_first()
        .ok_or_else(|| anyhow!(DrimError::Config("Editor command is empty.".to_string())))?;
    let path = env_path.to_string_lossy().into_owned();
    let mut argv: Vec<&str> = editor_args.iter().map(String::as_str).collect();
    argv.push(&path);
    debug!("Opening {} with {}", path, program);

    process::run_streamed(program, &argv, Some(ctx.workdir.as_path()))
        .with_context(|| format!("Editor '{}' failed", program))?;

    let restart = args.restart
        || (ctx.prompter.is_interactive()
            && ctx.prompter.confirm("Restart services to apply the changes?", true)?);
    if restart {
        ctx.require_compose_file()?;
        ctx.console.info("Restarting services...");
        ctx.driver.restart(&[]).context("Failed to restart services")?;
        ctx.console.success("Services restarted.");
    } else {
        ctx.console.info("Run `drim restart` to apply the changes.");
    }
    Ok(())
}
