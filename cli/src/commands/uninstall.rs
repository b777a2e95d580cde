//! # Drim Uninstall Handler
//!
//! File: cli/src/commands/uninstall.rs
//!
//! ## Overview
//!
//! `drim uninstall` removes the deployment: containers, network and named
//! volumes (`compose down -v`), which deletes the database. Images can be
//! removed as well with `--remove-images` or by answering the follow-up
//! question. The generated files stay in place so the stack can be
//! recreated with `drim start`.
//!
//! Image removal is best effort. An image still used elsewhere, or already
//! gone, produces a warning and the command carries on.
//!
use super::AppContext;
use crate::core::error::Result;
use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

#[derive(Parser, Debug, Default)]
#[command(about = "Remove the Kaneo containers and data volumes")]
pub struct UninstallArgs {
    /// Also remove the configured images.
    #[arg(long)]
    remove_images: bool,
}

pub fn handle_uninstall(ctx: &mut AppContext, args: UninstallArgs) -> Result<()> {
    info!("Handling uninstall command...");
    ctx.require_compose_file()?;

    ctx.console
        .warn("This removes all Kaneo containers and volumes, including the database.");
    if !ctx.confirm_destructive("Uninstall Kaneo?", "uninstall")? {
        ctx.console.info("Uninstall cancelled.");
        return Ok(());
    }

    ctx.console.info("Removing containers and volumes...");
    ctx.driver
        .down(true)
        .context("Failed to remove containers and volumes")?;

    let remove_images = args.remove_images
        || (ctx.prompter.is_interactive()
            && !ctx.assume_yes
            && ctx.prompter.confirm("Remove the Kaneo images too?", false)?);
    if remove_images {
        let images: Vec<String> = ctx
            .settings
            .images
            .all()
            .into_iter()
            .map(str::to_string)
            .collect();
        for image in &images {
            match ctx.driver.remove_image(image) {
                Ok(()) => ctx.console.success(&format!("Removed image {}", image)),
                Err(e) => {
                    warn!("Image removal failed for {}: {:#}", image, e);
                    ctx.console
                        .warn(&format!("Could not remove image {} (skipped)", image));
                }
            }
        }
    }

    ctx.console.success("Kaneo uninstalled. Configuration files were kept.");
    Ok(())
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::*;
    use crate::core::config::Config;

    #[test]
    fn test_uninstall_requires_confirmation() {
        let dir = tempfile::tempdir().unwrap();
        write_compose(dir.path());
        let (fake, calls) = driver();
        let mut ctx = context(dir.path(), fake);
        assert!(handle_uninstall(&mut ctx, UninstallArgs::default()).is_err());
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_uninstall_with_yes_keeps_images_and_files() {
        let dir = tempfile::tempdir().unwrap();
        write_compose(dir.path());
        let (fake, calls) = driver();
        let mut ctx = context(dir.path(), fake);
        ctx.assume_yes = true;
        handle_uninstall(&mut ctx, UninstallArgs::default()).unwrap();
        assert_eq!(*calls.borrow(), vec!["down -v"]);
        assert!(dir.path().join("compose.yml").is_file());
    }

    #[test]
    fn test_uninstall_image_failures_are_warnings() {
        let dir = tempfile::tempdir().unwrap();
        write_compose(dir.path());
        let (mut fake, calls) = driver();
        fake.fail_on = Some("rmi");
        let mut ctx = context(dir.path(), fake);
        ctx.assume_yes = true;
        handle_uninstall(&mut ctx, UninstallArgs { remove_images: true }).unwrap();
        let image_count = Config::default().images.all().len();
        let calls = calls.borrow();
        assert_eq!(calls.iter().filter(|c| c.starts_with("rmi ")).count(), image_count);
    }

    #[test]
    fn test_uninstall_interactive_image_question() {
        let dir = tempfile::tempdir().unwrap();
        write_compose(dir.path());
        let (fake, calls) = driver();
        let mut ctx = interactive_context(dir.path(), fake, &["y", "n"]);
        handle_uninstall(&mut ctx, UninstallArgs::default()).unwrap();
        assert_eq!(*calls.borrow(), vec!["down -v"]);
    }
}
