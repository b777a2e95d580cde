//! # Drim Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! Entry point for the Drim CLI, a deployment helper for self-hosted Kaneo.
//! It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Building the shared `AppContext` (settings, runtime driver, prompter)
//! - Routing execution to the command handlers
//!
//! ## Architecture
//!
//! - Each command is a variant in the `Commands` enum
//! - Commands are mapped to `handle_*` functions in `commands::*`
//! - All errors are propagated to this level, printed once, and turned into
//!   exit status 1
//!
//! ## Examples
//!
//! ```bash
//! # Get help
//! drim --help
//!
//! # Generate and start with a Traefik proxy, showing debug logs
//! drim -vv deploy -p traefik -d kaneo.example.com -s
//!
//! # Use podman instead of docker
//! DRIM_RUNTIME=podman drim status
//! ```
//!
//! Command processing flow:
//! 1. Parse command-line args via Clap
//! 2. Configure logging based on verbosity level
//! 3. Load settings and build the context
//! 4. Route to the command handler
//! 5. Format and display any error that occurs
//!
use clap::Parser;
use std::io::IsTerminal;
use tracing_subscriber::{fmt, EnvFilter};

mod commands; // One module per CLI command.
mod common; // Shared glue: processes, compose driver, file I/O, terminal UI.
mod core; // Core infrastructure (errors, settings, templating, secrets).
mod generator; // Topology resolution and artifact rendering.

use crate::commands::AppContext;
use crate::common::docker::DockerCompose;
use crate::common::ui::{self, Console, NonInteractivePrompter, Prompter, TerminalPrompter};
use crate::core::error::Result;
use crate::core::secrets::OsSecretGenerator;
use anyhow::Context;

/// Top-level command-line arguments.
#[derive(Parser, Debug)]
#[command(
    name = "drim",
    about = "Drim: deploy self-hosted Kaneo with Docker Compose",
    long_about = "Generates compose.yml, reverse proxy configuration and .env for Kaneo,\n\
                  then drives the container runtime to run, back up and upgrade it.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,

    /// Never prompt. Missing answers fall back to defaults or fail.
    #[arg(long, global = true)]
    non_interactive: bool,

    /// Answer yes to confirmation questions.
    #[arg(short = 'y', long, global = true)]
    yes: bool,

    /// Container runtime binary providing `compose` (default: docker).
    #[arg(long, global = true, env = "DRIM_RUNTIME")]
    runtime: Option<String>,
}

#[derive(Parser, Debug)]
enum Commands {
    Setup(commands::setup::SetupArgs),
    Deploy(commands::deploy::DeployArgs),
    Start(commands::start::StartArgs),
    Stop(commands::stop::StopArgs),
    Restart(commands::restart::RestartArgs),
    Status(commands::status::StatusArgs),
    Logs(commands::logs::LogsArgs),
    Backup(commands::backup::BackupArgs),
    Restore(commands::restore::RestoreArgs),
    #[command(alias = "update")]
    Upgrade(commands::upgrade::UpgradeArgs),
    Uninstall(commands::uninstall::UninstallArgs),
    Configure(commands::configure::ConfigureArgs),
}

fn init_logging(verbose: u8) {
    let log_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn build_context(cli: &Cli) -> Result<AppContext> {
    let console = Console::new(ui::color_wanted(cli.no_color));
    let mut settings = crate::core::config::load_config().context("Failed to load settings")?;
    if let Some(runtime) = cli.runtime.as_deref().map(str::trim).filter(|r| !r.is_empty()) {
        settings.runtime.binary = runtime.to_string();
    }
    let workdir = std::env::current_dir().context("Failed to determine the working directory")?;

    let interactive = !cli.non_interactive && std::io::stdin().is_terminal();
    let prompter: Box<dyn Prompter> = if interactive {
        Box::new(TerminalPrompter)
    } else {
        Box::new(NonInteractivePrompter)
    };
    tracing::debug!(
        "Runtime '{}', workdir {:?}, interactive: {}",
        settings.runtime.binary,
        workdir,
        interactive
    );

    Ok(AppContext {
        console,
        driver: Box::new(DockerCompose::new(&settings.runtime.binary, &workdir)),
        settings,
        prompter,
        secrets: Box::new(OsSecretGenerator),
        workdir,
        assume_yes: cli.yes,
    })
}

fn run(cli: Cli) -> Result<()> {
    let mut ctx = build_context(&cli)?;
    let ctx = &mut ctx;
    match cli.command {
        Commands::Setup(args) => commands::setup::handle_setup(ctx, args),
        Commands::Deploy(args) => commands::deploy::handle_deploy(ctx, args),
        Commands::Start(args) => commands::start::handle_start(ctx, args),
        Commands::Stop(args) => commands::stop::handle_stop(ctx, args),
        Commands::Restart(args) => commands::restart::handle_restart(ctx, args),
        Commands::Status(args) => commands::status::handle_status(ctx, args),
        Commands::Logs(args) => commands::logs::handle_logs(ctx, args),
        Commands::Backup(args) => commands::backup::handle_backup(ctx, args),
        Commands::Restore(args) => commands::restore::handle_restore(ctx, args),
        Commands::Upgrade(args) => commands::upgrade::handle_upgrade(ctx, args),
        Commands::Uninstall(args) => commands::uninstall::handle_uninstall(ctx, args),
        Commands::Configure(args) => commands::configure::handle_configure(ctx, args),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let color = ui::color_wanted(cli.no_color);
    if let Err(e) = run(cli) {
        tracing::error!("Command execution failed: {:?}", e);
        Console::new(color).error(&format!("Error: {:#}", e));
        std::process::exit(1);
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["drim", "status", "--yes", "--non-interactive", "-vv"]).unwrap();
        assert!(cli.yes);
        assert!(cli.non_interactive);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Status(_)));
    }

    #[test]
    fn test_update_alias() {
        let cli = Cli::try_parse_from(["drim", "update"]).unwrap();
        assert!(matches!(cli.command, Commands::Upgrade(_)));
    }

    #[test]
    fn test_deploy_short_flags() {
        let cli = Cli::try_parse_from([
            "drim", "deploy", "-p", "traefik", "-d", "kaneo.example.com", "-s", "-r", "-j", "abc",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Deploy(_)));
    }

    #[test]
    fn test_deploy_disable_register_alias() {
        assert!(Cli::try_parse_from(["drim", "deploy", "--disable-register"]).is_ok());
    }

    #[test]
    fn test_restore_requires_file() {
        assert!(Cli::try_parse_from(["drim", "restore"]).is_err());
        assert!(Cli::try_parse_from(["drim", "restore", "--file", "x.db"]).is_ok());
    }

    #[test]
    fn test_parsed_arguments_debug_hides_secrets() {
        let deploy = Cli::try_parse_from([
            "drim", "-vv", "deploy", "-p", "none", "-j", "TOPSECRETvalue123", "--generate-only",
        ])
        .unwrap();
        assert!(!format!("{:?}", deploy).contains("TOPSECRETvalue123"));

        let setup = Cli::try_parse_from([
            "drim", "setup", "--auth-secret", "authTOPSECRET", "--postgres-password", "pgTOPSECRET",
        ])
        .unwrap();
        assert!(!format!("{:?}", setup).contains("TOPSECRET"));
    }
}
