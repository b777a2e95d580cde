//! # Drim Deploy Handler
//!
//! File: cli/src/commands/deploy.rs
//!
//! ## Overview
//!
//! `drim deploy` generates the SQLite-backed stack: backend and frontend,
//! the database file kept in a named volume, and optionally Traefik
//! (host-based routing, Let's Encrypt) or nginx (path-based routing,
//! operator-provided certificates) in front.
//!
//! ## Architecture
//!
//! 1. Run the generation pass with the `Deploy` profile.
//! 2. Decide whether to start now: `--yes` starts, an interactive operator
//!    is asked (default yes), otherwise the command stops after printing how
//!    to start later.
//! 3. Check the runtime, pull, and bring the stack up.
//!
//! ## Usage
//!
//! ```bash
//! # Interactive: asks for proxy and domain
//! drim deploy
//!
//! # Traefik with Let's Encrypt, registration closed
//! drim deploy -p traefik -d kaneo.example.com -s -r
//!
//! # Unattended
//! drim --non-interactive --yes deploy -p nginx -d kaneo.example.com
//! ```
//!
use super::generate::{generate, print_access_summary};
use super::AppContext;
use crate::core::error::Result;
use crate::generator::builder::RawInputs;
use crate::generator::topology::Profile;
use anyhow::Context;
use clap::Parser;
use std::fmt;
use tracing::{debug, info};

#[derive(Parser, Default)]
#[command(about = "Deploy Kaneo with SQLite and an optional Traefik or nginx proxy")]
pub struct DeployArgs {
    /// Public domain, e.g. kaneo.example.com. Required for traefik and nginx.
    #[arg(short, long)]
    domain: Option<String>,

    /// Reverse proxy: none, traefik or nginx. Asked for when omitted.
    #[arg(short, long)]
    proxy: Option<String>,

    /// Serve over HTTPS (ignored without a proxy).
    #[arg(short = 's', long)]
    https: bool,

    /// Disable new account registration.
    #[arg(short = 'r', long, alias = "disable-register")]
    disable_registration: bool,

    /// Use this JWT secret instead of generating one.
    #[arg(short, long = "jwt")]
    jwt: Option<String>,

    /// Write the configuration files and stop.
    #[arg(long)]
    generate_only: bool,
}

// Hand-written so `-vv` never prints the JWT secret.
impl fmt::Debug for DeployArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeployArgs")
            .field("domain", &self.domain)
            .field("proxy", &self.proxy)
            .field("https", &self.https)
            .field("disable_registration", &self.disable_registration)
            .field("jwt", &self.jwt.as_ref().map(|_| "<redacted>"))
            .field("generate_only", &self.generate_only)
            .finish()
    }
}

impl DeployArgs {
    fn inputs(&self) -> RawInputs {
        RawInputs {
            domain: self.domain.clone(),
            proxy: self.proxy.clone(),
            https: self.https,
            disable_registration: self.disable_registration,
            secret: self.jwt.clone(),
            postgres_password: None,
        }
    }
}

fn should_start(ctx: &mut AppContext) -> Result<bool> {
    if ctx.assume_yes {
        return Ok(true);
    }
    if !ctx.prompter.is_interactive() {
        debug!("Not starting: no terminal and no --yes");
        return Ok(false);
    }
    Ok(ctx.prompter.confirm("Start Kaneo now?", true)?)
}

pub fn handle_deploy(ctx: &mut AppContext, args: DeployArgs) -> Result<()> {
    info!("Handling deploy command...");
    ctx.console.banner("Kaneo Deploy");

    let config = generate(ctx, Profile::Deploy, args.inputs())?;

    if args.generate_only || !should_start(ctx)? {
        ctx.console.info("Start the stack later with `drim start`.");
        return Ok(());
    }

    ctx.ensure_runtime()?;
    ctx.console.info("Pulling images...");
    ctx.driver.pull().context("Failed to pull images")?;
    ctx.console.info("Starting services...");
    ctx.driver.up().context("Failed to start services")?;

    ctx.console.success("Kaneo is up.");
    print_access_summary(&ctx.console, &config);
    Ok(())
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::*;
    use std::fs;

    fn traefik_args() -> DeployArgs {
        DeployArgs {
            domain: Some("kaneo.example.com".into()),
            proxy: Some("traefik".into()),
            https: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_deploy_non_interactive_only_writes() {
        let dir = tempfile::tempdir().unwrap();
        let (fake, calls) = driver();
        let mut ctx = context(dir.path(), fake);
        handle_deploy(&mut ctx, traefik_args()).unwrap();
        assert!(calls.borrow().is_empty());
        let compose = fs::read_to_string(dir.path().join("compose.yml")).unwrap();
        assert!(compose.contains("Host(`api.kaneo.example.com`)"));
        let env = fs::read_to_string(dir.path().join(".env")).unwrap();
        assert!(env.contains("JWT_ACCESS="));
        assert!(!env.contains("DATABASE_URL="));
    }

    #[test]
    fn test_deploy_yes_starts() {
        let dir = tempfile::tempdir().unwrap();
        let (fake, calls) = driver();
        let mut ctx = context(dir.path(), fake);
        ctx.assume_yes = true;
        handle_deploy(&mut ctx, traefik_args()).unwrap();
        assert_eq!(*calls.borrow(), vec!["pull", "up"]);
    }

    #[test]
    fn test_deploy_interactive_prompts_then_starts() {
        let dir = tempfile::tempdir().unwrap();
        let (fake, calls) = driver();
        // Proxy menu (2 = nginx), domain, then the default answer to "start now".
        let mut ctx = interactive_context(dir.path(), fake, &["2", "kaneo.example.com", ""]);
        let args = DeployArgs::default();
        handle_deploy(&mut ctx, args).unwrap();
        assert!(dir.path().join("nginx.conf").is_file());
        assert_eq!(*calls.borrow(), vec!["pull", "up"]);
    }

    #[test]
    fn test_deploy_generate_only_never_starts() {
        let dir = tempfile::tempdir().unwrap();
        let (fake, calls) = driver();
        let mut ctx = context(dir.path(), fake);
        ctx.assume_yes = true;
        let args = DeployArgs {
            generate_only: true,
            ..traefik_args()
        };
        handle_deploy(&mut ctx, args).unwrap();
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_deploy_explicit_jwt_used() {
        let dir = tempfile::tempdir().unwrap();
        let (fake, _) = driver();
        let mut ctx = context(dir.path(), fake);
        let args = DeployArgs {
            proxy: Some("none".into()),
            jwt: Some("operator_supplied-secret".into()),
            ..Default::default()
        };
        handle_deploy(&mut ctx, args).unwrap();
        let env = fs::read_to_string(dir.path().join(".env")).unwrap();
        assert!(env.contains("JWT_ACCESS=operator_supplied-secret"));
    }

    #[test]
    fn test_debug_output_hides_jwt() {
        let args = DeployArgs {
            jwt: Some("TOPSECRETvalue123".into()),
            ..traefik_args()
        };
        let shown = format!("{:?}", args);
        assert!(!shown.contains("TOPSECRETvalue123"));
        assert!(shown.contains("<redacted>"));
        assert!(shown.contains("kaneo.example.com"));
    }
}
