//! # Drim Setup Handler
//!
//! File: cli/src/commands/setup.rs
//!
//! ## Overview
//!
//! `drim setup` installs the PostgreSQL-backed stack: backend, frontend, a
//! dedicated `postgres` service and, unless `--proxy none` is given, a Caddy
//! reverse proxy. Caddy switches to automatic HTTPS when a domain is set.
//!
//! ## Architecture
//!
//! 1. Check the container runtime (skipped with `--generate-only`).
//! 2. Run the generation pass with the `Setup` profile.
//! 3. Pull images and bring the stack up.
//!
//! ## Usage
//!
//! ```bash
//! # Local install on http://localhost
//! drim setup
//!
//! # Public install with automatic HTTPS
//! drim setup --domain kaneo.example.com
//!
//! # Files only, no containers
//! drim setup --proxy none --generate-only
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
use tracing::info;

#[derive(Parser, Default)]
#[command(about = "Install Kaneo with PostgreSQL and an optional Caddy proxy")]
pub struct SetupArgs {
    /// Public domain, e.g. kaneo.example.com. Enables HTTPS with Caddy.
    #[arg(long)]
    domain: Option<String>,

    /// Reverse proxy: caddy (default) or none.
    #[arg(long)]
    proxy: Option<String>,

    /// Request HTTPS. With Caddy it follows the domain either way.
    #[arg(long)]
    https: bool,

    /// Disable new account registration.
    #[arg(long)]
    disable_registration: bool,

    /// Use this auth secret instead of generating one.
    #[arg(long)]
    auth_secret: Option<String>,

    /// Use this database password instead of generating one.
    #[arg(long)]
    postgres_password: Option<String>,

    /// Write the configuration files and stop.
    #[arg(long)]
    generate_only: bool,
}

// Hand-written so `-vv` never prints the supplied secrets.
impl fmt::Debug for SetupArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SetupArgs")
            .field("domain", &self.domain)
            .field("proxy", &self.proxy)
            .field("https", &self.https)
            .field("disable_registration", &self.disable_registration)
            .field("auth_secret", &self.auth_secret.as_ref().map(|_| "<redacted>"))
            .field(
                "postgres_password",
                &self.postgres_password.as_ref().map(|_| "<redacted>"),
            )
            .field("generate_only", &self.generate_only)
            .finish()
    }
}

impl SetupArgs {
    fn inputs(&self) -> RawInputs {
        RawInputs {
            domain: self.domain.clone(),
            proxy: self.proxy.clone(),
            https: self.https,
            disable_registration: self.disable_registration,
            secret: self.auth_secret.clone(),
            postgres_password: self.postgres_password.clone(),
        }
    }
}

pub fn handle_setup(ctx: &mut AppContext, args: SetupArgs) -> Result<()> {
    info!("Handling setup command...");
    ctx.console.banner("Kaneo Setup");

    if !args.generate_only {
        ctx.ensure_runtime()?;
    }

    let config = generate(ctx, Profile::Setup, args.inputs())?;

    if args.generate_only {
        ctx.console
            .info("Files written. Start the stack later with `drim start`.");
        return Ok(());
    }

    ctx.console.info("Pulling images...");
    ctx.driver.pull().context("Failed to pull images")?;
    ctx.console.info("Starting services...");
    ctx.driver.up().context("Failed to start services")?;

    ctx.console.success("Kaneo is up.");
    print_access_summary(&ctx.console, &config);
    Ok(())
}
