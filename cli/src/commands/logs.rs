//! # Drim Logs Handler
//!
//! File: cli/src/commands/logs.rs
//!
//! ## Overview
//!
//! `drim logs` shows `compose logs` for the whole stack or one service.
//! The service name is checked against the services Drim generates so a
//! typo fails here instead of inside the runtime.
//!
//! ## Usage
//!
//! ```bash
//! drim logs
//! drim logs backend -f
//! drim logs caddy --tail 200
//! ```
//!
use super::AppContext;
use crate::common::docker::LogOptions;
use crate::core::error::{DrimError, Result};
use crate::generator::topology::{BACKEND_SERVICE, DATABASE_SERVICE, FRONTEND_SERVICE};
use anyhow::{anyhow, Context};
use clap::Parser;
use tracing::info;

/// Every service name a generated `compose.yml` can contain.
pub const KNOWN_SERVICES: [&str; 6] = [
    BACKEND_SERVICE,
    FRONTEND_SERVICE,
    DATABASE_SERVICE,
    "traefik",
    "nginx",
    "caddy",
];

#[derive(Parser, Debug, Default)]
#[command(about = "Show logs of the Kaneo services")]
pub struct LogsArgs {
    /// Only this service (backend, frontend, postgres, traefik, nginx, caddy).
    service: Option<String>,

    /// Keep streaming new log lines.
    #[arg(short, long)]
    follow: bool,

    /// Lines to show from the end of each log, or "all".
    #[arg(short = 'n', long)]
    tail: Option<String>,
}

fn check_tail(tail: &str) -> Result<()> {
    if tail == "all" || tail.parse::<u64>().is_ok() {
        Ok(())
    } else {
        Err(anyhow!(DrimError::Config(format!(
            "Invalid --tail value '{}': expected a number or 'all'.",
            tail
        ))))
    }
}

fn check_service(service: &str) -> Result<()> {
    if KNOWN_SERVICES.contains(&service) {
        Ok(())
    } else {
        Err(anyhow!(DrimError::Config(format!(
            "Unknown service '{}'. Expected one of: {}.",
            service,
            KNOWN_SERVICES.join(", ")
        ))))
    }
}

pub fn handle_logs(ctx: &mut AppContext, args: LogsArgs) -> Result<()> {
    info!("Handling logs command...");
    if let Some(service) = &args.service {
        check_service(service)?;
    }
    if let Some(tail) = &args.tail {
        check_tail(tail)?;
    }
    ctx.require_compose_file()?;

    let options = LogOptions {
        service: args.service,
        follow: args.follow,
        tail: args.tail,
    };
    ctx.driver.logs(&options).context("Failed to show logs")?;
    Ok(())
}
