//! # Artifact Generation Pass
//!
//! File: cli/src/commands/generate.rs
//!
//! ## Overview
//!
//! The part of `setup` and `deploy` that does not touch the container
//! runtime:
//!
//! 1. Resolve flags and prompts into a `TopologyConfig` (`TopologyBuilder`).
//! 2. Report every correction and generated secret.
//! 3. Render all artifacts in memory.
//! 4. Warn about proxy files left by an earlier run with another mode.
//! 5. Write the artifacts.
//!
//! A failure in steps 1-3 leaves the working directory untouched.
//!
use super::AppContext;
use crate::common::ui::Console;
use crate::core::error::{DrimError, Result};
use crate::generator::builder::{BuildError, RawInputs, TopologyBuilder};
use crate::generator::render;
use crate::generator::topology::{Profile, ProxyMode, TopologyConfig};
use anyhow::{anyhow, Context};
use tracing::info;

fn build_error(err: BuildError) -> anyhow::Error {
    match err {
        BuildError::Validation(source) => anyhow!(DrimError::Validation { source }),
        BuildError::Secret(source) => anyhow!(DrimError::Secret { source }),
        BuildError::Prompt(source) => anyhow!(source).context("Failed to read operator input"),
    }
}

/// Resolves, renders and writes the artifacts for `profile`.
pub fn generate(ctx: &mut AppContext, profile: Profile, inputs: RawInputs) -> Result<TopologyConfig> {
    let builder = TopologyBuilder::new(profile, &ctx.settings, ctx.secrets.as_ref());
    let resolution = builder
        .build(inputs, ctx.prompter.as_mut())
        .map_err(build_error)?;

    for notice in &resolution.notices {
        if notice.is_warning() {
            ctx.console.warn(&notice.to_string());
        } else {
            ctx.console.info(&notice.to_string());
        }
    }

    let config = resolution.config;
    let artifacts = render::render_artifacts(&config).context("Failed to render artifacts")?;

    for stale in artifacts.stale_proxy_files(&ctx.workdir) {
        ctx.console.warn(&format!(
            "{} is left over from a previous run and is no longer used by compose.yml",
            stale.display()
        ));
    }

    ctx.console.info("Writing configuration files...");
    let written = artifacts.write_to(&ctx.workdir)?;
    for path in &written {
        ctx.console.success(&format!("Created {}", path.display()));
    }
    info!("Generation pass wrote {} file(s)", written.len());

    print_proxy_hints(&ctx.console, &config);
    Ok(config)
}

/// Operator follow-ups the generated files cannot do on their own.
fn print_proxy_hints(console: &Console, cfg: &TopologyConfig) {
    match cfg.proxy_mode {
        ProxyMode::Traefik => {
            if let Some(api_host) = cfg.api_host() {
                console.info(&format!(
                    "Point DNS for both {} and {} at this server.",
                    cfg.domain_str(),
                    api_host
                ));
            }
        }
        ProxyMode::Nginx if cfg.https_enabled() => {
            console.warn("HTTPS with nginx needs certificates you provide:");
            console.detail("certificate", "./certs/fullchain.pem");
            console.detail("private key", "./certs/privkey.pem");
            console.info(&format!(
                "For example: certbot certonly --standalone -d {}",
                cfg.domain_str()
            ));
        }
        ProxyMode::Caddy if cfg.https_enabled() => {
            console.info("Caddy will obtain HTTPS certificates automatically on first start.");
        }
        _ => {}
    }
}

/// Where the running stack will be reachable.
pub fn print_access_summary(console: &Console, cfg: &TopologyConfig) {
    console.blank();
    console.detail("Web", &cfg.client_url());
    console.detail("API", &cfg.api_url());
}
