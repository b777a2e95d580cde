//! # Drim Template System
//!
//! File: cli/src/core/templating.rs
//!
//! ## Overview
//!
//! Every artifact Drim writes is a Tera template compiled into the binary
//! from `cli/templates/`. This module owns the Tera engine: it registers the
//! embedded templates, turns a serializable context into a `tera::Context`,
//! and renders a template by name.
//!
//! Autoescaping is disabled for all templates. The artifacts are YAML, nginx,
//! Caddyfile and dotenv text, none of which use HTML escaping. Values are
//! made safe before they reach the engine: domains, ports and identifiers are
//! validated by the builder and secrets use a restricted alphabet.
//!
//! Rendering is deterministic. Templates only read from the context, so the
//! same context always yields byte-identical output.
//!
use crate::core::error::{DrimError, Result};
use anyhow::{anyhow, Context};
use serde::Serialize;
use tera::Tera;
use tracing::debug;

/// Embedded artifact templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    ComposeBasic,
    ComposeTraefik,
    ComposeNginx,
    ComposeCaddy,
    NginxConf,
    Caddyfile,
    EnvFile,
}

impl Template {
    pub const ALL: [Template; 7] = [
        Template::ComposeBasic,
        Template::ComposeTraefik,
        Template::ComposeNginx,
        Template::ComposeCaddy,
        Template::NginxConf,
        Template::Caddyfile,
        Template::EnvFile,
    ];

    /// Name the template is registered under.
    pub fn name(self) -> &'static str {
        match self {
            Template::ComposeBasic => "compose.basic.yml",
            Template::ComposeTraefik => "compose.traefik.yml",
            Template::ComposeNginx => "compose.nginx.yml",
            Template::ComposeCaddy => "compose.caddy.yml",
            Template::NginxConf => "nginx.conf",
            Template::Caddyfile => "Caddyfile",
            Template::EnvFile => "env",
        }
    }

    fn source(self) -> &'static str {
        match self {
            Template::ComposeBasic => include_str!("../../templates/compose.basic.yml.tera"),
            Template::ComposeTraefik => include_str!("../../templates/compose.traefik.yml.tera"),
            Template::ComposeNginx => include_str!("../../templates/compose.nginx.yml.tera"),
            Template::ComposeCaddy => include_str!("../../templates/compose.caddy.yml.tera"),
            Template::NginxConf => include_str!("../../templates/nginx.conf.tera"),
            Template::Caddyfile => include_str!("../../templates/Caddyfile.tera"),
            Template::EnvFile => include_str!("../../templates/env.tera"),
        }
    }
}

/// Builds a Tera engine holding every embedded template.
fn engine() -> Result<Tera> {
    let mut tera = Tera::default();
    tera.autoescape_on(vec![]);
    tera.add_raw_templates(Template::ALL.iter().map(|t| (t.name(), t.source())))
        .map_err(|e| {
            anyhow!(DrimError::Template { source: e })
                .context("Failed to register embedded artifact templates")
        })?;
    Ok(tera)
}

/// Renders `template` with the serialized `context`.
pub fn render<C: Serialize>(template: Template, context: &C) -> Result<String> {
    let tera = engine()?;
    let tera_context = tera::Context::from_serialize(context).map_err(|e| {
        anyhow!(DrimError::Template { source: e }).context("Failed to create Tera context")
    })?;
    let rendered = tera
        .render(template.name(), &tera_context)
        .map_err(|e| anyhow!(DrimError::Template { source: e }))
        .with_context(|| format!("Tera rendering failed for template '{}'", template.name()))?;
    debug!(
        "Rendered template '{}' ({} bytes)",
        template.name(),
        rendered.len()
    );
    Ok(rendered)
}
