//! # Artifact Renderer
//!
//! File: cli/src/generator/render.rs
//!
//! ## Overview
//!
//! Maps a resolved `TopologyConfig` to the text of every artifact. All
//! functions here are pure: no clock, no randomness, no filesystem. The same
//! config always renders to byte-identical text.
//!
//! ## Architecture
//!
//! A single `RenderContext` is derived from the config and handed to every
//! template. Service names, ports, URLs and the secret exist in exactly one
//! place in that context, which is what keeps the compose manifest, the
//! proxy file and `.env` in agreement.
//!
//! | Proxy mode | Compose template      | Proxy file              |
//! |------------|-----------------------|-------------------------|
//! | none       | `compose.basic.yml`   | none                    |
//! | traefik    | `compose.traefik.yml` | none (labels in compose)|
//! | nginx      | `compose.nginx.yml`   | `nginx.conf`            |
//! | caddy      | `compose.caddy.yml`   | `Caddyfile`             |
//!
//! `render_artifacts` checks the config before rendering, so a topology that
//! breaks an invariant (nginx without a domain, HTTPS with no proxy to
//! terminate it) never reaches a template.
//!
use crate::core::config::ImageSet;
use crate::core::error::{DrimError, Result};
use crate::core::templating::{self, Template};
use crate::generator::artifacts::{Artifact, ArtifactKind, ArtifactSet};
use crate::generator::topology::{
    Database, ProxyMode, TopologyConfig, BACKEND_SERVICE, DATABASE_SERVICE, FRONTEND_SERVICE,
    SQLITE_DATA_DIR, SQLITE_DB_PATH,
};
use anyhow::anyhow;
use serde::Serialize;
use tracing::{debug, info};

#[derive(Serialize, Debug)]
struct ServiceNames {
    backend: &'static str,
    frontend: &'static str,
    database: &'static str,
    proxy: &'static str,
}

/// Values visible to the templates.
#[derive(Serialize, Debug)]
struct RenderContext<'a> {
    service: ServiceNames,
    images: &'a ImageSet,
    domain: &'a str,
    api_host: String,
    https: bool,
    client_url: String,
    api_url: String,
    api_port: &'a str,
    web_port: &'a str,
    secret_var: &'static str,
    secret: &'a str,
    disable_registration: bool,
    sqlite: bool,
    sqlite_data_dir: &'static str,
    sqlite_db_path: &'static str,
    database_url: String,
    postgres_user: &'a str,
    postgres_password: &'a str,
    postgres_db: &'a str,
    acme_email: String,
}

impl<'a> RenderContext<'a> {
    fn new(cfg: &'a TopologyConfig) -> Self {
        Self {
            service: ServiceNames {
                backend: BACKEND_SERVICE,
                frontend: FRONTEND_SERVICE,
                database: DATABASE_SERVICE,
                proxy: cfg.proxy_mode.service_name().unwrap_or(""),
            },
            images: &cfg.images,
            domain: cfg.domain_str(),
            api_host: cfg.api_host().unwrap_or_default(),
            https: cfg.https_enabled(),
            client_url: cfg.client_url(),
            api_url: cfg.api_url(),
            api_port: &cfg.api_port,
            web_port: &cfg.web_port,
            secret_var: cfg.profile.secret_var(),
            secret: &cfg.auth_secret,
            disable_registration: cfg.disable_registration,
            sqlite: cfg.database() == Database::Sqlite,
            sqlite_data_dir: SQLITE_DATA_DIR,
            sqlite_db_path: SQLITE_DB_PATH,
            database_url: cfg.database_url().unwrap_or_default(),
            postgres_user: &cfg.postgres.user,
            postgres_password: &cfg.postgres.password,
            postgres_db: &cfg.postgres.db,
            acme_email: cfg.acme_email(),
        }
    }
}

/// Compose manifest for proxy mode `none`: ports published on localhost.
pub fn render_compose_basic(cfg: &TopologyConfig) -> Result<String> {
    templating::render(Template::ComposeBasic, &RenderContext::new(cfg))
}

/// Compose manifest with Traefik routing labels (`domain`, `api.domain`).
pub fn render_compose_traefik(cfg: &TopologyConfig) -> Result<String> {
    templating::render(Template::ComposeTraefik, &RenderContext::new(cfg))
}

/// Compose manifest fronted by nginx.
pub fn render_compose_nginx(cfg: &TopologyConfig) -> Result<String> {
    templating::render(Template::ComposeNginx, &RenderContext::new(cfg))
}

/// Compose manifest fronted by Caddy, with the Postgres service.
pub fn render_compose_caddy(cfg: &TopologyConfig) -> Result<String> {
    templating::render(Template::ComposeCaddy, &RenderContext::new(cfg))
}

/// nginx server block: `/` to the web client, `/api/` to the API with the
/// prefix stripped.
pub fn render_nginx_conf(cfg: &TopologyConfig) -> Result<String> {
    templating::render(Template::NginxConf, &RenderContext::new(cfg))
}

/// Caddyfile: a domain site (automatic HTTPS) when a domain is set, plus a
/// plain `:80` site.
pub fn render_caddyfile(cfg: &TopologyConfig) -> Result<String> {
    templating::render(Template::Caddyfile, &RenderContext::new(cfg))
}

/// `.env` with one unquoted `KEY=value` line per setting.
pub fn render_env_file(cfg: &TopologyConfig) -> Result<String> {
    templating::render(Template::EnvFile, &RenderContext::new(cfg))
}

/// Renders every artifact for `cfg` in memory.
pub fn render_artifacts(cfg: &TopologyConfig) -> Result<ArtifactSet> {
    cfg.check()
        .map_err(|e| anyhow!(DrimError::from(e)).context("Refusing to render an invalid topology"))?;
    debug!("Rendering artifacts for proxy mode '{}'", cfg.proxy_mode);

    let compose_text = match cfg.proxy_mode {
        ProxyMode::None => render_compose_basic(cfg)?,
        ProxyMode::Traefik => render_compose_traefik(cfg)?,
        ProxyMode::Nginx => render_compose_nginx(cfg)?,
        ProxyMode::Caddy => render_compose_caddy(cfg)?,
    };
    let proxy = match cfg.proxy_mode {
        ProxyMode::Nginx => Some(Artifact::new(ArtifactKind::NginxConf, render_nginx_conf(cfg)?)),
        ProxyMode::Caddy => Some(Artifact::new(ArtifactKind::Caddyfile, render_caddyfile(cfg)?)),
        ProxyMode::None | ProxyMode::Traefik => None,
    };

    let set = ArtifactSet {
        compose: Artifact::new(ArtifactKind::Compose, compose_text),
        proxy,
        env: Artifact::new(ArtifactKind::Env, render_env_file(cfg)?),
    };
    info!(
        "Rendered {} artifact(s) for proxy mode '{}'",
        set.iter().count(),
        cfg.proxy_mode
    );
    Ok(set)
}
