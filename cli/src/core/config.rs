//! # Drim Settings
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! Loads the tool settings: which container runtime binary to call, which
//! image references to deploy, default ports and database names, and where
//! backups go. These are *tool* settings. The deployment topology itself
//! (domain, proxy, secrets) is resolved per invocation by
//! `generator::builder` and never stored here.
//!
//! Sources, in order of precedence:
//! 1. Project `.drim.toml` in the current directory or an ancestor (the search
//!    stops at a directory containing `.git`)
//! 2. User `~/.config/drim/config.toml` (platform equivalent via `directories`)
//! 3. Defaults defined in this file
//!
//! ```toml
//! [runtime]
//! binary = "podman"
//!
//! [images]
//! api = "ghcr.io/usekaneo/api:v1.2.0"
//!
//! [defaults]
//! web_port = "8080"
//!
//! [backup]
//! directory = "~/kaneo-backups"
//! ```
//!
use crate::core::error::{DrimError, Result};
use crate::generator::builder::{validate_email, validate_identifier, validate_port};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// Final settings for one invocation: built-in defaults with the user file
/// and then the project file applied on top.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Config {
    pub runtime: RuntimeConfig,
    pub images: ImageSet,
    pub defaults: DefaultsConfig,
    pub backup: BackupConfig,
}

/// External programs Drim shells out to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Container runtime binary providing a `compose` subcommand.
    pub binary: String,
    /// Editor for `drim configure`. Falls back to `$EDITOR`, then `nano`.
    pub editor: Option<String>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            binary: default_runtime_binary(),
            editor: None,
        }
    }
}

/// Image references for every service Drim can render.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ImageSet {
    pub api: String,
    pub web: String,
    pub postgres: String,
    pub traefik: String,
    pub nginx: String,
    pub caddy: String,
}

impl Default for ImageSet {
    fn default() -> Self {
        Self {
            api: default_api_image(),
            web: default_web_image(),
            postgres: default_postgres_image(),
            traefik: default_traefik_image(),
            nginx: default_nginx_image(),
            caddy: default_caddy_image(),
        }
    }
}

impl ImageSet {
    /// All image references, used by `drim uninstall` for image removal.
    pub fn all(&self) -> Vec<&str> {
        vec![
            &self.api,
            &self.web,
            &self.postgres,
            &self.traefik,
            &self.nginx,
            &self.caddy,
        ]
    }
}

/// Default values offered to the topology builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultsConfig {
    pub api_port: String,
    pub web_port: String,
    pub postgres_user: String,
    pub postgres_db: String,
    /// ACME registration e-mail for Traefik. Defaults to `admin@<domain>`.
    pub acme_email: Option<String>,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            api_port: default_api_port(),
            web_port: default_web_port(),
            postgres_user: default_postgres_name(),
            postgres_db: default_postgres_name(),
            acme_email: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupConfig {
    /// Directory for `drim backup` output (can use ~).
    pub directory: String,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            directory: default_backup_dir(),
        }
    }
}

/// One settings file as written on disk. `None` means the file leaves the
/// key alone, so a lower layer keeps its value.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    runtime: RuntimeFile,
    #[serde(default)]
    images: ImagesFile,
    #[serde(default)]
    defaults: DefaultsFile,
    #[serde(default)]
    backup: BackupFile,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct RuntimeFile {
    binary: Option<String>,
    editor: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct ImagesFile {
    api: Option<String>,
    web: Option<String>,
    postgres: Option<String>,
    traefik: Option<String>,
    nginx: Option<String>,
    caddy: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct DefaultsFile {
    api_port: Option<String>,
    web_port: Option<String>,
    postgres_user: Option<String>,
    postgres_db: Option<String>,
    acme_email: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct BackupFile {
    directory: Option<String>,
}

fn set(target: &mut String, value: Option<String>) {
    if let Some(value) = value {
        *target = value;
    }
}

impl Config {
    /// Overwrites every key `file` sets explicitly.
    fn apply(&mut self, file: ConfigFile) {
        set(&mut self.runtime.binary, file.runtime.binary);
        if file.runtime.editor.is_some() {
            self.runtime.editor = file.runtime.editor;
        }

        set(&mut self.images.api, file.images.api);
        set(&mut self.images.web, file.images.web);
        set(&mut self.images.postgres, file.images.postgres);
        set(&mut self.images.traefik, file.images.traefik);
        set(&mut self.images.nginx, file.images.nginx);
        set(&mut self.images.caddy, file.images.caddy);

        set(&mut self.defaults.api_port, file.defaults.api_port);
        set(&mut self.defaults.web_port, file.defaults.web_port);
        set(&mut self.defaults.postgres_user, file.defaults.postgres_user);
        set(&mut self.defaults.postgres_db, file.defaults.postgres_db);
        if file.defaults.acme_email.is_some() {
            self.defaults.acme_email = file.defaults.acme_email;
        }

        set(&mut self.backup.directory, file.backup.directory);
    }
}

fn default_runtime_binary() -> String {
    "docker".to_string()
}
fn default_api_image() -> String {
    "ghcr.io/usekaneo/api:latest".to_string()
}
fn default_web_image() -> String {
    "ghcr.io/usekaneo/web:latest".to_string()
}
fn default_postgres_image() -> String {
    "postgres:16-alpine".to_string()
}
fn default_traefik_image() -> String {
    "traefik:v3.3".to_string()
}
fn default_nginx_image() -> String {
    "nginx:alpine".to_string()
}
fn default_caddy_image() -> String {
    "caddy:2-alpine".to_string()
}
fn default_api_port() -> String {
    "1337".to_string()
}
fn default_web_port() -> String {
    "5173".to_string()
}
fn default_postgres_name() -> String {
    "kaneo".to_string()
}
fn default_backup_dir() -> String {
    "./backups".to_string()
}

const PROJECT_CONFIG_FILENAME: &str = ".drim.toml";

/// Loads, merges, expands and validates settings for this invocation.
pub fn load_config() -> Result<Config> {
    let user_config = load_user_config()?;
    let project_config = load_project_config()?;
    let mut merged_config = merge_configs(user_config, project_config);
    expand_config_paths(&mut merged_config);
    validate_config(&merged_config).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", merged_config);
    Ok(merged_config)
}

fn load_user_config() -> Result<Option<ConfigFile>> {
    if let Some(proj_dirs) = ProjectDirs::from("com", "Kaneo", "drim") {
        let config_path = proj_dirs.config_dir().join("config.toml");
        if config_path.exists() {
            info!("Loading user configuration from: {}", config_path.display());
            load_config_from_path(&config_path).map(Some)
        } else {
            debug!(
                "User configuration file not found at {}",
                config_path.display()
            );
            Ok(None)
        }
    } else {
        warn!("Could not determine user config directory.");
        Ok(None)
    }
}

fn load_project_config() -> Result<Option<ConfigFile>> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    match find_project_config_path(&current_dir) {
        Some(path) => {
            info!("Loading project configuration from: {}", path.display());
            load_config_from_path(&path).map(Some)
        }
        None => {
            debug!("No {} found in current directory or ancestors.", PROJECT_CONFIG_FILENAME);
            Ok(None)
        }
    }
}

fn find_project_config_path(start: &Path) -> Option<PathBuf> {
    let mut path = start;
    loop {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Some(project_config);
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return None;
        }
        path = path.parent()?;
    }
}

fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

/// Applies the user file, then the project file, over the built-in defaults.
fn merge_configs(user: Option<ConfigFile>, project: Option<ConfigFile>) -> Config {
    let mut config = Config::default();
    for file in [user, project].into_iter().flatten() {
        config.apply(file);
    }
    config
}

fn expand_config_paths(config: &mut Config) {
    config.backup.directory = shellexpand::tilde(&config.backup.directory).into_owned();
    debug!("Expanded backup directory: {}", config.backup.directory);
}

fn validate_config(config: &Config) -> Result<()> {
    info!("Validating final configuration...");
    if config.runtime.binary.trim().is_empty() {
        return Err(anyhow!(DrimError::Config(
            "runtime.binary cannot be empty.".to_string()
        )));
    }
    for image in config.images.all() {
        if image.trim().is_empty() || image.chars().any(|c| c.is_whitespace() || c == '"') {
            return Err(anyhow!(DrimError::Config(format!(
                "Invalid image reference: '{}'.",
                image
            ))));
        }
    }
    validate_port("defaults.api_port", &config.defaults.api_port).map_err(DrimError::from)?;
    validate_port("defaults.web_port", &config.defaults.web_port).map_err(DrimError::from)?;
    validate_identifier("defaults.postgres_user", &config.defaults.postgres_user)
        .map_err(DrimError::from)?;
    validate_identifier("defaults.postgres_db", &config.defaults.postgres_db)
        .map_err(DrimError::from)?;
    if let Some(email) = &config.defaults.acme_email {
        validate_email("defaults.acme_email", email).map_err(DrimError::from)?;
    }
    if config.backup.directory.trim().is_empty() {
        return Err(anyhow!(DrimError::Config(
            "backup.directory cannot be empty.".to_string()
        )));
    }
    info!("Configuration validation successful.");
    Ok(())
}
