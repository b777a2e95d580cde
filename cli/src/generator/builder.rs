//! # Topology Builder
//!
//! File: cli/src/generator/builder.rs
//!
//! ## Overview
//!
//! Turns raw operator input (command-line flags plus interactive answers)
//! into a fully resolved `TopologyConfig`, or fails with a `ValidationError`
//! naming the rule that was broken.
//!
//! One builder serves both entry points. The `Profile` decides which proxy
//! modes exist, which database backs the API, and how long the generated
//! signing secret is.
//!
//! ## Resolution
//!
//! Fields are resolved in this order:
//!
//! 1. **Domain**: trimmed, lower-cased, scheme (`http://`, `https://`) and
//!    trailing `/` stripped, then checked as a bare hostname.
//! 2. **Proxy mode**: an unrecognized value (or one the profile does not
//!    offer) opens the selection menu when interactive and falls back to
//!    `none` otherwise. Both cases are reported.
//! 3. **Domain requirement**: Traefik and nginx need a domain. Interactively
//!    the operator is asked for one and an empty answer degrades the mode to
//!    `none`; non-interactively the build fails. Caddy asks for an optional
//!    domain.
//! 4. **HTTPS**: cleared without a proxy. Caddy enables it exactly when a
//!    domain is present.
//! 5. **Secrets**: explicit values are validated and used verbatim; missing
//!    ones are generated. A generated signing secret is reported with its
//!    value so the operator can record it.
//!
//! The result is assembled into a new `TopologyConfig` and validated as a
//! whole before it is returned. Nothing is mutated in place.
//!
use crate::common::ui::Prompter;
use crate::core::config::Config;
use crate::core::secrets::{is_safe_secret, SecretError, SecretGenerator, PASSWORD_LENGTH};
use crate::generator::topology::{
    Database, PostgresCredentials, Profile, ProxyMode, TopologyConfig,
};
use std::fmt;
use std::io;
use thiserror::Error;
use tracing::{debug, info, warn};

const MAX_DOMAIN_LENGTH: usize = 253;
const MAX_DOMAIN_ATTEMPTS: usize = 3;

/// A configuration input that cannot be rendered.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("unknown proxy mode '{given}' (expected none, traefik, nginx or caddy)")]
    UnknownProxyMode { given: String },

    #[error("proxy mode '{mode}' is not available for this command")]
    UnsupportedProxyMode { mode: ProxyMode },

    #[error("proxy mode '{mode}' requires a domain (pass --domain)")]
    DomainRequired { mode: ProxyMode },

    #[error("proxy mode '{mode}' can only serve HTTPS with a domain")]
    HttpsRequiresDomain { mode: ProxyMode },

    #[error("invalid domain '{domain}': {reason}")]
    InvalidDomain { domain: String, reason: &'static str },

    #[error("invalid port for {name}: '{value}' (expected 1-65535)")]
    InvalidPort { name: &'static str, value: String },

    #[error("invalid value for {field}: '{value}' (only letters, digits and '_' allowed)")]
    InvalidIdentifier { field: &'static str, value: String },

    #[error("invalid e-mail address for {field}: '{value}' (expected local@domain)")]
    InvalidEmail { field: &'static str, value: String },

    #[error("{field} must not be empty")]
    EmptySecret { field: &'static str },

    #[error("{field} may only contain letters, digits, '-' and '_'")]
    UnsafeSecret { field: &'static str },
}

/// Failure while building a topology.
#[derive(Error, Debug)]
pub enum BuildError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Secret(#[from] SecretError),

    #[error("failed to read operator input: {0}")]
    Prompt(#[from] io::Error),
}

/// A correction or generated value the operator must be told about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The requested proxy mode was unusable; `chosen` replaced it.
    ProxyModeDefaulted {
        given: Option<String>,
        chosen: ProxyMode,
    },
    /// No domain was supplied for a mode that needs one.
    DomainMissing { mode: ProxyMode },
    /// `--https` was requested but cannot be honoured.
    HttpsDisabled { reason: &'static str },
    /// A scheme prefix was removed from the supplied domain.
    SchemeStripped { original: String, domain: String },
    /// A signing secret was generated. Not recoverable from anywhere else.
    SecretGenerated { var: &'static str, value: String },
    /// A database password was generated into the written files.
    PasswordGenerated,
}

impl Notice {
    /// Corrections are warnings; generated values are informational.
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            Notice::ProxyModeDefaulted { .. }
                | Notice::DomainMissing { .. }
                | Notice::HttpsDisabled { .. }
        )
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::ProxyModeDefaulted {
                given: Some(given),
                chosen,
            } => write!(f, "Proxy mode '{}' is not available, using '{}'", given, chosen),
            Notice::ProxyModeDefaulted {
                given: None,
                chosen,
            } => write!(f, "No proxy mode selected, using '{}'", chosen),
            Notice::DomainMissing { mode } => write!(
                f,
                "Proxy mode '{}' needs a domain and none was given, falling back to 'none'",
                mode
            ),
            Notice::HttpsDisabled { reason } => write!(f, "HTTPS disabled: {}", reason),
            Notice::SchemeStripped { original, domain } => {
                write!(f, "Using domain '{}' (scheme removed from '{}')", domain, original)
            }
            Notice::SecretGenerated { var, value } => write!(
                f,
                "Generated {}: {} (save it, it is only stored in .env)",
                var, value
            ),
            Notice::PasswordGenerated => {
                write!(f, "Generated a Postgres password (stored in .env)")
            }
        }
    }
}

/// Raw operator input, straight from the command-line flags.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RawInputs {
    pub domain: Option<String>,
    pub proxy: Option<String>,
    pub https: bool,
    pub disable_registration: bool,
    pub secret: Option<String>,
    pub postgres_password: Option<String>,
}

/// A resolved topology plus everything the operator must be told about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub config: TopologyConfig,
    pub notices: Vec<Notice>,
}

/// Checks that `value` is a decimal port in 1..=65535.
pub fn validate_port(name: &'static str, value: &str) -> Result<(), ValidationError> {
    let ok = !value.is_empty()
        && value.chars().all(|c| c.is_ascii_digit())
        && matches!(value.parse::<u32>(), Ok(1..=65535));
    if ok {
        Ok(())
    } else {
        Err(ValidationError::InvalidPort {
            name,
            value: value.to_string(),
        })
    }
}

/// Checks a database user/name: `[A-Za-z0-9_]+`.
pub fn validate_identifier(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if !value.is_empty() && value.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(())
    } else {
        Err(ValidationError::InvalidIdentifier {
            field,
            value: value.to_string(),
        })
    }
}

/// Checks an e-mail address: a plain local part, `@`, and a valid domain.
pub fn validate_email(field: &'static str, value: &str) -> Result<(), ValidationError> {
    let invalid = || ValidationError::InvalidEmail {
        field,
        value: value.to_string(),
    };
    let (local, domain) = value.rsplit_once('@').ok_or_else(invalid)?;
    let local_ok = !local.is_empty()
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "._%+-".contains(c));
    if !local_ok || domain.trim() != domain || domain.contains("://") {
        return Err(invalid());
    }
    match normalize_domain(domain) {
        Ok(Some(_)) => Ok(()),
        _ => Err(invalid()),
    }
}

/// A domain after normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedDomain {
    pub domain: String,
    pub scheme_stripped: bool,
}

/// Normalizes a supplied domain. Blank input yields `Ok(None)`.
pub fn normalize_domain(raw: &str) -> Result<Option<NormalizedDomain>, ValidationError> {
    let trimmed = raw.trim();
    let lowered = trimmed.to_ascii_lowercase();
    let (rest, scheme_stripped) = match lowered
        .strip_prefix("https://")
        .or_else(|| lowered.strip_prefix("http://"))
    {
        Some(rest) => (rest, true),
        None => (lowered.as_str(), false),
    };
    let domain = rest.trim_end_matches('/');
    if domain.is_empty() {
        return if scheme_stripped {
            Err(invalid_domain(trimmed, "no hostname after the scheme"))
        } else {
            Ok(None)
        };
    }

    if domain.len() > MAX_DOMAIN_LENGTH {
        return Err(invalid_domain(trimmed, "longer than 253 characters"));
    }
    if !domain
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
    {
        return Err(invalid_domain(
            trimmed,
            "only letters, digits, '.' and '-' are allowed (no paths or ports)",
        ));
    }
    if domain.starts_with(['.', '-']) || domain.ends_with(['.', '-']) {
        return Err(invalid_domain(trimmed, "must not start or end with '.' or '-'"));
    }
    if domain.contains("..") {
        return Err(invalid_domain(trimmed, "contains an empty label"));
    }

    Ok(Some(NormalizedDomain {
        domain: domain.to_string(),
        scheme_stripped,
    }))
}

fn invalid_domain(domain: &str, reason: &'static str) -> ValidationError {
    ValidationError::InvalidDomain {
        domain: domain.to_string(),
        reason,
    }
}

/// Resolves raw input into a `TopologyConfig` for one profile.
pub struct TopologyBuilder<'a> {
    profile: Profile,
    settings: &'a Config,
    secrets: &'a dyn SecretGenerator,
}

impl<'a> TopologyBuilder<'a> {
    pub fn new(profile: Profile, settings: &'a Config, secrets: &'a dyn SecretGenerator) -> Self {
        Self {
            profile,
            settings,
            secrets,
        }
    }

    /// Applies the resolution rules and validates the result.
    pub fn build(
        &self,
        inputs: RawInputs,
        prompter: &mut dyn Prompter,
    ) -> Result<Resolution, BuildError> {
        debug!("Resolving topology for {:?} from {:?}", self.profile, RedactedInputs(&inputs));
        let mut notices = Vec::new();

        let mut domain = self.resolve_domain(inputs.domain.as_deref(), &mut notices)?;
        let mut proxy_mode = self.resolve_proxy_mode(inputs.proxy.as_deref(), prompter, &mut notices)?;

        if domain.is_none() {
            if proxy_mode.requires_domain() {
                if !prompter.is_interactive() {
                    return Err(ValidationError::DomainRequired { mode: proxy_mode }.into());
                }
                domain = self.prompt_domain(
                    prompter,
                    "Please enter your domain name (e.g., kaneo.example.com):",
                    &mut notices,
                )?;
                if domain.is_none() {
                    notices.push(Notice::DomainMissing { mode: proxy_mode });
                    proxy_mode = ProxyMode::None;
                }
            } else if proxy_mode == ProxyMode::Caddy && prompter.is_interactive() {
                domain = self.prompt_domain(
                    prompter,
                    "Enter your domain for automatic HTTPS (leave empty for localhost):",
                    &mut notices,
                )?;
            }
        }

        let use_https = match proxy_mode {
            ProxyMode::None => {
                if inputs.https {
                    notices.push(Notice::HttpsDisabled {
                        reason: "no reverse proxy terminates TLS in proxy mode 'none'",
                    });
                }
                false
            }
            ProxyMode::Caddy => {
                if inputs.https && domain.is_none() {
                    notices.push(Notice::HttpsDisabled {
                        reason: "Caddy needs a domain to obtain certificates",
                    });
                }
                domain.is_some()
            }
            ProxyMode::Traefik | ProxyMode::Nginx => inputs.https,
        };

        let secret_var = self.profile.secret_var();
        let auth_secret = match supplied(inputs.secret.as_deref()) {
            Some(secret) => checked_secret(secret_var, secret)?,
            None => {
                let value = self.secrets.generate(self.profile.secret_length())?;
                notices.push(Notice::SecretGenerated {
                    var: secret_var,
                    value: value.clone(),
                });
                value
            }
        };

        let defaults = &self.settings.defaults;
        let password = match (self.profile.database(), supplied(inputs.postgres_password.as_deref())) {
            (Database::Postgres, Some(password)) => checked_secret("POSTGRES_PASSWORD", password)?,
            (Database::Postgres, None) => {
                let value = self.secrets.generate(PASSWORD_LENGTH)?;
                notices.push(Notice::PasswordGenerated);
                value
            }
            (Database::Sqlite, given) => {
                if given.is_some() {
                    debug!("Ignoring Postgres password: profile {:?} uses SQLite", self.profile);
                }
                String::new()
            }
        };

        validate_port("api_port", &defaults.api_port)?;
        validate_port("web_port", &defaults.web_port)?;
        validate_identifier("postgres_user", &defaults.postgres_user)?;
        validate_identifier("postgres_db", &defaults.postgres_db)?;

        let config = TopologyConfig {
            profile: self.profile,
            proxy_mode,
            domain,
            use_https,
            disable_registration: inputs.disable_registration,
            auth_secret,
            postgres: PostgresCredentials {
                user: defaults.postgres_user.clone(),
                password,
                db: defaults.postgres_db.clone(),
            },
            api_port: defaults.api_port.clone(),
            web_port: defaults.web_port.clone(),
            images: self.settings.images.clone(),
            acme_email: defaults.acme_email.clone(),
        };
        config.check()?;

        info!(
            "Resolved topology: proxy={}, domain={}, https={}",
            config.proxy_mode,
            config.domain.as_deref().unwrap_or("<localhost>"),
            config.use_https
        );
        Ok(Resolution { config, notices })
    }

    fn resolve_domain(
        &self,
        raw: Option<&str>,
        notices: &mut Vec<Notice>,
    ) -> Result<Option<String>, ValidationError> {
        let Some(raw) = raw else {
            return Ok(None);
        };
        let Some(normalized) = normalize_domain(raw)? else {
            return Ok(None);
        };
        if normalized.scheme_stripped {
            notices.push(Notice::SchemeStripped {
                original: raw.trim().to_string(),
                domain: normalized.domain.clone(),
            });
        }
        Ok(Some(normalized.domain))
    }

    /// Asks for a domain until the answer is valid or blank. Gives up with
    /// the last validation error after `MAX_DOMAIN_ATTEMPTS` invalid answers.
    fn prompt_domain(
        &self,
        prompter: &mut dyn Prompter,
        question: &str,
        notices: &mut Vec<Notice>,
    ) -> Result<Option<String>, BuildError> {
        let mut attempt = 1;
        loop {
            let answer = prompter.ask(question)?;
            match self.resolve_domain(Some(answer.as_str()), notices) {
                Ok(domain) => return Ok(domain),
                Err(err @ ValidationError::InvalidDomain { .. }) if attempt < MAX_DOMAIN_ATTEMPTS => {
                    warn!("{}. Try again, or leave empty to skip.", err);
                    attempt += 1;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    fn resolve_proxy_mode(
        &self,
        raw: Option<&str>,
        prompter: &mut dyn Prompter,
        notices: &mut Vec<Notice>,
    ) -> Result<ProxyMode, BuildError> {
        let given = raw.map(str::trim).filter(|s| !s.is_empty());
        match given {
            Some(text) => {
                if let Ok(mode) = text.parse::<ProxyMode>() {
                    if self.profile.supports(mode) {
                        return Ok(mode);
                    }
                }
                debug!("Proxy mode '{}' unusable for {:?}", text, self.profile);
            }
            None => {
                if let Some(mode) = self.profile.implicit_proxy() {
                    return Ok(mode);
                }
            }
        }

        if prompter.is_interactive() {
            let modes = self.profile.proxy_modes();
            let options: Vec<String> = modes
                .iter()
                .map(|m| format!("{} - {}", m, m.description()))
                .collect();
            let selection = prompter.select("Choose a reverse proxy:", &options)?;
            if let Some(mode) = selection.and_then(|i| modes.get(i).copied()) {
                // A menu choice replaces an unusable flag value; report that.
                if let Some(text) = given {
                    notices.push(Notice::ProxyModeDefaulted {
                        given: Some(text.to_string()),
                        chosen: mode,
                    });
                }
                return Ok(mode);
            }
        }

        notices.push(Notice::ProxyModeDefaulted {
            given: given.map(str::to_string),
            chosen: ProxyMode::None,
        });
        Ok(ProxyMode::None)
    }
}

/// Explicit value, with blank input treated as absent.
fn supplied(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn checked_secret(field: &'static str, value: &str) -> Result<String, ValidationError> {
    if is_safe_secret(value) {
        Ok(value.to_string())
    } else {
        Err(ValidationError::UnsafeSecret { field })
    }
}

/// Debug view of `RawInputs` that never prints secrets.
struct RedactedInputs<'a>(&'a RawInputs);

impl fmt::Debug for RedactedInputs<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inputs = self.0;
        f.debug_struct("RawInputs")
            .field("domain", &inputs.domain)
            .field("proxy", &inputs.proxy)
            .field("https", &inputs.https)
            .field("disable_registration", &inputs.disable_registration)
            .field("secret", &inputs.secret.as_ref().map(|_| "<redacted>"))
            .field(
                "postgres_password",
                &inputs.postgres_password.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}
