//! Configuration for the Terra DC controller client and orchestrator.
//!
//! One flat TOML table, overridable by `TERRA_*` environment variables,
//! with password resolution (named env var, then plaintext) and translation
//! into `terra_api::ClientConfig` and `terra_core::OrchestratorConfig`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment, Provider,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use terra_api::{ClientConfig, RetryPolicy, TlsMode};
use terra_core::{BindingMode, OrchestratorConfig};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("Terra dc {field} must be configured")]
    Missing { field: String },

    #[error("no password configured for user '{username}'")]
    NoCredentials { username: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error(transparent)]
    Client(#[from] terra_api::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

/// Configuration problems surface as the client's initialization error.
impl From<ConfigError> for terra_api::Error {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Client(inner) => inner,
            other => Self::Initialization {
                message: other.to_string(),
            },
        }
    }
}

// ── TOML config ─────────────────────────────────────────────────────

/// The full configuration surface.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TerraConfig {
    /// Controller resource base URL, e.g. `https://terra.example:8443/v1`.
    pub url: Option<String>,

    /// Token endpoint URL.
    pub auth_url: Option<String>,

    pub username: Option<String>,

    /// Plaintext password (prefer `password_env`).
    pub password: Option<String>,

    /// Environment variable holding the password.
    pub password_env: Option<String>,

    /// Request timeout in seconds.
    pub http_timeout: u64,

    pub timeout_retry: u32,
    pub token_retry: u32,

    /// Origin tag written on every resource this client creates.
    pub origin_name: String,

    pub physical_network: Option<String>,
    pub complete_binding: bool,
    pub binding_mode: BindingMode,
    pub vni_pool_name: Option<String>,
    pub l3_vni_pool_name: Option<String>,

    /// Retries for BGP peer and static route mutations answered with 400.
    pub bad_request_retries: u32,
    pub bad_request_delay_secs: u64,

    /// Accept self-signed controller certificates.
    pub insecure: bool,

    /// Path to a custom CA certificate.
    pub ca_cert: Option<PathBuf>,
}

impl Default for TerraConfig {
    fn default() -> Self {
        Self {
            url: None,
            auth_url: None,
            username: None,
            password: None,
            password_env: None,
            http_timeout: 10,
            timeout_retry: 1,
            token_retry: 1,
            origin_name: "qingcloud".into(),
            physical_network: None,
            complete_binding: false,
            binding_mode: BindingMode::Network,
            vni_pool_name: None,
            l3_vni_pool_name: None,
            bad_request_retries: 1,
            bad_request_delay_secs: 60,
            insecure: false,
            ca_cert: None,
        }
    }
}

impl TerraConfig {
    /// Resolve the password: `password_env` first, then the plaintext value.
    pub fn resolve_password(&self) -> Result<SecretString, ConfigError> {
        if let Some(ref env_name) = self.password_env {
            if let Ok(val) = std::env::var(env_name) {
                return Ok(SecretString::from(val));
            }
            debug!(env_name = %env_name, "password env var not set, falling back to config");
        }

        if let Some(ref pw) = self.password {
            return Ok(SecretString::from(pw.clone()));
        }

        Err(ConfigError::NoCredentials {
            username: self.username.clone().unwrap_or_default(),
        })
    }

    pub fn tls_mode(&self) -> TlsMode {
        if self.insecure {
            TlsMode::DangerAcceptInvalid
        } else if let Some(ref ca_path) = self.ca_cert {
            TlsMode::CustomCa(ca_path.clone())
        } else {
            TlsMode::System
        }
    }

    /// Build the client's connection settings.
    pub fn to_client_config(&self) -> Result<ClientConfig, ConfigError> {
        let url = required("url", self.url.as_deref())?;
        let auth_url = required("auth_url", self.auth_url.as_deref())?;
        let username = required("username", self.username.as_deref())?;
        check_url("url", url)?;
        check_url("auth_url", auth_url)?;

        let config = ClientConfig::new(
            url,
            auth_url,
            username,
            self.resolve_password()?,
            &self.origin_name,
        )?
        .with_timeout(Duration::from_secs(self.http_timeout))
        .with_timeout_retry(self.timeout_retry)
        .with_token_retry(self.token_retry)
        .with_tls(self.tls_mode());
        Ok(config)
    }

    pub fn to_orchestrator_config(&self) -> OrchestratorConfig {
        OrchestratorConfig {
            physical_network: self.physical_network.clone(),
            complete_binding: self.complete_binding,
            binding_mode: self.binding_mode,
            vni_pool_name: self.vni_pool_name.clone(),
            l3_vni_pool_name: self.l3_vni_pool_name.clone(),
            retry: RetryPolicy::new(
                self.bad_request_retries,
                Duration::from_secs(self.bad_request_delay_secs),
            ),
        }
    }
}

fn required<'a>(field: &str, value: Option<&'a str>) -> Result<&'a str, ConfigError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::Missing {
            field: field.into(),
        }),
    }
}

fn check_url(field: &str, raw: &str) -> Result<(), ConfigError> {
    let parsed = url::Url::parse(raw).map_err(|e| ConfigError::Validation {
        field: field.into(),
        reason: format!("invalid URL {raw}: {e}"),
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::Validation {
            field: field.into(),
            reason: format!("expected http or https, got '{other}'"),
        }),
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Platform config file location, e.g. `~/.config/terra/config.toml`.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("io", "tethrnet", "terra").map_or_else(
        || PathBuf::from("terra.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Loading and saving ──────────────────────────────────────────────

fn figment(file: impl Provider) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(TerraConfig::default()))
        .merge(file)
        .merge(Env::prefixed("TERRA_").split("__"))
}

/// Load from defaults, the TOML file (default location when `None`), then
/// `TERRA_*` environment variables. A missing file is not an error.
pub fn load_config(path: Option<&Path>) -> Result<TerraConfig, ConfigError> {
    let path = path.map_or_else(config_path, Path::to_path_buf);
    debug!(path = %path.display(), "loading terra config");
    Ok(figment(Toml::file(&path)).extract()?)
}

/// Parse a TOML document on top of the defaults and environment.
pub fn parse_config(toml: &str) -> Result<TerraConfig, ConfigError> {
    Ok(figment(Toml::string(toml)).extract()?)
}

/// Write the config as TOML, creating parent directories.
pub fn save_config(cfg: &TerraConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, toml::to_string_pretty(cfg)?)?;
    Ok(())
}
