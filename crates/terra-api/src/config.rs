// ── Client connection configuration ──
//
// Everything a `TerraClient` needs to reach the controller. Never touches
// disk; the config crate (or any other caller) builds one and hands it in.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::auth::Credentials;
use crate::error::Error;
use crate::transport::{TlsMode, TransportConfig};

/// Extra authentication attempts after a 401.
pub const DEFAULT_TOKEN_RETRY: u32 = 1;

/// Connection settings for one controller.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Resource base URL, always ending in `/`.
    pub url: Url,
    /// Full URL of the token endpoint.
    pub auth_url: Url,
    pub credentials: Credentials,
    /// Tag identifying this caller; scopes `original_id` lookups.
    pub origin: String,
    pub transport: TransportConfig,
    pub token_retry: u32,
}

impl ClientConfig {
    /// Validate and assemble a config. Every argument is required.
    pub fn new(
        url: &str,
        auth_url: &str,
        username: &str,
        password: SecretString,
        origin: &str,
    ) -> Result<Self, Error> {
        require("url", url)?;
        require("auth_url", auth_url)?;
        require("username", username)?;
        require("password", password.expose_secret())?;
        require("origin", origin)?;

        Ok(Self {
            url: normalize_base_url(url)?,
            auth_url: Url::parse(auth_url)?,
            credentials: Credentials::new(username, password),
            origin: origin.to_owned(),
            transport: TransportConfig::default(),
            token_retry: DEFAULT_TOKEN_RETRY,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.transport.timeout = timeout;
        self
    }

    pub fn with_timeout_retry(mut self, retries: u32) -> Self {
        self.transport.timeout_retry = retries;
        self
    }

    pub fn with_token_retry(mut self, retries: u32) -> Self {
        self.token_retry = retries;
        self
    }

    pub fn with_tls(mut self, tls: TlsMode) -> Self {
        self.transport.tls = tls;
        self
    }

    /// Re-check the fields that may have been edited after [`new`](Self::new).
    pub fn validate(&self) -> Result<(), Error> {
        require("username", &self.credentials.username)?;
        require("password", self.credentials.password.expose_secret())?;
        require("origin", &self.origin)
    }
}

fn require(field: &str, value: &str) -> Result<(), Error> {
    if value.trim().is_empty() {
        return Err(Error::Initialization {
            message: format!("Terra dc {field} must be configured"),
        });
    }
    Ok(())
}

/// Ensure the base URL ends with `/` so relative joins keep its path.
fn normalize_base_url(raw: &str) -> Result<Url, Error> {
    let mut url = Url::parse(raw)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
