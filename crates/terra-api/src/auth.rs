// Bearer-token authentication.
//
// The token lives in a `Session` owned by the client; there is no global
// state. A single async mutex guards the read-then-maybe-refresh sequence so
// concurrent callers with an empty cache produce exactly one auth POST.

use std::future::Future;

use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, error, info};
use url::Url;

use crate::error::Error;
use crate::transport::Transport;

/// Username/password pair posted to the controller's auth endpoint.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TokenRequest<'a> {
    user_name: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    #[serde(default)]
    token: Option<String>,
}

// ── Session ──────────────────────────────────────────────────────────

/// In-memory holder of the current bearer token.
///
/// Created empty, populated on first use, cleared when the controller
/// rejects the token that is still cached.
#[derive(Debug, Default)]
pub struct Session {
    token: Mutex<Option<SecretString>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a token is currently cached.
    pub async fn has_token(&self) -> bool {
        self.token.lock().await.is_some()
    }

    /// Return the cached token, or run `fetch` under the lock and cache its result.
    pub(crate) async fn ensure<F, Fut>(&self, fetch: F) -> Result<SecretString, Error>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<SecretString, Error>>,
    {
        let mut guard = self.token.lock().await;
        if let Some(token) = guard.as_ref() {
            return Ok(token.clone());
        }

        info!("no cached token, requesting one");
        let token = fetch().await?;
        *guard = Some(token.clone());
        Ok(token)
    }

    /// Drop the cached token if it is still the one that was rejected.
    ///
    /// Returns `false` when another caller already replaced it.
    pub(crate) async fn invalidate(&self, rejected: &SecretString) -> bool {
        let mut guard = self.token.lock().await;
        let still_current = guard
            .as_ref()
            .is_some_and(|t| t.expose_secret() == rejected.expose_secret());
        if still_current {
            *guard = None;
        }
        still_current
    }
}

// ── Authenticator ────────────────────────────────────────────────────

/// Obtains tokens from the auth endpoint and caches them in its [`Session`].
#[derive(Debug)]
pub struct Authenticator {
    auth_url: Url,
    credentials: Credentials,
    session: Session,
}

impl Authenticator {
    pub fn new(auth_url: Url, credentials: Credentials) -> Self {
        Self {
            auth_url,
            credentials,
            session: Session::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn auth_url(&self) -> &Url {
        &self.auth_url
    }

    /// POST the credentials and extract the `token` field.
    pub(crate) async fn get_token(&self, transport: &Transport) -> Result<SecretString, Error> {
        let body = serde_json::to_vec(&TokenRequest {
            user_name: &self.credentials.username,
            password: self.credentials.password.expose_secret(),
        })?;

        debug!(url = %self.auth_url, user = %self.credentials.username, "requesting token");
        let resp = transport
            .execute(&Method::POST, &self.auth_url, &[], Some(&body), None)
            .await?;

        let status = resp.status();
        let raw = resp.text().await?;
        if !status.is_success() {
            error!(status = status.as_u16(), "controller authentication failed");
            return Err(Error::Authentication {
                message: format!("token request rejected (HTTP {status}): {raw}"),
            });
        }

        let token = serde_json::from_str::<TokenResponse>(&raw)
            .ok()
            .and_then(|r| r.token)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                error!("auth response carried no token");
                Error::Authentication {
                    message: "auth response carried no token".into(),
                }
            })?;

        debug!("authenticated successfully");
        Ok(SecretString::from(token))
    }

    /// Cached token, or a freshly fetched one.
    pub(crate) async fn ensure_token(&self, transport: &Transport) -> Result<SecretString, Error> {
        self.session.ensure(|| self.get_token(transport)).await
    }

    pub(crate) async fn invalidate(&self, rejected: &SecretString) -> bool {
        self.session.invalidate(rejected).await
    }
}
