// Terra controller HTTP client
//
// Owns the transport, the token session and the origin tag. Resource
// endpoint modules (networks, routers, ...) are implemented as inherent
// methods in `resources/` so this module stays focused on request mechanics.

use reqwest::{Method, StatusCode};
use secrecy::SecretString;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, warn};
use url::Url;

use crate::auth::{Authenticator, Session};
use crate::config::ClientConfig;
use crate::error::Error;
use crate::transport::{self, Transport};

/// Authenticated client for one Terra DC controller.
///
/// Safe to share between tasks behind an `Arc`; the token session is the
/// only mutable state and is guarded by its own mutex.
pub struct TerraClient {
    base_url: Url,
    origin: String,
    transport: Transport,
    auth: Authenticator,
    token_retry: u32,
}

impl TerraClient {
    /// Build a client, constructing the HTTP client from `config.transport`.
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        let http = config.transport.build_client()?;
        Self::with_client(http, config)
    }

    /// Build a client around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, config: ClientConfig) -> Result<Self, Error> {
        config.validate()?;
        let ClientConfig {
            url,
            auth_url,
            credentials,
            origin,
            transport,
            token_retry,
        } = config;

        debug!(%url, %origin, "creating terra client");
        Ok(Self {
            base_url: url,
            origin,
            transport: Transport::new(http, transport.timeout_retry),
            auth: Authenticator::new(auth_url, credentials),
            token_retry,
        })
    }

    /// The origin tag stamped on every created resource.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The token session (exposed for diagnostics and tests).
    pub fn session(&self) -> &Session {
        self.auth.session()
    }

    // ── Authentication ───────────────────────────────────────────────

    /// Request a fresh token without touching the cache.
    pub async fn get_token(&self) -> Result<SecretString, Error> {
        self.auth.get_token(&self.transport).await
    }

    /// Return the cached token, authenticating first if there is none.
    pub async fn ensure_token(&self) -> Result<SecretString, Error> {
        self.auth.ensure_token(&self.transport).await
    }

    // ── Request execution ────────────────────────────────────────────

    /// Resolve a path relative to the controller base URL.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Issue one authenticated request and decode the JSON response.
    ///
    /// A 401 drops the token that was used (unless a concurrent caller has
    /// already replaced it) and retries with a fresh one, up to
    /// `token_retry` times. A 401 after that is an authentication error.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<Value, Error> {
        let payload = body.map(serde_json::to_vec).transpose()?;
        self.execute(method, path, query, payload).await
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        payload: Option<Vec<u8>>,
    ) -> Result<Value, Error> {
        let url = self.url(path)?;
        let mut reauths = 0;

        loop {
            let token = self.ensure_token().await?;
            let resp = self
                .transport
                .execute(&method, &url, query, payload.as_deref(), Some(&token))
                .await?;

            if resp.status() != StatusCode::UNAUTHORIZED {
                return transport::read_response(resp).await;
            }

            self.auth.invalidate(&token).await;
            if reauths < self.token_retry {
                reauths += 1;
                warn!(%method, %url, attempt = reauths, "token rejected, re-authenticating");
                continue;
            }

            error!(%method, %url, "token rejected after re-authentication");
            return Err(Error::Authentication {
                message: format!("{method} {} rejected with 401 after re-authentication", url.path()),
            });
        }
    }

    // ── Typed helpers ────────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, Error> {
        let value = self.execute(Method::GET, path, query, None).await?;
        decode(value)
    }

    /// GET a collection. An empty body or empty object is an empty list.
    pub(crate) async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>, Error> {
        let value = self.execute(Method::GET, path, query, None).await?;
        decode_list(value)
    }

    pub(crate) async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, Error>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let payload = serde_json::to_vec(body)?;
        let value = self.execute(Method::POST, path, &[], Some(payload)).await?;
        decode(value)
    }

    /// POST with no request body (action endpoints such as `unbind`).
    pub(crate) async fn post_empty(&self, path: &str) -> Result<(), Error> {
        self.execute(Method::POST, path, &[], None).await?;
        Ok(())
    }

    pub(crate) async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, Error>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let payload = serde_json::to_vec(body)?;
        let value = self.execute(Method::PUT, path, &[], Some(payload)).await?;
        decode(value)
    }

    /// DELETE; whatever body the controller returns is discarded.
    pub(crate) async fn delete(&self, path: &str) -> Result<(), Error> {
        self.execute(Method::DELETE, path, &[], None).await?;
        Ok(())
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, Error> {
    T::deserialize(&value).map_err(|e| Error::Deserialization {
        message: e.to_string(),
        body: value.to_string(),
    })
}

fn decode_list<T: DeserializeOwned>(value: Value) -> Result<Vec<T>, Error> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Object(ref map) if map.is_empty() => Ok(Vec::new()),
        other => decode(other),
    }
}
