// Shared transport plumbing for the controller client.
//
// Builds the `reqwest::Client`, runs one request with bounded retry on
// connectivity failures, and turns responses into either a decoded JSON
// value or a typed error. Holds no resource-identity state.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderValue};
use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Map, Value};
use tracing::{debug, error, trace, warn};
use url::Url;

use crate::error::Error;

const USER_AGENT: &str = concat!("terra-api/", env!("CARGO_PKG_VERSION"));

/// Prefix of the `Authorization` header value.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Extra attempts made after a connection error or timeout.
pub const DEFAULT_TIMEOUT_RETRY: u32 = 1;

/// Per-request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// TLS verification mode.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TlsMode {
    /// Use the system certificate store.
    #[default]
    System,
    /// Use a custom CA certificate from the given PEM file.
    CustomCa(PathBuf),
    /// Accept any certificate (lab controllers with self-signed certs).
    DangerAcceptInvalid,
}

/// Connection tuning shared by every request a client issues.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    pub timeout: Duration,
    /// Extra attempts on connection error or timeout before giving up.
    pub timeout_retry: u32,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::System,
            timeout: DEFAULT_TIMEOUT,
            timeout_retry: DEFAULT_TIMEOUT_RETRY,
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::none());

        match &self.tls {
            TlsMode::System => {}
            TlsMode::CustomCa(path) => {
                let cert_pem = std::fs::read(path)
                    .map_err(|e| Error::Tls(format!("failed to read CA cert: {e}")))?;
                let cert = reqwest::Certificate::from_pem(&cert_pem)
                    .map_err(|e| Error::Tls(format!("invalid CA cert: {e}")))?;
                builder = builder.add_root_certificate(cert);
            }
            TlsMode::DangerAcceptInvalid => {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}

/// Issues single HTTP requests with connectivity retry.
pub(crate) struct Transport {
    http: reqwest::Client,
    timeout_retry: u32,
}

impl Transport {
    pub(crate) fn new(http: reqwest::Client, timeout_retry: u32) -> Self {
        Self {
            http,
            timeout_retry,
        }
    }

    /// Send one request, retrying on connection errors and timeouts.
    ///
    /// With `timeout_retry = n` at most `n + 1` attempts are made; no
    /// backoff between them. Any response, whatever its status, ends the
    /// loop and is handed back untouched.
    pub(crate) async fn execute(
        &self,
        method: &Method,
        url: &Url,
        query: &[(&str, &str)],
        body: Option<&[u8]>,
        token: Option<&SecretString>,
    ) -> Result<reqwest::Response, Error> {
        let attempts = self.timeout_retry.saturating_add(1);
        let authorization = token.map(bearer_header).transpose()?;

        let mut attempt = 0;
        loop {
            attempt += 1;

            let mut builder = self
                .http
                .request(method.clone(), url.clone())
                .header(CONTENT_TYPE, "application/json")
                .header(ACCEPT, "application/json");
            if !query.is_empty() {
                builder = builder.query(query);
            }
            if let Some(ref value) = authorization {
                builder = builder.header(AUTHORIZATION, value.clone());
            }
            if let Some(bytes) = body {
                builder = builder.body(bytes.to_vec());
            }

            match builder.send().await {
                Ok(resp) => {
                    debug!(%method, %url, status = resp.status().as_u16(), "got response");
                    return Ok(resp);
                }
                Err(e) if e.is_timeout() || e.is_connect() => {
                    if attempt < attempts {
                        warn!(%method, %url, attempt, error = %e, "request timed out, retrying");
                        continue;
                    }
                    error!(%method, %url, attempts, "request timed out, retries exhausted");
                    return Err(Error::Timeout { attempts });
                }
                Err(e) => return Err(Error::Transport(e)),
            }
        }
    }
}

fn bearer_header(token: &SecretString) -> Result<HeaderValue, Error> {
    let mut value = HeaderValue::from_str(&format!("{BEARER_PREFIX}{}", token.expose_secret()))
        .map_err(|e| Error::Authentication {
            message: format!("token is not a valid header value: {e}"),
        })?;
    value.set_sensitive(true);
    Ok(value)
}

// ── Response handling ────────────────────────────────────────────────

/// 200, 201 and 204 are the only statuses the controller uses for success.
pub(crate) fn is_success(status: StatusCode) -> bool {
    matches!(status.as_u16(), 200 | 201 | 204)
}

/// Read the body and map the status; success bodies are decoded as JSON.
pub(crate) async fn read_response(resp: reqwest::Response) -> Result<Value, Error> {
    let status = resp.status();
    let url = resp.url().clone();
    let body = resp.text().await?;

    if !is_success(status) {
        error!(%url, status = status.as_u16(), body = %body, "request failed");
        return Err(status_error(status, body, url.path()));
    }

    trace!(%url, body = %body, "response body");
    decode_body(&body)
}

/// Translate a non-success status into the error taxonomy.
///
/// The raw body is carried verbatim as the message; `context` (usually the
/// request path) stands in when the controller sent no body.
pub(crate) fn status_error(status: StatusCode, body: String, context: &str) -> Error {
    let code = status.as_u16();
    let message = if body.trim().is_empty() {
        context.to_owned()
    } else {
        body
    };

    match code {
        400 => Error::BadRequest { message },
        404 => Error::NotFound { message },
        401..=499 => Error::Client {
            status: code,
            message,
        },
        500..=599 => Error::Server {
            status: code,
            message,
        },
        _ => Error::Http {
            status: code,
            message: format!("return code: {code}: {message}"),
        },
    }
}

/// Decode a success body. Empty bodies decode to an empty object.
pub(crate) fn decode_body(body: &str) -> Result<Value, Error> {
    if body.trim().is_empty() {
        return Ok(Value::Object(Map::new()));
    }

    serde_json::from_str(body).map_err(|e| {
        debug!(error = %e, body = %body, "response body is not valid JSON");
        Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(body)),
            body: body.to_owned(),
        }
    })
}

fn preview(body: &str) -> String {
    body.chars().take(200).collect()
}
