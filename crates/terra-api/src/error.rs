use thiserror::Error;

/// Top-level error type for the `terra-api` crate.
///
/// The first block of variants is the controller-facing taxonomy: every
/// HTTP outcome the client does not treat as success lands in exactly one
/// of them. The remaining variants cover local failures (URL parsing, TLS
/// setup, JSON encoding) that never reach the wire.
#[derive(Debug, Error)]
pub enum Error {
    // ── Setup ───────────────────────────────────────────────────────
    /// A required configuration value was missing when building the client.
    #[error("Initialization failed: {message}")]
    Initialization { message: String },

    // ── Authentication ──────────────────────────────────────────────
    /// Credential POST failed, or a 401 persisted after re-authentication.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// Connection or timeout retries exhausted.
    #[error("Request timed out after {attempts} attempt(s)")]
    Timeout { attempts: u32 },

    /// Non-retryable HTTP transport error (TLS failure, redirect loop, ...).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS configuration error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Controller responses ────────────────────────────────────────
    /// HTTP 400. The controller also answers 400 while its asynchronous
    /// consistency checks are still running.
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    /// HTTP 404, or an identifier resolution query that matched nothing.
    #[error("{message} not found")]
    NotFound { message: String },

    /// Any other 4xx.
    #[error("Client error (HTTP {status}): {message}")]
    Client { status: u16, message: String },

    /// Any 5xx.
    #[error("Server error (HTTP {status}): {message}")]
    Server { status: u16, message: String },

    /// Any other status outside 200/201/204.
    #[error("HTTP error (status {status}): {message}")]
    Http { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// Request payload could not be encoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Response body was not the JSON we expected, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    pub(crate) fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Returns `true` for HTTP 404 and empty identifier resolutions.
    ///
    /// Delete paths treat this as "already absent".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` for HTTP 400.
    pub fn is_bad_request(&self) -> bool {
        matches!(self, Self::BadRequest { .. })
    }

    /// Returns `true` if the error indicates the credentials or token were rejected.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// Returns `true` if this is a transient error worth retrying later.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Timeout { .. } | Self::Server { .. } => true,
            _ => false,
        }
    }

    /// HTTP status carried by the error, if it came from a controller response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::BadRequest { .. } => Some(400),
            Self::Client { status, .. } | Self::Server { status, .. } | Self::Http { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }
}
