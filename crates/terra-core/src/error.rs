// ── Core error types ──
//
// Controller errors pass through unchanged so callers can still match on
// the API taxonomy (NotFound, BadRequest, ...). Workflow rules that the
// controller itself does not enforce get their own variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Controller ──────────────────────────────────────────────────
    #[error(transparent)]
    Api(#[from] terra_api::Error),

    // ── Workflow rules ──────────────────────────────────────────────
    /// The switch interface already carries an untagged network, or an
    /// untagged attach was asked for on an interface that is in use.
    #[error("Native VLAN conflict on {switch_name} {interface_name}: {detail}")]
    NativeVlanConflict {
        switch_name: String,
        interface_name: String,
        detail: String,
    },

    #[error("Host {hostname} has no switch connections")]
    HostNotConnected { hostname: String },

    #[error("Host {hostname} not found")]
    HostNotFound { hostname: String },

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },
}

impl CoreError {
    /// Returns `true` when the target is absent on the controller.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Api(e) => e.is_not_found(),
            Self::HostNotFound { .. } => true,
            _ => false,
        }
    }

    /// The underlying controller error, if there is one.
    pub fn api_error(&self) -> Option<&terra_api::Error> {
        match self {
            Self::Api(e) => Some(e),
            _ => None,
        }
    }
}
