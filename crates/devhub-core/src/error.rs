// ── Core error types ──
//
// User-facing errors from devhub-core. Network failures and server-side
// failures collapse into the single `Api` kind carrying a readable message;
// nothing in the core branches on the status code it keeps for display.

use thiserror::Error;

use crate::model::DeviceId;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Request failures ─────────────────────────────────────────────
    /// Any failed call against the registry: no response, or a non-2xx one.
    #[error("{message}")]
    Api {
        message: String,
        /// HTTP status code, when a response was received.
        status: Option<u16>,
    },

    // ── Local lookups ────────────────────────────────────────────────
    #[error("Device not found: {id}")]
    NotFound { id: DeviceId },

    // ── Confirmation flow ────────────────────────────────────────────
    #[error("A delete of device {id} is already awaiting confirmation")]
    ConfirmationPending { id: DeviceId },

    #[error("No delete is awaiting confirmation")]
    NothingToConfirm,

    // ── Input / configuration ────────────────────────────────────────
    #[error("Validation failed: {message}")]
    Validation { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// HTTP status of the failed request, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => *status,
            _ => None,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<devhub_api::Error> for CoreError {
    fn from(err: devhub_api::Error) -> Self {
        match err {
            devhub_api::Error::Api { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            devhub_api::Error::Transport(ref e) => CoreError::Api {
                message: format!("Network error: {e}"),
                status: e.status().map(|s| s.as_u16()),
            },
            devhub_api::Error::Network(reason) => CoreError::Api {
                message: format!("Network error: {reason}"),
                status: None,
            },
            devhub_api::Error::Tls(reason) => CoreError::Api {
                message: format!("TLS error: {reason}"),
                status: None,
            },
            devhub_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid server URL: {e}"),
            },
            devhub_api::Error::InvalidId(id) => CoreError::Validation {
                message: format!("{id:?} is not a usable device id"),
            },
            devhub_api::Error::InvalidToken(reason) => CoreError::Config {
                message: format!("Stored token is unusable: {reason}"),
            },
            devhub_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
