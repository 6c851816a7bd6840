use thiserror::Error;

/// Top-level error type for the `devhub-api` crate.
///
/// Covers every failure mode of a single request: the transport never
/// produced a response, the server answered with a non-2xx status, or the
/// response body could not be decoded. `devhub-core` collapses these into
/// one user-facing error kind.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A resource id that cannot name a path segment (`""`, `.`, `..`).
    #[error("Invalid resource id: {0:?}")]
    InvalidId(String),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    /// The stored token cannot be sent as a header value.
    #[error("Invalid bearer token: {0}")]
    InvalidToken(String),

    /// A transport implementation failed without a `reqwest` error to carry.
    #[error("Network error: {0}")]
    Network(String),

    // ── Server ──────────────────────────────────────────────────────
    /// Non-2xx response. `message` comes from the server's `message` field
    /// when the error payload carries one.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// HTTP status of the failed response, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` if no response was received at all.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Network(_) | Self::Tls(_))
    }

    /// Returns `true` if the server rejected the bearer token (or its absence).
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}
