// ── Runtime connection configuration ──
//
// Describes how to reach the registry. Carries credentials and transport
// tuning but never touches disk; the console builds one and hands it in.

use std::path::PathBuf;
use std::sync::LazyLock;
use std::time::Duration;

use devhub_api::{ApiClient, HttpTransport, Session, TlsMode, TransportConfig};
use secrecy::SecretString;
use url::Url;

use crate::error::CoreError;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store.
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed dev servers).
    DangerAcceptInvalid,
}

/// Connection settings for one registry server.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// API base, e.g. `http://localhost:4000/api`.
    pub url: Url,
    pub tls: TlsVerification,
    pub timeout: Duration,
    /// Bearer token from a previous login, if any.
    pub token: Option<SecretString>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.clone(),
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            token: None,
        }
    }
}

impl ConsoleConfig {
    /// Build a request client whose session starts with the configured token.
    pub fn build_client(&self) -> Result<ApiClient<HttpTransport>, CoreError> {
        let session = match &self.token {
            Some(token) => Session::with_token(token.clone()),
            None => Session::new(),
        };
        let transport = TransportConfig {
            tls: tls_to_transport(&self.tls),
            timeout: self.timeout,
        };
        Ok(ApiClient::new(self.url.as_str(), session, &transport)?)
    }
}

/// `DEFAULT_BASE_URL`, parsed once.
static DEFAULT_URL: LazyLock<Url> = LazyLock::new(|| {
    Url::parse(devhub_api::DEFAULT_BASE_URL).expect("DEFAULT_BASE_URL is a valid absolute URL")
});

fn tls_to_transport(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}
