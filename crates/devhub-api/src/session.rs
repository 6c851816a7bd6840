use std::sync::Arc;

use arc_swap::ArcSwapOption;
use secrecy::SecretString;

/// Process-wide authentication state: at most one bearer token.
///
/// Cheaply cloneable; every clone observes the same token. Set after a
/// successful login or registration, read by [`ApiClient`](crate::ApiClient)
/// on every request, cleared on logout. The client never caches or
/// refreshes it.
#[derive(Debug, Clone, Default)]
pub struct Session {
    token: Arc<ArcSwapOption<SecretString>>,
}

impl Session {
    /// An unauthenticated session.
    pub fn new() -> Self {
        Self::default()
    }

    /// A session pre-loaded with a stored token.
    pub fn with_token(token: SecretString) -> Self {
        let session = Self::new();
        session.set_token(token);
        session
    }

    pub fn set_token(&self, token: SecretString) {
        self.token.store(Some(Arc::new(token)));
    }

    pub fn clear(&self) {
        self.token.store(None);
    }

    /// The current token, if any.
    pub fn token(&self) -> Option<SecretString> {
        self.token.load_full().map(|t| SecretString::clone(&t))
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.load().is_some()
    }
}
