// ── Session helpers ──
//
// Login and registration write the returned token into the client's
// session; every later request picks it up from there.

use devhub_api::{ApiClient, Session, Transport};
use secrecy::SecretString;
use tracing::info;

use crate::error::CoreError;

/// Log in and store the token in the client's session.
pub async fn login<T: Transport>(
    client: &ApiClient<T>,
    email: &str,
    password: &SecretString,
) -> Result<SecretString, CoreError> {
    let resp = client.login(email, password).await?;
    client.session().set_token(resp.token.clone());
    info!(email, "logged in");
    Ok(resp.token)
}

/// Create an account and store the token in the client's session.
pub async fn register<T: Transport>(
    client: &ApiClient<T>,
    name: &str,
    email: &str,
    password: &SecretString,
) -> Result<SecretString, CoreError> {
    let resp = client.register(name, email, password).await?;
    client.session().set_token(resp.token.clone());
    info!(email, "registered");
    Ok(resp.token)
}

/// Forget the current token. Later requests go out unauthenticated.
pub fn logout(session: &Session) {
    session.clear();
    info!("logged out");
}
