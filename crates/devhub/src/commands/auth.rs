//! Login, registration and logout.
//!
//! A successful login or registration stores the issued token for the
//! active profile (keyring first, plaintext fallback) and remembers the
//! server and email it was issued for.

use devhub_config::{Config, TokenStorage};
use devhub_core::{ApiClient, HttpTransport};
use secrecy::SecretString;

use crate::cli::{GlobalOpts, LoginArgs, RegisterArgs};
use crate::error::CliError;

use super::util;

pub async fn login(
    client: &ApiClient<HttpTransport>,
    cfg: Config,
    profile_name: &str,
    args: LoginArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let email = util::text_or_prompt(args.email, "Email")?;
    let password = util::password_or_prompt(args.password)?;

    let spinner = util::spinner("Logging in...", global.quiet);
    let result = devhub_core::auth::login(client, &email, &password).await;
    spinner.finish_and_clear();

    persist(client, cfg, profile_name, &email, &result?, global)
}

pub async fn register(
    client: &ApiClient<HttpTransport>,
    cfg: Config,
    profile_name: &str,
    args: RegisterArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let name = util::text_or_prompt(args.name, "Name")?;
    let email = util::text_or_prompt(args.email, "Email")?;
    let password = util::password_or_prompt(args.password)?;

    let spinner = util::spinner("Creating account...", global.quiet);
    let result = devhub_core::auth::register(client, &name, &email, &password).await;
    spinner.finish_and_clear();

    persist(client, cfg, profile_name, &email, &result?, global)
}

pub fn logout(
    client: &ApiClient<HttpTransport>,
    mut cfg: Config,
    profile_name: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    devhub_core::auth::logout(client.session());
    let known = cfg.profiles.contains_key(profile_name);
    devhub_config::clear_token(&mut cfg, profile_name);
    if known {
        devhub_config::save_config(&cfg)?;
    }
    if !global.quiet {
        eprintln!("✓ Logged out of profile '{profile_name}'");
    }
    Ok(())
}

fn persist(
    client: &ApiClient<HttpTransport>,
    mut cfg: Config,
    profile_name: &str,
    email: &str,
    token: &SecretString,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let storage = devhub_config::store_token(&mut cfg, profile_name, token);
    let profile = cfg.profile_mut(profile_name);
    profile.email = Some(email.to_owned());
    profile.server = client.base_url().as_str().trim_end_matches('/').to_owned();
    devhub_config::save_config(&cfg)?;

    if !global.quiet {
        let location = match storage {
            TokenStorage::Keyring => "system keyring".to_owned(),
            TokenStorage::ConfigFile => devhub_config::config_path().display().to_string(),
        };
        eprintln!("✓ Logged in as {email} (profile '{profile_name}')");
        eprintln!("  Token stored in {location}");
    }
    Ok(())
}
