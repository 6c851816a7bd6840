//! CLI-aware configuration: layers `GlobalOpts` over a profile and
//! translates the result into `devhub_core::ConsoleConfig`.
//!
//! Core never sees these types; it receives a pre-built `ConsoleConfig`.

use secrecy::SecretString;

use devhub_config::{Config, ConfigError, Profile};
use devhub_core::ConsoleConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.profile_name(global.profile.as_deref())
}

/// Translate the active profile + global flags into a `ConsoleConfig`.
///
/// Precedence per setting: flag / env var, then profile, then defaults.
/// A missing profile is only an error when it was named explicitly.
pub fn resolve_console_config(global: &GlobalOpts, cfg: &Config) -> Result<ConsoleConfig, CliError> {
    let profile_name = active_profile_name(global, cfg);
    let mut profile = match cfg.profiles.get(&profile_name) {
        Some(p) => p.clone(),
        None if global.profile.is_some() => {
            return Err(ConfigError::ProfileNotFound { name: profile_name }.into());
        }
        None => Profile::default(),
    };

    // Flags and env vars override the profile's own settings.
    if let Some(ref server) = global.server {
        profile.server.clone_from(server);
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    if global.timeout.is_some() {
        profile.timeout = global.timeout;
    }

    let mut console =
        devhub_config::profile_to_console_config(&profile, &profile_name, &cfg.defaults)?;

    // Token: flag > env > keyring > plaintext
    if let Some(ref token) = global.token {
        console.token = Some(SecretString::from(token.clone()));
    }
    Ok(console)
}
