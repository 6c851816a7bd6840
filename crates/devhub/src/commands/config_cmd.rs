//! Config subcommand handlers.

use std::io::{self, IsTerminal};

use dialoguer::Input;

use devhub_config::Config;
use devhub_core::DEFAULT_BASE_URL;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

const REDACTED: &str = "********";

// ── Helpers ─────────────────────────────────────────────────────────

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Copy of `cfg` with plaintext tokens masked.
fn redacted(cfg: &Config) -> Config {
    let mut shown = cfg.clone();
    for profile in shown.profiles.values_mut() {
        if profile.token.is_some() {
            profile.token = Some(REDACTED.into());
        }
    }
    shown
}

fn detail(cfg: &Config) -> String {
    let default = cfg.profile_name(None);
    let mut lines = vec![
        format!("Config file:     {}", devhub_config::config_path().display()),
        format!("Default profile: {default}"),
        format!("Output:          {}", cfg.defaults.output),
        format!("Timeout:         {}s", cfg.defaults.timeout),
    ];
    if cfg.profiles.is_empty() {
        lines.push("Profiles:        (none) -- run: devhub config init".into());
    }
    for (name, profile) in &cfg.profiles {
        let marker = if *name == default { " *" } else { "" };
        lines.push(String::new());
        lines.push(format!("[{name}]{marker}"));
        lines.push(format!("  Server:   {}", profile.server));
        lines.push(format!("  Email:    {}", profile.email.as_deref().unwrap_or("-")));
        let token = if profile.token.is_some() {
            "in config file"
        } else {
            "keyring or not logged in"
        };
        lines.push(format!("  Token:    {token}"));
        if let Some(ref ca) = profile.ca_cert {
            lines.push(format!("  CA cert:  {}", ca.display()));
        }
        if let Some(insecure) = profile.insecure {
            lines.push(format!("  Insecure: {insecure}"));
        }
        if let Some(timeout) = profile.timeout {
            lines.push(format!("  Timeout:  {timeout}s"));
        }
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            if !io::stdin().is_terminal() {
                return Err(CliError::Validation {
                    field: "interactive".into(),
                    reason: "config init needs a terminal; use `devhub config set-server` instead".into(),
                });
            }

            let config_path = devhub_config::config_path();
            eprintln!("devhub configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            let server: String = Input::new()
                .with_prompt("Server URL")
                .default(DEFAULT_BASE_URL.into())
                .validate_with(|s: &String| {
                    devhub_config::parse_server(s)
                        .map(|_| ())
                        .map_err(|e| e.to_string())
                })
                .interact_text()
                .map_err(prompt_err)?;

            let email: String = Input::new()
                .with_prompt("Account email (optional)")
                .allow_empty(true)
                .interact_text()
                .map_err(prompt_err)?;

            let mut cfg = devhub_config::load_config_or_default();
            cfg.default_profile = Some(profile_name.clone());
            let profile = cfg.profile_mut(&profile_name);
            profile.server = server;
            profile.email = Some(email).filter(|e| !e.is_empty());

            devhub_config::save_config(&cfg)?;

            eprintln!("\n✓ Configuration written to {}", config_path.display());
            eprintln!("  Active profile: {profile_name}");
            eprintln!("\n  Next: devhub login --profile {profile_name}");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = redacted(&devhub_config::load_config_or_default());
            let out = output::render_single(&global.output, &cfg, detail, |c| c.profile_name(None));
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── SetServer <url> ─────────────────────────────────────────
        ConfigCommand::SetServer { url } => {
            let parsed = devhub_config::parse_server(&url)?;
            let mut cfg = devhub_config::load_config()?;
            let profile_name = cfg.profile_name(global.profile.as_deref());

            cfg.profile_mut(&profile_name).server = parsed.as_str().trim_end_matches('/').to_owned();
            devhub_config::save_config(&cfg)?;

            if !global.quiet {
                eprintln!("✓ Server for profile '{profile_name}' set to {parsed}");
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use devhub_config::Profile;

    use super::*;

    #[test]
    fn show_masks_plaintext_tokens() {
        let mut cfg = Config::default();
        cfg.profile_mut("default").token = Some("secret-token".into());
        cfg.profile_mut("other");

        let shown = redacted(&cfg);
        assert_eq!(shown.profiles["default"].token.as_deref(), Some(REDACTED));
        assert_eq!(shown.profiles["other"], Profile::default());
        assert!(!detail(&shown).contains("secret-token"));
    }

    #[test]
    fn detail_marks_default_profile() {
        let mut cfg = Config::default();
        cfg.profile_mut("default");
        cfg.profile_mut("staging").server = "https://staging.example/api".into();

        let text = detail(&cfg);
        assert!(text.contains("[default] *"));
        assert!(text.contains("[staging]\n"));
        assert!(text.contains("https://staging.example/api"));
    }
}
