//! Shared helpers for command handlers.

use std::io::{self, IsTerminal};
use std::path::Path;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget};
use secrecy::SecretString;

use crate::error::CliError;

/// Fail early when a destructive action would need a prompt that cannot
/// be shown.
pub fn ensure_can_confirm(action: &str, yes_flag: bool) -> Result<(), CliError> {
    if yes_flag || io::stdin().is_terminal() {
        Ok(())
    } else {
        Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        })
    }
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(io::Error::other(e)))?;
    Ok(confirmed)
}

/// Use `given` or prompt for `label`; in a non-interactive context the
/// value is required up front.
pub fn text_or_prompt(given: Option<String>, label: &str) -> Result<String, CliError> {
    if let Some(value) = given {
        return Ok(value);
    }
    if !io::stdin().is_terminal() {
        return Err(required(label));
    }
    dialoguer::Input::new()
        .with_prompt(label)
        .interact_text()
        .map_err(|e| CliError::Io(io::Error::other(e)))
}

/// Same as [`text_or_prompt`] without echoing the input.
pub fn password_or_prompt(given: Option<String>) -> Result<SecretString, CliError> {
    if let Some(value) = given {
        return Ok(SecretString::from(value));
    }
    if !io::stdin().is_terminal() {
        return Err(required("password"));
    }
    let value = rpassword::prompt_password("Password: ")?;
    Ok(SecretString::from(value))
}

fn required(field: &str) -> CliError {
    CliError::Validation {
        field: field.to_lowercase(),
        reason: "required when not running interactively".into(),
    }
}

/// Read and parse a JSON file for `--from-file` flags.
pub fn read_json_file(path: &Path) -> Result<serde_json::Value, CliError> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| CliError::Validation {
        field: "from-file".into(),
        reason: format!("invalid JSON: {e}"),
    })
}

/// Spinner on stderr while waiting on the server. Hidden when quiet or
/// when stderr is not a terminal.
pub fn spinner(message: &'static str, quiet: bool) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    if quiet || !io::stderr().is_terminal() {
        bar.set_draw_target(ProgressDrawTarget::hidden());
    }
    bar.set_message(message);
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}
