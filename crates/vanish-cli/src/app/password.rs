//! Password entry and unlock with retry.

use std::io::IsTerminal;

use dialoguer::Password;
use secrecy::{ExposeSecret, SecretString};

use vanish_core::{Session, SqliteStore, Vanish, VanishError};

use crate::constants::{MAX_PASSWORD_ATTEMPTS, PASSWORD_ENV};
use crate::errors::CliError;

/// Password from the environment, if set and non-blank.
fn password_from_env() -> Option<SecretString> {
    std::env::var(PASSWORD_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(SecretString::from)
}

fn require_terminal() -> anyhow::Result<()> {
    if std::io::stdin().is_terminal() {
        Ok(())
    } else {
        Err(CliError::invalid_input(format!(
            "No password available.\nHint: Set {} when running non-interactively.",
            PASSWORD_ENV
        ))
        .into())
    }
}

pub fn prompt_password() -> anyhow::Result<SecretString> {
    if let Some(password) = password_from_env() {
        return Ok(password);
    }
    require_terminal()?;
    Password::new()
        .with_prompt("Password")
        .interact()
        .map(SecretString::from)
        .map_err(|e| anyhow::anyhow!("Failed to read password: {}", e))
}

pub fn prompt_new_password() -> anyhow::Result<SecretString> {
    if let Some(password) = password_from_env() {
        return Ok(password);
    }
    require_terminal()?;
    Password::new()
        .with_prompt("New password")
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()
        .map(SecretString::from)
        .map_err(|e| anyhow::anyhow!("Failed to read password: {}", e))
}

/// Unlock the vault, re-prompting on a wrong password when interactive.
pub fn unlock_with_retry(app: &Vanish<SqliteStore>) -> anyhow::Result<Session> {
    if let Some(password) = password_from_env() {
        return app
            .unlock(password.expose_secret())
            .map_err(|err| -> anyhow::Error {
                match err {
                    VanishError::WrongPassword => CliError::auth_failed_with_hint(
                        "Incorrect password.",
                        format!("Hint: Check the value of {}.", PASSWORD_ENV),
                    )
                    .into(),
                    other => other.into(),
                }
            });
    }

    if !app.is_initialized()? {
        return Err(VanishError::NotInitialized.into());
    }

    for attempt in 1..=MAX_PASSWORD_ATTEMPTS {
        let password = prompt_password()?;
        if let Some(session) = app.verify(password.expose_secret())? {
            return Ok(session);
        }
        if attempt < MAX_PASSWORD_ATTEMPTS {
            eprintln!("Incorrect password. Try again.");
        }
    }

    Err(CliError::auth_failed_with_hint(
        "Incorrect password.",
        format!("Gave up after {} attempts.", MAX_PASSWORD_ATTEMPTS),
    )
    .into())
}
