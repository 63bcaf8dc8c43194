//! CLI error types for structured error handling.
//!
//! Typed errors map to specific exit codes. Core errors are translated at
//! the top level in `main`.

use std::fmt;

use vanish_core::VanishError;

use crate::constants::exit_codes;

/// CLI-specific errors with associated exit codes.
#[derive(Debug)]
pub enum CliError {
    /// Resource not found (vault, note)
    NotFound { message: String, hint: String },

    /// Authentication failed (wrong password, too many attempts)
    AuthFailed {
        message: String,
        hint: Option<String>,
    },

    /// Invalid user input
    InvalidInput(String),

    /// The stored vault record cannot be used
    Corrupted(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::NotFound { message, hint } => {
                write!(f, "{}\n{}", message, hint)
            }
            CliError::AuthFailed { message, hint } => {
                if let Some(h) = hint {
                    write!(f, "{}\n{}", message, h)
                } else {
                    write!(f, "{}", message)
                }
            }
            CliError::InvalidInput(message) => write!(f, "{}", message),
            CliError::Corrupted(message) => write!(f, "Vault is corrupted: {}", message),
        }
    }
}

impl std::error::Error for CliError {}

impl CliError {
    /// Create a NotFound error with message and hint.
    pub fn not_found(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::NotFound {
            message: message.into(),
            hint: hint.into(),
        }
    }

    /// Create an AuthFailed error with message and optional hint.
    pub fn auth_failed(message: impl Into<String>) -> Self {
        CliError::AuthFailed {
            message: message.into(),
            hint: None,
        }
    }

    /// Create an AuthFailed error with message and hint.
    pub fn auth_failed_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::AuthFailed {
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    /// Create an InvalidInput error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        CliError::InvalidInput(message.into())
    }

    /// Translate a core error that has a dedicated exit code.
    pub fn from_core(err: &VanishError) -> Option<Self> {
        let mapped = match err {
            VanishError::NotInitialized => CliError::not_found(
                "Vault is not initialized.",
                "Hint: Run `vanish init` to set a password.",
            ),
            VanishError::NotFound(id) => CliError::not_found(
                format!("Note {} not found.", id),
                "Hint: Run `vanish list` to see note IDs.",
            ),
            VanishError::WrongPassword => CliError::auth_failed("Incorrect password."),
            VanishError::CorruptedVault(message) => CliError::Corrupted(message.clone()),
            VanishError::InvalidInput(message) => CliError::InvalidInput(message.clone()),
            _ => return None,
        };
        Some(mapped)
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::NotFound { .. } => exit_codes::NOT_FOUND,
            CliError::AuthFailed { .. } => exit_codes::AUTH_FAILED,
            CliError::InvalidInput(_) => exit_codes::INVALID_INPUT,
            CliError::Corrupted(_) => exit_codes::CORRUPTED,
        }
    }
}

/// Print an error to stderr and return the exit code it maps to.
pub fn report(err: &anyhow::Error) -> i32 {
    if let Some(cli_err) = err.downcast_ref::<CliError>() {
        eprintln!("Error: {}", cli_err);
        return cli_err.exit_code();
    }
    if let Some(core_err) = err.downcast_ref::<VanishError>() {
        if let Some(cli_err) = CliError::from_core(core_err) {
            eprintln!("Error: {}", cli_err);
            return cli_err.exit_code();
        }
    }
    eprintln!("Error: {:#}", err);
    exit_codes::GENERAL
}
