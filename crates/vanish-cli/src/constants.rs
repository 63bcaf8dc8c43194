//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error (used by anyhow for unhandled errors)
/// - 2: Misuse of shell command (reserved by shells)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// General failure.
    pub const GENERAL: i32 = 1;

    /// Resource not found (vault, note).
    pub const NOT_FOUND: i32 = 3;

    /// Invalid user input or arguments.
    pub const INVALID_INPUT: i32 = 4;

    /// Authentication failed (wrong password, too many attempts).
    pub const AUTH_FAILED: i32 = 5;

    /// The vault record is damaged.
    pub const CORRUPTED: i32 = 6;
}

/// Environment variable consulted before prompting for the password.
pub const PASSWORD_ENV: &str = "VANISH_PASSWORD";

/// Environment variable holding the tracing filter.
pub const LOG_ENV: &str = "VANISH_LOG";

/// Interactive unlock attempts before giving up.
pub const MAX_PASSWORD_ATTEMPTS: u32 = 3;
