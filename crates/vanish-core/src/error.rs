//! Error types for Vanish core operations.
//!
//! Errors are descriptive at the core level; the CLI layer maps these to
//! user-friendly messages and exit codes.

use thiserror::Error;

use crate::storage::NoteId;

/// Result type alias for Vanish operations.
pub type Result<T> = std::result::Result<T, VanishError>;

/// Core error type for Vanish operations.
#[derive(Debug, Error)]
pub enum VanishError {
    /// No auth record exists yet; `setup` must run first
    #[error("Vault is not initialized")]
    NotInitialized,

    /// Password did not match the stored verification hash
    #[error("Incorrect password")]
    WrongPassword,

    /// Password matched but the wrapped master key failed to unwrap
    #[error("Vault is corrupted: {0}")]
    CorruptedVault(String),

    /// A note field failed authentication or was malformed
    #[error("Decryption error: {0}")]
    Decryption(String),

    /// Encryption or key derivation failure
    #[error("Encryption error: {0}")]
    Crypto(String),

    /// Note not found by ID
    #[error("Note not found: {0}")]
    NotFound(NoteId),

    /// Storage backend error (generic)
    #[error("Storage error: {0}")]
    Storage(String),

    /// SQLite-specific storage error
    #[error("SQLite error: {source}")]
    Sqlite {
        #[from]
        source: rusqlite::Error,
    },

    /// Invalid user input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl VanishError {
    /// True for failures of the persistence layer.
    pub fn is_storage(&self) -> bool {
        matches!(self, VanishError::Storage(_) | VanishError::Sqlite { .. })
    }
}

impl From<std::io::Error> for VanishError {
    fn from(err: std::io::Error) -> Self {
        VanishError::Storage(err.to_string())
    }
}
