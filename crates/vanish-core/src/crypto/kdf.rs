//! Password-based key derivation.
//!
//! PBKDF2-HMAC-SHA256 is the default; Argon2id is available for vaults that
//! want a memory-hard KDF. The parameters used at setup are stored in the
//! auth record, so a vault always unlocks with the cost it was created with.

use argon2::Argon2;
use pbkdf2::pbkdf2_hmac;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use zeroize::Zeroizing;

use super::key::{DerivedKey, KEY_LENGTH};
use crate::error::{Result, VanishError};

/// Default PBKDF2 iteration count.
pub const DEFAULT_PBKDF2_ITERATIONS: u32 = 200_000;

/// Argon2id parameters:
/// - Memory: 64 MB (64 * 1024 KB)
/// - Iterations: 3
/// - Parallelism: 1
pub const ARGON2_MEMORY_KB: u32 = 64 * 1024;
pub const ARGON2_ITERATIONS: u32 = 3;
pub const ARGON2_PARALLELISM: u32 = 1;

/// Salt length generated at setup.
pub const SALT_LENGTH: usize = 16;

/// Label for the key-encryption-key.
pub const KEK_LABEL: &str = "kek";

/// Label for the password verification hash.
pub const VERIFY_LABEL: &str = "verify";

/// KDF algorithm and cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "algorithm", rename_all = "snake_case")]
pub enum KdfParams {
    Pbkdf2Sha256 {
        iterations: u32,
    },
    Argon2id {
        memory_kb: u32,
        iterations: u32,
        parallelism: u32,
    },
}

impl KdfParams {
    pub fn pbkdf2(iterations: u32) -> Self {
        KdfParams::Pbkdf2Sha256 { iterations }
    }

    pub fn argon2id() -> Self {
        KdfParams::Argon2id {
            memory_kb: ARGON2_MEMORY_KB,
            iterations: ARGON2_ITERATIONS,
            parallelism: ARGON2_PARALLELISM,
        }
    }

    /// Short algorithm name, as used in config files.
    pub fn algorithm_name(&self) -> &'static str {
        match self {
            KdfParams::Pbkdf2Sha256 { .. } => "pbkdf2_sha256",
            KdfParams::Argon2id { .. } => "argon2id",
        }
    }
}

impl Default for KdfParams {
    fn default() -> Self {
        KdfParams::pbkdf2(DEFAULT_PBKDF2_ITERATIONS)
    }
}

/// Generate a fresh random salt.
pub fn generate_salt() -> [u8; SALT_LENGTH] {
    let mut salt = [0u8; SALT_LENGTH];
    OsRng.fill_bytes(&mut salt);
    salt
}

/// Derive a key from a password, salt and purpose label.
///
/// The label separates derivations that share a password and salt: the
/// effective salt is `salt` for an empty label and `salt || 0x00 || label`
/// otherwise. An empty password is accepted here; callers that want a
/// policy use [`super::validate_password`] first.
///
/// # Errors
///
/// Returns `VanishError::InvalidInput` if the salt is shorter than
/// [`SALT_LENGTH`] or the cost parameters are invalid.
///
/// # Examples
///
/// ```
/// use vanish_core::crypto::{derive_key, KdfParams};
///
/// let salt = b"unique-salt-per-vault";
/// let kek = derive_key("my-password", salt, &KdfParams::pbkdf2(1_000), "kek").unwrap();
/// let check = derive_key("my-password", salt, &KdfParams::pbkdf2(1_000), "verify").unwrap();
/// assert_ne!(kek.as_bytes(), check.as_bytes());
/// ```
pub fn derive_key(
    password: &str,
    salt: &[u8],
    params: &KdfParams,
    label: &str,
) -> Result<DerivedKey> {
    if salt.len() < SALT_LENGTH {
        return Err(VanishError::InvalidInput(format!(
            "Salt must be at least {} bytes",
            SALT_LENGTH
        )));
    }

    let mut effective_salt = Zeroizing::new(Vec::with_capacity(salt.len() + 1 + label.len()));
    effective_salt.extend_from_slice(salt);
    if !label.is_empty() {
        effective_salt.push(0);
        effective_salt.extend_from_slice(label.as_bytes());
    }

    let mut key_bytes = [0u8; KEY_LENGTH];
    match *params {
        KdfParams::Pbkdf2Sha256 { iterations } => {
            if iterations == 0 {
                return Err(VanishError::InvalidInput(
                    "PBKDF2 iterations must be positive".to_string(),
                ));
            }
            pbkdf2_hmac::<Sha256>(
                password.as_bytes(),
                &effective_salt,
                iterations,
                &mut key_bytes,
            );
        }
        KdfParams::Argon2id {
            memory_kb,
            iterations,
            parallelism,
        } => {
            let params = argon2::Params::new(memory_kb, iterations, parallelism, Some(KEY_LENGTH))
                .map_err(|e| VanishError::InvalidInput(format!("Invalid Argon2 params: {}", e)))?;
            let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);
            argon2
                .hash_password_into(password.as_bytes(), &effective_salt, &mut key_bytes)
                .map_err(|e| VanishError::Crypto(format!("Key derivation failed: {}", e)))?;
        }
    }

    Ok(DerivedKey::from_bytes(key_bytes))
}
