//! Key material types.
//!
//! Both key types zeroize their bytes on drop and redact themselves in
//! `Debug` output so they never end up in logs.

use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::ZeroizeOnDrop;

/// Length of every symmetric key in bytes (AES-256).
pub const KEY_LENGTH: usize = 32;

/// A key derived from a password.
///
/// Used either as the key-encryption-key that wraps the master key or as the
/// password verification hash, depending on the derivation label.
#[derive(Clone, ZeroizeOnDrop)]
pub struct DerivedKey {
    key: [u8; KEY_LENGTH],
}

impl DerivedKey {
    pub(crate) fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self { key: bytes }
    }

    /// Get a reference to the raw key bytes.
    ///
    /// # Security
    ///
    /// Avoid storing or logging this value. Use only for immediate operations.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// The random key that encrypts every note field.
///
/// Never derived from the password and never persisted in cleartext. It is
/// deliberately not `Clone`: a session owns exactly one copy.
#[derive(ZeroizeOnDrop)]
pub struct MasterKey {
    key: [u8; KEY_LENGTH],
}

impl MasterKey {
    /// Generate a fresh master key from the OS random number generator.
    pub fn generate() -> Self {
        let mut key = [0u8; KEY_LENGTH];
        OsRng.fill_bytes(&mut key);
        Self { key }
    }

    pub(crate) fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self { key: bytes }
    }

    /// Get a reference to the raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }

    /// Compare two master keys in constant time.
    pub fn ct_eq(&self, other: &MasterKey) -> bool {
        constant_time_eq(&self.key, &other.key)
    }
}

impl std::fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MasterKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Constant-time byte comparison.
///
/// Length mismatch returns early; lengths are not secret here.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
