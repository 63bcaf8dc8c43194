//! Master key vault: password setup and unlock.
//!
//! On setup a random master key is generated and stored wrapped under a
//! KEK derived from the password. A separate verification hash, derived
//! under a different label, lets `verify` tell a wrong password apart from
//! a damaged vault without ever exposing key material.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::Utc;

use crate::crypto::cipher::{unwrap_master_key, wrap_master_key};
use crate::crypto::kdf::{KEK_LABEL, VERIFY_LABEL};
use crate::crypto::{constant_time_eq, derive_key, generate_salt, KdfParams, MasterKey};
use crate::error::{Result, VanishError};
use crate::storage::{AuthRecord, AuthStore};

/// Owns the setup/verification protocol for the single auth record.
pub struct MasterKeyVault<S> {
    store: Arc<S>,
    kdf: KdfParams,
}

impl<S: AuthStore> MasterKeyVault<S> {
    /// Create a vault over `store`. `kdf` applies to new setups only;
    /// `verify` always uses the parameters stored with the record.
    pub fn new(store: Arc<S>, kdf: KdfParams) -> Self {
        Self { store, kdf }
    }

    /// Whether setup has run.
    pub fn is_initialized(&self) -> Result<bool> {
        self.store.has_auth()
    }

    /// Initialise the vault for `password` and return the new master key.
    ///
    /// Replaces any existing auth record, which makes notes encrypted under
    /// the previous master key unreadable.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the record cannot be persisted.
    pub fn setup(&self, password: &str) -> Result<MasterKey> {
        let salt = generate_salt();
        let kek = derive_key(password, &salt, &self.kdf, KEK_LABEL)?;
        let verification = derive_key(password, &salt, &self.kdf, VERIFY_LABEL)?;

        let master_key = MasterKey::generate();
        let wrapped_master_key = wrap_master_key(&kek, &master_key)?;

        let record = AuthRecord {
            verification_hash: hex::encode(verification.as_bytes()),
            salt: STANDARD.encode(salt),
            wrapped_master_key,
            kdf: self.kdf,
            created_at: Utc::now(),
        };
        self.store.save_auth(&record)?;

        tracing::info!(kdf = self.kdf.algorithm_name(), "Vault initialized");
        Ok(master_key)
    }

    /// Check `password` and unwrap the master key.
    ///
    /// Returns `Ok(None)` for a wrong password.
    ///
    /// # Errors
    ///
    /// - `VanishError::NotInitialized` if setup has not run
    /// - `VanishError::CorruptedVault` if the password matched but the
    ///   stored record cannot be decoded or unwrapped
    pub fn verify(&self, password: &str) -> Result<Option<MasterKey>> {
        let record = self
            .store
            .load_auth()?
            .ok_or(VanishError::NotInitialized)?;

        let salt = STANDARD
            .decode(&record.salt)
            .map_err(|e| corrupted(format!("Stored salt is not valid base64: {}", e)))?;
        let expected = hex::decode(&record.verification_hash)
            .map_err(|e| corrupted(format!("Stored verification hash is not valid hex: {}", e)))?;

        let candidate = derive_key(password, &salt, &record.kdf, VERIFY_LABEL).map_err(|e| {
            corrupted(format!("Stored KDF parameters are unusable: {}", e))
        })?;
        if !constant_time_eq(candidate.as_bytes(), &expected) {
            tracing::debug!("Password verification failed");
            return Ok(None);
        }

        let kek = derive_key(password, &salt, &record.kdf, KEK_LABEL)?;
        let master_key = unwrap_master_key(&kek, &record.wrapped_master_key)
            .map_err(|e| corrupted(format!("Master key unwrap failed: {}", e)))?;

        tracing::info!("Vault unlocked");
        Ok(Some(master_key))
    }
}

fn corrupted(message: String) -> VanishError {
    tracing::warn!(reason = %message, "Vault record is corrupted");
    VanishError::CorruptedVault(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SqliteStore;

    fn vault() -> MasterKeyVault<SqliteStore> {
        let store = Arc::new(SqliteStore::open_in_memory().unwrap());
        MasterKeyVault::new(store, KdfParams::pbkdf2(1_000))
    }

    #[test]
    fn test_verify_before_setup_is_not_initialized() {
        let vault = vault();
        assert!(!vault.is_initialized().unwrap());
        assert!(matches!(
            vault.verify("anything"),
            Err(VanishError::NotInitialized)
        ));
    }

    #[test]
    fn test_setup_then_verify_returns_same_key() {
        let vault = vault();
        let generated = vault.setup("pw1").unwrap();
        assert!(vault.is_initialized().unwrap());

        let unlocked = vault.verify("pw1").unwrap().unwrap();
        assert_eq!(unlocked.as_bytes(), generated.as_bytes());
        assert!(vault.verify("pw2").unwrap().is_none());
    }

    #[test]
    fn test_record_holds_no_key_material_in_clear() {
        let vault = vault();
        let master = vault.setup("password-123").unwrap();
        let record = vault.store.load_auth().unwrap().unwrap();

        let master_hex = hex::encode(master.as_bytes());
        let master_b64 = STANDARD.encode(master.as_bytes());
        assert_ne!(record.verification_hash, master_hex);
        assert!(!record.wrapped_master_key.contains(&master_b64));
        assert_eq!(STANDARD.decode(&record.salt).unwrap().len(), 16);
        assert_eq!(hex::decode(&record.verification_hash).unwrap().len(), 32);
    }

    #[test]
    fn test_setup_again_replaces_record() {
        let vault = vault();
        let first = vault.setup("first-password").unwrap();
        let second = vault.setup("second-password").unwrap();

        assert!(!first.ct_eq(&second));
        assert!(vault.verify("first-password").unwrap().is_none());
        let unlocked = vault.verify("second-password").unwrap().unwrap();
        assert!(unlocked.ct_eq(&second));
    }

    #[test]
    fn test_empty_password_round_trips() {
        let vault = vault();
        let generated = vault.setup("").unwrap();
        assert!(vault.verify("").unwrap().unwrap().ct_eq(&generated));
        assert!(vault.verify(" ").unwrap().is_none());
    }

    #[test]
    fn test_tampered_wrapped_key_is_corruption() {
        let vault = vault();
        vault.setup("pw1").unwrap();

        let mut record = vault.store.load_auth().unwrap().unwrap();
        let mut chars: Vec<char> = record.wrapped_master_key.chars().collect();
        let mid = chars.len() / 2;
        chars[mid] = if chars[mid] == 'A' { 'B' } else { 'A' };
        record.wrapped_master_key = chars.into_iter().collect();
        vault.store.save_auth(&record).unwrap();

        assert!(matches!(
            vault.verify("pw1"),
            Err(VanishError::CorruptedVault(_))
        ));
        // A wrong password is still just a wrong password.
        assert!(vault.verify("pw2").unwrap().is_none());
    }

    #[test]
    fn test_undecodable_salt_is_corruption() {
        let vault = vault();
        vault.setup("pw1").unwrap();

        let mut record = vault.store.load_auth().unwrap().unwrap();
        record.salt = "***".to_string();
        vault.store.save_auth(&record).unwrap();

        assert!(matches!(
            vault.verify("pw1"),
            Err(VanishError::CorruptedVault(_))
        ));
    }

    #[test]
    fn test_verify_uses_stored_kdf_params() {
        let store = Arc::new(SqliteStore::open_in_memory().unwrap());
        let original = MasterKeyVault::new(Arc::clone(&store), KdfParams::pbkdf2(1_000));
        let generated = original.setup("pw1").unwrap();

        let reconfigured = MasterKeyVault::new(store, KdfParams::pbkdf2(2_000));
        let unlocked = reconfigured.verify("pw1").unwrap().unwrap();
        assert!(unlocked.ct_eq(&generated));
    }
}
