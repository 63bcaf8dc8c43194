//! Authenticated field encryption (AES-256-GCM).
//!
//! Token wire format, URL-safe base64 without padding:
//!
//! ```text
//! [ version (1) | nonce (12) | ciphertext | tag (16) ]
//! ```
//!
//! Every call draws a fresh random nonce, so encrypting the same plaintext
//! twice yields different tokens. The associated data binds a token to its
//! purpose: a wrapped master key cannot be fed back in as a note field.

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng, Payload};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use zeroize::Zeroizing;

use super::key::{DerivedKey, MasterKey, KEY_LENGTH};
use crate::error::{Result, VanishError};

const TOKEN_VERSION: u8 = 1;
const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;

/// Associated data for note title/content tokens.
const FIELD_AAD: &[u8] = b"vanish/note-field";

/// Associated data for the wrapped master key.
const KEY_WRAP_AAD: &[u8] = b"vanish/master-key";

/// Encrypt `plaintext` under a 32-byte key and return the raw token bytes.
pub fn seal(key: &[u8; KEY_LENGTH], plaintext: &[u8], aad: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| VanishError::Crypto(format!("Invalid key: {}", e)))?;
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let ciphertext = cipher
        .encrypt(&nonce, Payload { msg: plaintext, aad })
        .map_err(|_| VanishError::Crypto("AES-GCM encryption failed".to_string()))?;

    let mut out = Vec::with_capacity(1 + NONCE_LEN + ciphertext.len());
    out.push(TOKEN_VERSION);
    out.extend_from_slice(&nonce);
    out.extend_from_slice(&ciphertext);
    Ok(out)
}

/// Decrypt raw token bytes produced by [`seal`].
///
/// # Errors
///
/// Returns `VanishError::Decryption` on an unknown version, a truncated
/// token, or a tag mismatch. No plaintext is returned on failure.
pub fn open(key: &[u8; KEY_LENGTH], data: &[u8], aad: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    let (version, rest) = data
        .split_first()
        .ok_or_else(|| VanishError::Decryption("Token is empty".to_string()))?;
    if *version != TOKEN_VERSION {
        return Err(VanishError::Decryption(format!(
            "Unsupported token version {}",
            version
        )));
    }
    if rest.len() < NONCE_LEN + TAG_LEN {
        return Err(VanishError::Decryption("Token too short".to_string()));
    }

    let (nonce_bytes, ciphertext) = rest.split_at(NONCE_LEN);
    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| VanishError::Crypto(format!("Invalid key: {}", e)))?;

    let plaintext = cipher
        .decrypt(
            Nonce::from_slice(nonce_bytes),
            Payload {
                msg: ciphertext,
                aad,
            },
        )
        .map_err(|_| VanishError::Decryption("Authentication tag mismatch".to_string()))?;

    Ok(Zeroizing::new(plaintext))
}

/// Encrypt a note field under the master key.
///
/// # Examples
///
/// ```
/// use vanish_core::crypto::{decrypt_field, encrypt_field, MasterKey};
///
/// let key = MasterKey::generate();
/// let token = encrypt_field("buy milk", &key).unwrap();
/// assert_eq!(decrypt_field(&token, &key).unwrap(), "buy milk");
/// ```
pub fn encrypt_field(plaintext: &str, key: &MasterKey) -> Result<String> {
    let sealed = seal(key.as_bytes(), plaintext.as_bytes(), FIELD_AAD)?;
    Ok(URL_SAFE_NO_PAD.encode(sealed))
}

/// Decrypt a note field token under the master key.
pub fn decrypt_field(token: &str, key: &MasterKey) -> Result<String> {
    let raw = URL_SAFE_NO_PAD
        .decode(token.trim())
        .map_err(|e| VanishError::Decryption(format!("Malformed token: {}", e)))?;
    let plaintext = open(key.as_bytes(), &raw, FIELD_AAD)?;
    String::from_utf8(plaintext.to_vec())
        .map_err(|_| VanishError::Decryption("Plaintext is not valid UTF-8".to_string()))
}

/// Wrap the master key under a key-encryption-key.
pub fn wrap_master_key(kek: &DerivedKey, master_key: &MasterKey) -> Result<String> {
    let sealed = seal(kek.as_bytes(), master_key.as_bytes(), KEY_WRAP_AAD)?;
    Ok(URL_SAFE_NO_PAD.encode(sealed))
}

/// Unwrap a master key token.
///
/// Any failure is reported as `VanishError::Decryption`; the vault decides
/// what that means.
pub fn unwrap_master_key(kek: &DerivedKey, token: &str) -> Result<MasterKey> {
    let raw = URL_SAFE_NO_PAD
        .decode(token.trim())
        .map_err(|e| VanishError::Decryption(format!("Malformed wrapped key: {}", e)))?;
    let plaintext = open(kek.as_bytes(), &raw, KEY_WRAP_AAD)?;
    let bytes: [u8; KEY_LENGTH] = plaintext.as_slice().try_into().map_err(|_| {
        VanishError::Decryption(format!(
            "Unwrapped key has wrong length ({} bytes)",
            plaintext.len()
        ))
    })?;
    Ok(MasterKey::from_bytes(bytes))
}
