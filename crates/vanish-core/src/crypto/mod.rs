//! Cryptographic operations for Vanish.
//!
//! - **PBKDF2-HMAC-SHA256 / Argon2id**: password-based key derivation
//! - **AES-256-GCM**: authenticated encryption of note fields and of the
//!   wrapped master key
//!
//! ## Key hierarchy
//!
//! ```text
//! password + salt --KDF("kek")----> KEK --wraps--> master key --encrypts--> note fields
//! password + salt --KDF("verify")-> verification hash (stored, compared in constant time)
//! ```
//!
//! ## Threat Model
//!
//! We defend against:
//! - Theft of the database file
//! - Offline brute-force attacks on the password (slow KDF)
//! - Tampering with stored ciphertext (authenticated encryption)
//!
//! We do NOT defend against:
//! - Compromised OS / keylogger
//! - Access to an unlocked session / process memory

pub mod cipher;
pub mod kdf;
pub mod key;
pub mod password;

pub use cipher::{decrypt_field, encrypt_field};
pub use kdf::{derive_key, generate_salt, KdfParams};
pub use key::{constant_time_eq, DerivedKey, MasterKey};
pub use password::validate_password;
