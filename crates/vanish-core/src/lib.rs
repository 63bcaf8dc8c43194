//! # Vanish Core
//!
//! Core library for Vanish - encrypted notes that destroy themselves after a
//! number of reads or a point in time.
//!
//! This crate holds the key hierarchy, the note lifecycle and the storage
//! layer, independent of any front-end.
//!
//! ## Architecture
//!
//! - **crypto**: key derivation, field encryption, key material types
//! - **vault**: password setup and master key unlock
//! - **notes**: note CRUD and the destructive-read policy
//! - **storage**: store traits and the SQLite implementation
//! - **service**: the [`Vanish`] facade and [`Session`]

pub mod crypto;
pub mod error;
pub mod notes;
pub mod service;
pub mod storage;
pub mod vault;

pub use crypto::{KdfParams, MasterKey};
pub use error::{Result, VanishError};
pub use notes::{FieldText, NoteDraft, NoteEngine, NoteSummary, OpenedNote, ReadOutcome};
pub use service::{Session, Vanish};
pub use storage::{AuthStore, NoteFlags, NoteId, NoteStore, SqliteStore};
pub use vault::MasterKeyVault;

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
