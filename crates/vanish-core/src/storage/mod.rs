//! Storage abstraction for Vanish.
//!
//! The engine is written against the [`AuthStore`] and [`NoteStore`]
//! traits; [`SqliteStore`] implements both on top of a single SQLite file.
//!
//! ## Security
//!
//! Storage never sees plaintext or key material:
//! - note titles and contents arrive as authenticated cipher tokens
//! - the auth record holds a salt, a verification hash and the wrapped
//!   master key

pub mod sqlite;
pub mod traits;
pub mod types;

// Re-export public types
pub use sqlite::SqliteStore;
pub use traits::{AuthStore, NoteStore};
pub use types::{
    is_storable_timestamp, AuthRecord, NewNoteRow, NoteFlags, NoteHeader, NoteId, NoteLimits,
    NoteRecord, NoteRowUpdate, OpenDecision, OpenOutcome,
};
