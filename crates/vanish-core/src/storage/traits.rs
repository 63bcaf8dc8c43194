//! Storage traits.
//!
//! The engine only ever talks to these traits. Implementations must store
//! ciphertext exactly as given and must run [`NoteStore::open_note`] and
//! [`NoteStore::purge_where`] as single transactions.

use chrono::{DateTime, Utc};

use super::types::{
    AuthRecord, NewNoteRow, NoteHeader, NoteId, NoteLimits, NoteRecord, NoteRowUpdate,
    OpenDecision, OpenOutcome,
};
use crate::error::Result;

/// Persistence for the singleton auth record.
pub trait AuthStore: Send + Sync {
    /// Load the auth record, if one exists.
    fn load_auth(&self) -> Result<Option<AuthRecord>>;

    /// Store the auth record, replacing any existing one.
    fn save_auth(&self, record: &AuthRecord) -> Result<()>;

    /// Whether an auth record exists.
    fn has_auth(&self) -> Result<bool> {
        Ok(self.load_auth()?.is_some())
    }
}

/// Persistence for note rows.
pub trait NoteStore: Send + Sync {
    /// Insert a note with `open_count = 0` and return its new id.
    fn insert_note(&self, note: &NewNoteRow) -> Result<NoteId>;

    /// Get a note by id.
    ///
    /// Returns `Ok(None)` if not found.
    fn get_note(&self, id: NoteId) -> Result<Option<NoteRecord>>;

    /// Overwrite a note's fields, limits and flags.
    ///
    /// Returns `Ok(false)` if no row has that id.
    fn update_note(&self, id: NoteId, update: &NoteRowUpdate) -> Result<bool>;

    /// Delete a note. Returns whether a row was removed.
    fn delete_note(&self, id: NoteId) -> Result<bool>;

    /// All notes without content, newest first.
    fn list_note_headers(&self) -> Result<Vec<NoteHeader>>;

    /// Atomically load a note, ask `decide` what to do with it, and apply it.
    ///
    /// No other read or write of the same row may interleave between the
    /// call to `decide` and the resulting delete or increment.
    fn open_note(
        &self,
        id: NoteId,
        now: DateTime<Utc>,
        decide: &mut dyn FnMut(&NoteRecord) -> OpenDecision,
    ) -> Result<OpenOutcome>;

    /// Atomically delete every note for which `matches` returns true.
    ///
    /// Returns the number of rows removed.
    fn purge_where(&self, matches: &mut dyn FnMut(&NoteLimits) -> bool) -> Result<usize>;
}
