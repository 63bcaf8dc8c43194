//! Note lifecycle engine.
//!
//! [`NoteEngine`] encrypts drafts into rows, decrypts rows into views, and
//! enforces the destructive-read policy from [`policy`]. Reads are applied
//! through [`NoteStore::open_note`] so the check and the resulting delete or
//! increment cannot interleave with another reader.

pub mod policy;
pub mod types;

use std::sync::Arc;

use chrono::Utc;

use crate::crypto::{decrypt_field, encrypt_field, MasterKey};
use crate::error::{Result, VanishError};
use crate::storage::{
    is_storable_timestamp, NewNoteRow, NoteId, NoteRecord, NoteRowUpdate, NoteStore,
    OpenDecision, OpenOutcome,
};

pub use policy::{evaluate, DestroyReason, ReadDecision};
pub use types::{
    FieldText, NoteDraft, NoteSummary, OpenedNote, ReadOutcome, DECRYPTION_FAILED_SENTINEL,
};

/// CRUD over encrypted notes plus the destructive-read policy.
pub struct NoteEngine<S> {
    store: Arc<S>,
}

impl<S: NoteStore> NoteEngine<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Encrypt and store a new note with `open_count = 0`.
    ///
    /// # Errors
    ///
    /// - `VanishError::InvalidInput` if `max_opens` is `Some(0)` or
    ///   `expires_at` falls outside years 1-9999
    /// - a storage error if the row cannot be inserted
    pub fn create(&self, key: &MasterKey, draft: NoteDraft) -> Result<NoteId> {
        validate_draft(&draft)?;

        let row = NewNoteRow {
            encrypted_title: encrypt_field(&draft.title, key)?,
            encrypted_content: encrypt_field(&draft.content, key)?,
            created_at: Utc::now(),
            max_opens: draft.max_opens,
            expires_at: draft.expires_at,
            flags: draft.flags,
        };
        let id = self.store.insert_note(&row)?;

        tracing::info!(note_id = id, max_opens = ?draft.max_opens, "Note created");
        Ok(id)
    }

    /// Re-encrypt and overwrite a note. The open count is left as is.
    ///
    /// # Errors
    ///
    /// - `VanishError::NotFound` if no note has that id
    /// - `VanishError::InvalidInput` for the same draft checks as [`Self::create`]
    pub fn update(&self, id: NoteId, key: &MasterKey, draft: NoteDraft) -> Result<()> {
        validate_draft(&draft)?;

        let update = NoteRowUpdate {
            encrypted_title: encrypt_field(&draft.title, key)?,
            encrypted_content: encrypt_field(&draft.content, key)?,
            updated_at: Utc::now(),
            max_opens: draft.max_opens,
            expires_at: draft.expires_at,
            flags: draft.flags,
        };
        if !self.store.update_note(id, &update)? {
            return Err(VanishError::NotFound(id));
        }

        tracing::info!(note_id = id, "Note updated");
        Ok(())
    }

    /// Remove a note. Deleting a missing id is not an error.
    pub fn delete(&self, id: NoteId) -> Result<()> {
        if self.store.delete_note(id)? {
            tracing::info!(note_id = id, "Note deleted");
        }
        Ok(())
    }

    /// All notes, newest first, with only the title decrypted.
    pub fn list(&self, key: &MasterKey) -> Result<Vec<NoteSummary>> {
        let headers = self.store.list_note_headers()?;
        let summaries = headers
            .into_iter()
            .map(|header| NoteSummary {
                id: header.id,
                title: decrypt_or_unreadable(&header.encrypted_title, key, header.id, "title"),
                created_at: header.created_at,
                updated_at: header.updated_at,
                open_count: header.open_count,
                max_opens: header.max_opens,
                expires_at: header.expires_at,
                flags: header.flags,
            })
            .collect();
        Ok(summaries)
    }

    /// Read a note, applying the destructive-read policy.
    ///
    /// A note with `max_opens = n` is shown `n` times; the read after that,
    /// or any read past `expires_at`, deletes it and returns
    /// [`ReadOutcome::Deleted`]. Fields that fail to decrypt come back as
    /// [`FieldText::Unreadable`] and the read still counts.
    ///
    /// # Errors
    ///
    /// Returns `VanishError::NotFound` if no note has that id.
    pub fn read(&self, id: NoteId, key: &MasterKey) -> Result<ReadOutcome> {
        let now = Utc::now();
        let mut reason = None;
        let mut decide = |record: &NoteRecord| match evaluate(&record.limits(), now) {
            ReadDecision::Open => OpenDecision::Open,
            ReadDecision::Destroy(why) => {
                reason = Some(why);
                OpenDecision::Destroy
            }
        };

        match self.store.open_note(id, now, &mut decide)? {
            OpenOutcome::Missing => Err(VanishError::NotFound(id)),
            OpenOutcome::Destroyed(record) => {
                tracing::info!(
                    note_id = record.id,
                    open_count = record.open_count,
                    reason = reason.map(|r| r.as_str()).unwrap_or("unknown"),
                    "Note destroyed on read"
                );
                Ok(ReadOutcome::Deleted)
            }
            OpenOutcome::Opened(record) => {
                tracing::debug!(
                    note_id = record.id,
                    open_count = record.open_count,
                    "Note opened"
                );
                Ok(ReadOutcome::Opened(open_record(record, key)))
            }
        }
    }

    /// Delete every note whose limit has already been reached.
    ///
    /// Returns the number of notes removed.
    pub fn purge_exhausted(&self) -> Result<usize> {
        let now = Utc::now();
        let removed = self
            .store
            .purge_where(&mut |limits| policy::is_exhausted(limits, now))?;
        if removed > 0 {
            tracing::info!(removed, "Purged exhausted notes");
        }
        Ok(removed)
    }
}

fn validate_draft(draft: &NoteDraft) -> Result<()> {
    if draft.max_opens == Some(0) {
        return Err(VanishError::InvalidInput(
            "max_opens must be at least 1".to_string(),
        ));
    }
    if let Some(expires_at) = draft.expires_at {
        if !is_storable_timestamp(&expires_at) {
            return Err(VanishError::InvalidInput(format!(
                "expires_at {} is outside years 1-9999",
                expires_at
            )));
        }
    }
    Ok(())
}

fn open_record(record: NoteRecord, key: &MasterKey) -> OpenedNote {
    OpenedNote {
        id: record.id,
        title: decrypt_or_unreadable(&record.encrypted_title, key, record.id, "title"),
        content: decrypt_or_unreadable(&record.encrypted_content, key, record.id, "content"),
        created_at: record.created_at,
        updated_at: record.updated_at,
        open_count: record.open_count,
        max_opens: record.max_opens,
        expires_at: record.expires_at,
        flags: record.flags,
    }
}

fn decrypt_or_unreadable(token: &str, key: &MasterKey, id: NoteId, field: &str) -> FieldText {
    match decrypt_field(token, key) {
        Ok(text) => FieldText::Text(text),
        Err(e) => {
            tracing::warn!(note_id = id, field, error = %e, "Note field is unreadable");
            FieldText::Unreadable
        }
    }
}
