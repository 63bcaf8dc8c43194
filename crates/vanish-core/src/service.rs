//! Front-end facade.
//!
//! [`Vanish`] ties the vault and the note engine to one store. Everything a
//! front-end does goes through it with plaintext in and out; the unlocked
//! master key lives only inside a [`Session`].

use std::fmt;
use std::sync::Arc;

use crate::crypto::{KdfParams, MasterKey};
use crate::error::{Result, VanishError};
use crate::notes::{NoteDraft, NoteEngine, NoteSummary, ReadOutcome};
use crate::storage::{AuthStore, NoteId, NoteStore};
use crate::vault::MasterKeyVault;

/// An unlocked vault. Dropping it zeroizes the master key.
pub struct Session {
    master_key: MasterKey,
}

impl Session {
    fn new(master_key: MasterKey) -> Self {
        Self { master_key }
    }

    pub fn master_key(&self) -> &MasterKey {
        &self.master_key
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session").finish_non_exhaustive()
    }
}

/// Vault plus note engine over a single store.
pub struct Vanish<S> {
    vault: MasterKeyVault<S>,
    notes: NoteEngine<S>,
}

impl<S: AuthStore + NoteStore> Vanish<S> {
    /// Build the facade. `kdf` is used by `setup`; unlocking always uses the
    /// parameters recorded at setup.
    pub fn new(store: S, kdf: KdfParams) -> Self {
        let store = Arc::new(store);
        Self {
            vault: MasterKeyVault::new(Arc::clone(&store), kdf),
            notes: NoteEngine::new(store),
        }
    }

    pub fn is_initialized(&self) -> Result<bool> {
        self.vault.is_initialized()
    }

    /// Initialise the vault and return an unlocked session.
    pub fn setup(&self, password: &str) -> Result<Session> {
        self.vault.setup(password).map(Session::new)
    }

    /// Check a password. `Ok(None)` means it was wrong.
    pub fn verify(&self, password: &str) -> Result<Option<Session>> {
        Ok(self.vault.verify(password)?.map(Session::new))
    }

    /// Like [`Vanish::verify`], but a wrong password is an error.
    ///
    /// # Errors
    ///
    /// - `VanishError::WrongPassword` on mismatch
    /// - `VanishError::NotInitialized` if setup has not run
    /// - `VanishError::CorruptedVault` if the stored key cannot be unwrapped
    pub fn unlock(&self, password: &str) -> Result<Session> {
        self.verify(password)?.ok_or(VanishError::WrongPassword)
    }

    pub fn create_note(&self, session: &Session, draft: NoteDraft) -> Result<NoteId> {
        self.notes.create(session.master_key(), draft)
    }

    pub fn read_note(&self, session: &Session, id: NoteId) -> Result<ReadOutcome> {
        self.notes.read(id, session.master_key())
    }

    pub fn update_note(&self, session: &Session, id: NoteId, draft: NoteDraft) -> Result<()> {
        self.notes.update(id, session.master_key(), draft)
    }

    pub fn delete_note(&self, id: NoteId) -> Result<()> {
        self.notes.delete(id)
    }

    pub fn list_notes(&self, session: &Session) -> Result<Vec<NoteSummary>> {
        self.notes.list(session.master_key())
    }

    pub fn purge_exhausted(&self) -> Result<usize> {
        self.notes.purge_exhausted()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SqliteStore;

    fn app() -> Vanish<SqliteStore> {
        Vanish::new(
            SqliteStore::open_in_memory().unwrap(),
            KdfParams::pbkdf2(1_000),
        )
    }

    #[test]
    fn test_unlock_maps_mismatch_to_wrong_password() {
        let app = app();
        app.setup("correct horse").unwrap();

        assert!(matches!(
            app.unlock("battery staple"),
            Err(VanishError::WrongPassword)
        ));
        assert!(app.unlock("correct horse").is_ok());
    }

    #[test]
    fn test_unlock_before_setup() {
        let app = app();
        assert!(!app.is_initialized().unwrap());
        assert!(matches!(
            app.unlock("anything"),
            Err(VanishError::NotInitialized)
        ));
    }

    #[test]
    fn test_session_from_unlock_reads_notes_from_setup() {
        let app = app();
        let first = app.setup("pw1").unwrap();
        let id = app
            .create_note(&first, NoteDraft::new("T", "C"))
            .unwrap();
        drop(first);

        let session = app.unlock("pw1").unwrap();
        let summaries = app.list_notes(&session).unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].title.as_str(), "T");

        let note = app.read_note(&session, id).unwrap().opened().unwrap();
        assert_eq!(note.content.as_str(), "C");
    }

    #[test]
    fn test_session_debug_is_redacted() {
        let app = app();
        let session = app.setup("pw1").unwrap();
        let rendered = format!("{:?}", session);
        assert_eq!(rendered, "Session { .. }");
    }
}
