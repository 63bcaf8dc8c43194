//! SQLite storage backend.
//!
//! Notes and the auth record live in an ordinary SQLite file; every text
//! column that could hold user content stores cipher tokens only. The
//! connection sits behind a mutex and multi-step operations run in
//! `IMMEDIATE` transactions, which also serialises them against other
//! processes sharing the file.

mod row;

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, TransactionBehavior};

use crate::error::{Result, VanishError};
use crate::storage::traits::{AuthStore, NoteStore};
use crate::storage::types::{
    format_timestamp, AuthRecord, NewNoteRow, NoteHeader, NoteId, NoteLimits, NoteRecord,
    NoteRowUpdate, OpenDecision, OpenOutcome,
};

use row::{AuthRow, HeaderRow, LimitsRow, NoteRow, HEADER_COLUMNS, NOTE_COLUMNS};

/// On-disk format version recorded in the `meta` table.
pub const FORMAT_VERSION: &str = "1";

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS meta (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    -- At most one row: the CHECK pins the id.
    CREATE TABLE IF NOT EXISTS auth (
        id INTEGER PRIMARY KEY CHECK (id = 1),
        verification_hash TEXT NOT NULL,
        salt TEXT NOT NULL,
        wrapped_master_key TEXT NOT NULL,
        kdf_json TEXT NOT NULL,
        created_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS notes (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        content TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        open_count INTEGER NOT NULL DEFAULT 0 CHECK (open_count >= 0),
        max_opens INTEGER CHECK (max_opens IS NULL OR max_opens > 0),
        expires_at TEXT,
        is_reflection INTEGER NOT NULL DEFAULT 0,
        blind_mode INTEGER NOT NULL DEFAULT 0
    );

    CREATE INDEX IF NOT EXISTS notes_created_at ON notes (created_at);
"#;

/// SQLite-backed implementation of [`AuthStore`] and [`NoteStore`].
pub struct SqliteStore {
    path: Option<PathBuf>,
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database at `path`.
    ///
    /// # Errors
    ///
    /// Returns `VanishError::Storage` if the file cannot be opened, or was
    /// written by an incompatible format version.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    VanishError::Storage(format!(
                        "Failed to create database directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let mut conn = Connection::open(path).map_err(|e| {
            VanishError::Storage(format!("Failed to open {}: {}", path.display(), e))
        })?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| {
            row.get::<_, String>(0)
        })?;
        Self::initialize(&mut conn)?;
        set_file_permissions(path)?;

        tracing::debug!(path = %path.display(), "Opened note database");
        Ok(Self {
            path: Some(path.to_path_buf()),
            conn: Mutex::new(conn),
        })
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        Self::initialize(&mut conn)?;
        Ok(Self {
            path: None,
            conn: Mutex::new(conn),
        })
    }

    /// Path of the backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Run `f` against the raw connection.
    ///
    /// Intended for maintenance and tests; bypasses every invariant the
    /// engine maintains.
    pub fn with_connection<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let conn = self.lock_conn()?;
        f(&conn)
    }

    /// Lock the database connection, returning an error if the mutex is poisoned.
    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| VanishError::Storage("SQLite connection poisoned".to_string()))
    }

    fn initialize(conn: &mut Connection) -> Result<()> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        // Concurrent first opens of one file must agree on a single meta row.
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute_batch(SCHEMA)?;

        let created_at = format_timestamp(&Utc::now());
        tx.execute(
            "INSERT OR IGNORE INTO meta (key, value) VALUES (?, ?)",
            ["format_version", FORMAT_VERSION],
        )?;
        tx.execute(
            "INSERT OR IGNORE INTO meta (key, value) VALUES (?, ?)",
            ["created_at", created_at.as_str()],
        )?;

        let version: String = tx.query_row(
            "SELECT value FROM meta WHERE key = 'format_version'",
            [],
            |row| row.get(0),
        )?;
        if version != FORMAT_VERSION {
            return Err(VanishError::Storage(format!(
                "Unsupported database format version {} (expected {})",
                version, FORMAT_VERSION
            )));
        }
        tx.commit()?;
        Ok(())
    }

    fn select_note(conn: &Connection, id: NoteId) -> Result<Option<NoteRecord>> {
        let row = conn
            .query_row(
                &format!("SELECT {} FROM notes WHERE id = ?", NOTE_COLUMNS),
                [id],
                NoteRow::from_row,
            )
            .optional()?;
        row.map(NoteRecord::try_from).transpose()
    }
}

impl AuthStore for SqliteStore {
    fn load_auth(&self) -> Result<Option<AuthRecord>> {
        let conn = self.lock_conn()?;
        let row = conn
            .query_row(
                r#"
                SELECT verification_hash, salt, wrapped_master_key, kdf_json, created_at
                FROM auth
                WHERE id = 1
                "#,
                [],
                |row| {
                    Ok(AuthRow {
                        verification_hash: row.get(0)?,
                        salt: row.get(1)?,
                        wrapped_master_key: row.get(2)?,
                        kdf_json: row.get(3)?,
                        created_at: row.get(4)?,
                    })
                },
            )
            .optional()?;
        row.map(AuthRecord::try_from).transpose()
    }

    fn save_auth(&self, record: &AuthRecord) -> Result<()> {
        let kdf_json = serde_json::to_string(&record.kdf)
            .map_err(|e| VanishError::Storage(format!("Failed to serialize KDF params: {}", e)))?;
        let conn = self.lock_conn()?;
        conn.execute(
            r#"
            INSERT OR REPLACE INTO auth (
                id, verification_hash, salt, wrapped_master_key, kdf_json, created_at
            )
            VALUES (1, ?, ?, ?, ?, ?)
            "#,
            (
                &record.verification_hash,
                &record.salt,
                &record.wrapped_master_key,
                kdf_json,
                format_timestamp(&record.created_at),
            ),
        )?;
        Ok(())
    }

    fn has_auth(&self) -> Result<bool> {
        let conn = self.lock_conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM auth", [], |row| row.get(0))?;
        Ok(count > 0)
    }
}

impl NoteStore for SqliteStore {
    fn insert_note(&self, note: &NewNoteRow) -> Result<NoteId> {
        let conn = self.lock_conn()?;
        let created_at = format_timestamp(&note.created_at);
        conn.execute(
            r#"
            INSERT INTO notes (
                title,
                content,
                created_at,
                updated_at,
                open_count,
                max_opens,
                expires_at,
                is_reflection,
                blind_mode
            )
            VALUES (?, ?, ?, ?, 0, ?, ?, ?, ?)
            "#,
            (
                &note.encrypted_title,
                &note.encrypted_content,
                &created_at,
                &created_at,
                note.max_opens,
                note.expires_at.as_ref().map(format_timestamp),
                note.flags.is_reflection,
                note.flags.blind_mode,
            ),
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn get_note(&self, id: NoteId) -> Result<Option<NoteRecord>> {
        let conn = self.lock_conn()?;
        Self::select_note(&conn, id)
    }

    fn update_note(&self, id: NoteId, update: &NoteRowUpdate) -> Result<bool> {
        let conn = self.lock_conn()?;
        let changed = conn.execute(
            r#"
            UPDATE notes
            SET title = ?,
                content = ?,
                updated_at = ?,
                max_opens = ?,
                expires_at = ?,
                is_reflection = ?,
                blind_mode = ?
            WHERE id = ?
            "#,
            (
                &update.encrypted_title,
                &update.encrypted_content,
                format_timestamp(&update.updated_at),
                update.max_opens,
                update.expires_at.as_ref().map(format_timestamp),
                update.flags.is_reflection,
                update.flags.blind_mode,
                id,
            ),
        )?;
        Ok(changed > 0)
    }

    fn delete_note(&self, id: NoteId) -> Result<bool> {
        let conn = self.lock_conn()?;
        let changed = conn.execute("DELETE FROM notes WHERE id = ?", [id])?;
        Ok(changed > 0)
    }

    fn list_note_headers(&self) -> Result<Vec<NoteHeader>> {
        let conn = self.lock_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM notes ORDER BY created_at DESC, id DESC",
            HEADER_COLUMNS
        ))?;
        let rows = stmt.query_map([], HeaderRow::from_row)?;

        let mut headers = Vec::new();
        for row in rows {
            headers.push(row?.try_into()?);
        }
        Ok(headers)
    }

    fn open_note(
        &self,
        id: NoteId,
        now: DateTime<Utc>,
        decide: &mut dyn FnMut(&NoteRecord) -> OpenDecision,
    ) -> Result<OpenOutcome> {
        let mut conn = self.lock_conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let Some(mut record) = Self::select_note(&tx, id)? else {
            return Ok(OpenOutcome::Missing);
        };

        let outcome = match decide(&record) {
            OpenDecision::Destroy => {
                tx.execute("DELETE FROM notes WHERE id = ?", [id])?;
                OpenOutcome::Destroyed(record)
            }
            OpenDecision::Open => {
                let open_count = record.open_count.checked_add(1).ok_or_else(|| {
                    VanishError::Storage(format!("open_count overflow for note {}", id))
                })?;
                tx.execute(
                    "UPDATE notes SET open_count = ?, updated_at = ? WHERE id = ?",
                    (open_count, format_timestamp(&now), id),
                )?;
                record.open_count = open_count;
                record.updated_at = now;
                OpenOutcome::Opened(record)
            }
        };

        tx.commit()?;
        Ok(outcome)
    }

    fn purge_where(&self, matches: &mut dyn FnMut(&NoteLimits) -> bool) -> Result<usize> {
        let mut conn = self.lock_conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let mut doomed = Vec::new();
        {
            let mut stmt =
                tx.prepare("SELECT id, open_count, max_opens, expires_at FROM notes")?;
            let rows = stmt.query_map([], LimitsRow::from_row)?;
            for row in rows {
                let (id, limits) = row?.into_parts()?;
                if matches(&limits) {
                    doomed.push(id);
                }
            }
        }

        for id in &doomed {
            tx.execute("DELETE FROM notes WHERE id = ?", [id])?;
        }

        tx.commit()?;
        Ok(doomed.len())
    }
}

fn set_file_permissions(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = std::fs::metadata(path)?.permissions();
        perms.set_mode(0o600);
        std::fs::set_permissions(path, perms)?;
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::KdfParams;
    use crate::storage::types::NoteFlags;
    use chrono::Duration;

    fn new_row(title: &str) -> NewNoteRow {
        NewNoteRow {
            encrypted_title: title.to_string(),
            encrypted_content: format!("{}-content", title),
            created_at: Utc::now(),
            max_opens: None,
            expires_at: None,
            flags: NoteFlags::default(),
        }
    }

    fn auth_record(hash: &str) -> AuthRecord {
        AuthRecord {
            verification_hash: hash.to_string(),
            salt: "c2FsdA".to_string(),
            wrapped_master_key: "wrapped".to_string(),
            kdf: KdfParams::pbkdf2(1_000),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_auth_is_singleton() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(!store.has_auth().unwrap());
        assert!(store.load_auth().unwrap().is_none());

        store.save_auth(&auth_record("first")).unwrap();
        store.save_auth(&auth_record("second")).unwrap();

        let count: i64 = store
            .with_connection(|conn| {
                Ok(conn.query_row("SELECT COUNT(*) FROM auth", [], |row| row.get(0))?)
            })
            .unwrap();
        assert_eq!(count, 1);

        let loaded = store.load_auth().unwrap().unwrap();
        assert_eq!(loaded.verification_hash, "second");
        assert_eq!(loaded.kdf, KdfParams::pbkdf2(1_000));
        assert!(store.has_auth().unwrap());
    }

    #[test]
    fn test_insert_get_round_trip() {
        let store = SqliteStore::open_in_memory().unwrap();
        let expires = Utc::now() + Duration::hours(1);
        let mut row = new_row("a");
        row.max_opens = Some(2);
        row.expires_at = Some(expires);
        row.flags.blind_mode = true;

        let id = store.insert_note(&row).unwrap();
        let record = store.get_note(id).unwrap().unwrap();

        assert_eq!(record.encrypted_title, "a");
        assert_eq!(record.encrypted_content, "a-content");
        assert_eq!(record.open_count, 0);
        assert_eq!(record.max_opens, Some(2));
        assert_eq!(
            record.expires_at.map(|t| t.timestamp_micros()),
            Some(expires.timestamp_micros())
        );
        assert!(record.flags.blind_mode);
        assert!(!record.flags.is_reflection);
    }

    #[test]
    fn test_ids_are_unique_and_not_reused() {
        let store = SqliteStore::open_in_memory().unwrap();
        let first = store.insert_note(&new_row("a")).unwrap();
        assert!(store.delete_note(first).unwrap());
        let second = store.insert_note(&new_row("b")).unwrap();
        assert!(second > first);
    }

    #[test]
    fn test_update_missing_returns_false() {
        let store = SqliteStore::open_in_memory().unwrap();
        let update = NoteRowUpdate {
            encrypted_title: "t".to_string(),
            encrypted_content: "c".to_string(),
            updated_at: Utc::now(),
            max_opens: None,
            expires_at: None,
            flags: NoteFlags::default(),
        };
        assert!(!store.update_note(42, &update).unwrap());
    }

    #[test]
    fn test_delete_is_idempotent() {
        let store = SqliteStore::open_in_memory().unwrap();
        let id = store.insert_note(&new_row("a")).unwrap();
        assert!(store.delete_note(id).unwrap());
        assert!(!store.delete_note(id).unwrap());
    }

    #[test]
    fn test_list_headers_newest_first() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut old = new_row("old");
        old.created_at = Utc::now() - Duration::days(1);
        let old_id = store.insert_note(&old).unwrap();
        let new_id = store.insert_note(&new_row("new")).unwrap();

        let headers = store.list_note_headers().unwrap();
        let ids: Vec<NoteId> = headers.iter().map(|h| h.id).collect();
        assert_eq!(ids, vec![new_id, old_id]);
    }

    #[test]
    fn test_open_note_increments_or_destroys() {
        let store = SqliteStore::open_in_memory().unwrap();
        let id = store.insert_note(&new_row("a")).unwrap();
        let now = Utc::now();

        let outcome = store
            .open_note(id, now, &mut |_| OpenDecision::Open)
            .unwrap();
        match outcome {
            OpenOutcome::Opened(record) => {
                assert_eq!(record.open_count, 1);
                assert_eq!(record.updated_at, now);
            }
            other => panic!("expected Opened, got {:?}", other),
        }
        assert_eq!(store.get_note(id).unwrap().unwrap().open_count, 1);

        let outcome = store
            .open_note(id, now, &mut |_| OpenDecision::Destroy)
            .unwrap();
        assert!(matches!(outcome, OpenOutcome::Destroyed(_)));
        assert!(store.get_note(id).unwrap().is_none());

        let outcome = store
            .open_note(id, now, &mut |_| OpenDecision::Open)
            .unwrap();
        assert!(matches!(outcome, OpenOutcome::Missing));
    }

    #[test]
    fn test_purge_where_deletes_matching_rows() {
        let store = SqliteStore::open_in_memory().unwrap();
        let keep = store.insert_note(&new_row("keep")).unwrap();
        let mut limited = new_row("limited");
        limited.max_opens = Some(1);
        let gone = store.insert_note(&limited).unwrap();

        let removed = store
            .purge_where(&mut |limits| limits.max_opens.is_some())
            .unwrap();

        assert_eq!(removed, 1);
        assert!(store.get_note(keep).unwrap().is_some());
        assert!(store.get_note(gone).unwrap().is_none());
    }

    #[test]
    fn test_schema_rejects_zero_max_opens() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut row = new_row("a");
        row.max_opens = Some(0);
        assert!(store.insert_note(&row).is_err());
    }

    #[test]
    fn test_file_backed_reopen_keeps_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("notes.db");

        let id = {
            let store = SqliteStore::open(&path).unwrap();
            assert_eq!(store.path(), Some(path.as_path()));
            store.insert_note(&new_row("persisted")).unwrap()
        };

        let store = SqliteStore::open(&path).unwrap();
        let record = store.get_note(id).unwrap().unwrap();
        assert_eq!(record.encrypted_title, "persisted");
    }

    #[test]
    fn test_concurrent_first_open_of_new_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fresh.db");

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let path = path.clone();
                std::thread::spawn(move || SqliteStore::open(&path).map(|_| ()))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap().unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        let rows: i64 = store
            .with_connection(|conn| {
                Ok(conn.query_row(
                    "SELECT COUNT(*) FROM meta WHERE key = 'format_version'",
                    [],
                    |row| row.get(0),
                )?)
            })
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_database_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.db");
        let _store = SqliteStore::open(&path).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_unknown_format_version_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.db");
        {
            let store = SqliteStore::open(&path).unwrap();
            store
                .with_connection(|conn| {
                    conn.execute(
                        "UPDATE meta SET value = '99' WHERE key = 'format_version'",
                        [],
                    )?;
                    Ok(())
                })
                .unwrap();
        }

        let err = SqliteStore::open(&path).err().unwrap();
        assert!(err.to_string().contains("Unsupported database format version"));
    }
}
