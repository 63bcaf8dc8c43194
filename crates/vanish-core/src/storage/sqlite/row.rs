//! Raw row types for database queries.

use chrono::{DateTime, Utc};

use crate::crypto::KdfParams;
use crate::error::{Result, VanishError};
use crate::storage::types::{AuthRecord, NoteFlags, NoteHeader, NoteId, NoteLimits, NoteRecord};

pub(super) const NOTE_COLUMNS: &str = "id, title, content, created_at, updated_at, open_count, \
     max_opens, expires_at, is_reflection, blind_mode";

pub(super) const HEADER_COLUMNS: &str = "id, title, created_at, updated_at, open_count, \
     max_opens, expires_at, is_reflection, blind_mode";

/// Raw row data from the notes table, before parsing into domain types.
#[derive(Debug)]
pub struct NoteRow {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created_at: String,
    pub updated_at: String,
    pub open_count: i64,
    pub max_opens: Option<i64>,
    pub expires_at: Option<String>,
    pub is_reflection: bool,
    pub blind_mode: bool,
}

impl NoteRow {
    /// Map a row selected with [`NOTE_COLUMNS`].
    pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            content: row.get(2)?,
            created_at: row.get(3)?,
            updated_at: row.get(4)?,
            open_count: row.get(5)?,
            max_opens: row.get(6)?,
            expires_at: row.get(7)?,
            is_reflection: row.get(8)?,
            blind_mode: row.get(9)?,
        })
    }
}

/// Raw row data for a listing, without the content column.
#[derive(Debug)]
pub struct HeaderRow {
    pub id: i64,
    pub title: String,
    pub created_at: String,
    pub updated_at: String,
    pub open_count: i64,
    pub max_opens: Option<i64>,
    pub expires_at: Option<String>,
    pub is_reflection: bool,
    pub blind_mode: bool,
}

impl HeaderRow {
    /// Map a row selected with [`HEADER_COLUMNS`].
    pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            created_at: row.get(2)?,
            updated_at: row.get(3)?,
            open_count: row.get(4)?,
            max_opens: row.get(5)?,
            expires_at: row.get(6)?,
            is_reflection: row.get(7)?,
            blind_mode: row.get(8)?,
        })
    }
}

/// Raw row data for the policy scan in `purge_where`.
#[derive(Debug)]
pub struct LimitsRow {
    pub id: i64,
    pub open_count: i64,
    pub max_opens: Option<i64>,
    pub expires_at: Option<String>,
}

impl LimitsRow {
    pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            open_count: row.get(1)?,
            max_opens: row.get(2)?,
            expires_at: row.get(3)?,
        })
    }

    pub fn into_parts(self) -> Result<(NoteId, NoteLimits)> {
        Ok((
            self.id,
            NoteLimits {
                open_count: parse_count(self.open_count, "open_count")?,
                max_opens: parse_optional_count(self.max_opens)?,
                expires_at: parse_optional_timestamp(self.expires_at.as_deref())?,
            },
        ))
    }
}

/// Raw row data from the auth table.
#[derive(Debug)]
pub struct AuthRow {
    pub verification_hash: String,
    pub salt: String,
    pub wrapped_master_key: String,
    pub kdf_json: String,
    pub created_at: String,
}

impl TryFrom<AuthRow> for AuthRecord {
    type Error = VanishError;

    fn try_from(row: AuthRow) -> Result<Self> {
        let kdf: KdfParams = serde_json::from_str(&row.kdf_json)
            .map_err(|e| VanishError::Storage(format!("Invalid KDF parameters: {}", e)))?;
        Ok(AuthRecord {
            verification_hash: row.verification_hash,
            salt: row.salt,
            wrapped_master_key: row.wrapped_master_key,
            kdf,
            created_at: parse_timestamp(&row.created_at)?,
        })
    }
}

impl TryFrom<NoteRow> for NoteRecord {
    type Error = VanishError;

    fn try_from(row: NoteRow) -> Result<Self> {
        Ok(NoteRecord {
            id: row.id,
            encrypted_title: row.title,
            encrypted_content: row.content,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
            open_count: parse_count(row.open_count, "open_count")?,
            max_opens: parse_optional_count(row.max_opens)?,
            expires_at: parse_optional_timestamp(row.expires_at.as_deref())?,
            flags: NoteFlags {
                is_reflection: row.is_reflection,
                blind_mode: row.blind_mode,
            },
        })
    }
}

impl TryFrom<HeaderRow> for NoteHeader {
    type Error = VanishError;

    fn try_from(row: HeaderRow) -> Result<Self> {
        Ok(NoteHeader {
            id: row.id,
            encrypted_title: row.title,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
            open_count: parse_count(row.open_count, "open_count")?,
            max_opens: parse_optional_count(row.max_opens)?,
            expires_at: parse_optional_timestamp(row.expires_at.as_deref())?,
            flags: NoteFlags {
                is_reflection: row.is_reflection,
                blind_mode: row.blind_mode,
            },
        })
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|e| VanishError::Storage(format!("Invalid timestamp {:?}: {}", value, e)))
}

fn parse_optional_timestamp(value: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    value.map(parse_timestamp).transpose()
}

fn parse_count(value: i64, column: &str) -> Result<u32> {
    u32::try_from(value)
        .map_err(|_| VanishError::Storage(format!("Invalid {} value: {}", column, value)))
}

fn parse_optional_count(value: Option<i64>) -> Result<Option<u32>> {
    value.map(|v| parse_count(v, "max_opens")).transpose()
}
