//! Row-level data types for the storage layer.
//!
//! Everything here is ciphertext-at-rest: titles and contents are opaque
//! tokens produced by [`crate::crypto::cipher`].

use chrono::{DateTime, Datelike, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::crypto::KdfParams;

/// Store-assigned note identifier.
pub type NoteId = i64;

/// Front-end behaviour flags. Stored and returned, never interpreted here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteFlags {
    pub is_reflection: bool,
    pub blind_mode: bool,
}

/// The singleton authentication record.
#[derive(Debug, Clone)]
pub struct AuthRecord {
    /// Hex-encoded verification hash (KDF output under the "verify" label)
    pub verification_hash: String,

    /// Base64-encoded random salt
    pub salt: String,

    /// Master key wrapped under the KEK (cipher token)
    pub wrapped_master_key: String,

    /// KDF parameters used at setup
    pub kdf: KdfParams,

    /// When setup ran
    pub created_at: DateTime<Utc>,
}

/// The fields the destructive-read policy looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteLimits {
    pub open_count: u32,
    pub max_opens: Option<u32>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// A full note row.
#[derive(Debug, Clone)]
pub struct NoteRecord {
    pub id: NoteId,
    pub encrypted_title: String,
    pub encrypted_content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub open_count: u32,
    pub max_opens: Option<u32>,
    pub expires_at: Option<DateTime<Utc>>,
    pub flags: NoteFlags,
}

impl NoteRecord {
    pub fn limits(&self) -> NoteLimits {
        NoteLimits {
            open_count: self.open_count,
            max_opens: self.max_opens,
            expires_at: self.expires_at,
        }
    }
}

/// A note row without its content column, used for listings.
#[derive(Debug, Clone)]
pub struct NoteHeader {
    pub id: NoteId,
    pub encrypted_title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub open_count: u32,
    pub max_opens: Option<u32>,
    pub expires_at: Option<DateTime<Utc>>,
    pub flags: NoteFlags,
}

impl NoteHeader {
    pub fn limits(&self) -> NoteLimits {
        NoteLimits {
            open_count: self.open_count,
            max_opens: self.max_opens,
            expires_at: self.expires_at,
        }
    }
}

/// Values for inserting a note row.
#[derive(Debug, Clone)]
pub struct NewNoteRow {
    pub encrypted_title: String,
    pub encrypted_content: String,
    pub created_at: DateTime<Utc>,
    pub max_opens: Option<u32>,
    pub expires_at: Option<DateTime<Utc>>,
    pub flags: NoteFlags,
}

/// Values for overwriting a note row. `open_count` is never part of an update.
#[derive(Debug, Clone)]
pub struct NoteRowUpdate {
    pub encrypted_title: String,
    pub encrypted_content: String,
    pub updated_at: DateTime<Utc>,
    pub max_opens: Option<u32>,
    pub expires_at: Option<DateTime<Utc>>,
    pub flags: NoteFlags,
}

/// What the caller of [`super::NoteStore::open_note`] wants done with a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenDecision {
    /// Increment the open count and refresh `updated_at`
    Open,
    /// Delete the row
    Destroy,
}

/// Result of an atomic open.
#[derive(Debug, Clone)]
pub enum OpenOutcome {
    /// No row with that id
    Missing,
    /// The row was deleted; carries its last state
    Destroyed(NoteRecord),
    /// The row was opened; carries its post-increment state
    Opened(NoteRecord),
}

/// Canonical timestamp encoding for storage.
///
/// Fixed precision and a `Z` suffix keep stored values lexicographically
/// ordered.
pub fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Whether `value` fits the four-digit year form [`format_timestamp`] writes.
///
/// Years outside `1..=9999` gain a sign prefix that cannot be read back.
pub fn is_storable_timestamp(value: &DateTime<Utc>) -> bool {
    (1..=9999).contains(&value.year())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_timestamp_is_fixed_width() {
        let a = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let b = Utc.with_ymd_and_hms(2026, 11, 12, 13, 14, 15).unwrap();
        let fa = format_timestamp(&a);
        let fb = format_timestamp(&b);

        assert_eq!(fa, "2026-01-02T03:04:05.000000Z");
        assert_eq!(fa.len(), fb.len());
        assert!(fa < fb);
    }

    #[test]
    fn test_storable_timestamp_range() {
        let far = Utc::now() + chrono::Duration::days(4_000_000);
        let negative = Utc.with_ymd_and_hms(-5, 1, 1, 0, 0, 0).unwrap();
        let last = Utc.with_ymd_and_hms(9999, 12, 31, 23, 59, 59).unwrap();

        assert!(!is_storable_timestamp(&far));
        assert!(!is_storable_timestamp(&negative));
        assert!(is_storable_timestamp(&last));
        assert!(is_storable_timestamp(&Utc::now()));
    }

    #[test]
    fn test_limits_view() {
        let now = Utc::now();
        let header = NoteHeader {
            id: 1,
            encrypted_title: "t".to_string(),
            created_at: now,
            updated_at: now,
            open_count: 2,
            max_opens: Some(3),
            expires_at: None,
            flags: NoteFlags::default(),
        };
        let limits = header.limits();
        assert_eq!(limits.open_count, 2);
        assert_eq!(limits.max_opens, Some(3));
        assert_eq!(limits.expires_at, None);
    }
}
