//! Plaintext note types exchanged with front-ends.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::storage::{NoteFlags, NoteId};

/// Rendering used for a field that failed to decrypt.
pub const DECRYPTION_FAILED_SENTINEL: &str = "<Decryption Error>";

/// A decrypted text field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldText {
    Text(String),
    /// Authentication failed; the stored token is corrupt or foreign
    Unreadable,
}

impl FieldText {
    /// The plaintext, or the sentinel for an unreadable field.
    pub fn as_str(&self) -> &str {
        match self {
            FieldText::Text(text) => text,
            FieldText::Unreadable => DECRYPTION_FAILED_SENTINEL,
        }
    }

    pub fn is_readable(&self) -> bool {
        matches!(self, FieldText::Text(_))
    }

    /// The plaintext, if it decrypted.
    pub fn text(&self) -> Option<&str> {
        match self {
            FieldText::Text(text) => Some(text),
            FieldText::Unreadable => None,
        }
    }
}

impl fmt::Display for FieldText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FieldText {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Input for creating or updating a note.
#[derive(Debug, Clone)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub max_opens: Option<u32>,
    pub flags: NoteFlags,
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            expires_at: None,
            max_opens: None,
            flags: NoteFlags::default(),
        }
    }

    pub fn with_expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    pub fn with_max_opens(mut self, max_opens: u32) -> Self {
        self.max_opens = Some(max_opens);
        self
    }

    pub fn reflection(mut self, enabled: bool) -> Self {
        self.flags.is_reflection = enabled;
        self
    }

    pub fn blind(mut self, enabled: bool) -> Self {
        self.flags.blind_mode = enabled;
        self
    }
}

/// A note that was successfully opened.
#[derive(Debug, Clone, Serialize)]
pub struct OpenedNote {
    pub id: NoteId,
    pub title: FieldText,
    pub content: FieldText,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Count including this read
    pub open_count: u32,
    pub max_opens: Option<u32>,
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub flags: NoteFlags,
}

impl OpenedNote {
    /// Reads left before the note is destroyed, if it has an open limit.
    pub fn remaining_opens(&self) -> Option<u32> {
        self.max_opens
            .map(|max| max.saturating_sub(self.open_count))
    }
}

/// Result of a read request.
#[derive(Debug, Clone)]
pub enum ReadOutcome {
    Opened(OpenedNote),
    /// The note hit its limit and has been removed; nothing is shown
    Deleted,
}

impl ReadOutcome {
    pub fn is_deleted(&self) -> bool {
        matches!(self, ReadOutcome::Deleted)
    }

    pub fn opened(self) -> Option<OpenedNote> {
        match self {
            ReadOutcome::Opened(note) => Some(note),
            ReadOutcome::Deleted => None,
        }
    }
}

/// A listing row: metadata plus decrypted title, no content.
#[derive(Debug, Clone, Serialize)]
pub struct NoteSummary {
    pub id: NoteId,
    pub title: FieldText,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub open_count: u32,
    pub max_opens: Option<u32>,
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub flags: NoteFlags,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_text_sentinel() {
        assert_eq!(FieldText::Unreadable.as_str(), "<Decryption Error>");
        assert_eq!(FieldText::Unreadable.to_string(), DECRYPTION_FAILED_SENTINEL);
        assert_eq!(FieldText::Text("hi".to_string()).as_str(), "hi");
        assert!(!FieldText::Unreadable.is_readable());
        assert_eq!(FieldText::Unreadable.text(), None);
    }

    #[test]
    fn test_draft_builder() {
        let expires = Utc::now();
        let draft = NoteDraft::new("T", "C")
            .with_expires_at(expires)
            .with_max_opens(2)
            .reflection(true)
            .blind(true);

        assert_eq!(draft.title, "T");
        assert_eq!(draft.content, "C");
        assert_eq!(draft.expires_at, Some(expires));
        assert_eq!(draft.max_opens, Some(2));
        assert!(draft.flags.is_reflection);
        assert!(draft.flags.blind_mode);
    }

    #[test]
    fn test_opened_note_serializes_flat() {
        let now = Utc::now();
        let note = OpenedNote {
            id: 3,
            title: FieldText::Text("T".to_string()),
            content: FieldText::Unreadable,
            created_at: now,
            updated_at: now,
            open_count: 1,
            max_opens: Some(2),
            expires_at: None,
            flags: NoteFlags {
                is_reflection: false,
                blind_mode: true,
            },
        };
        assert_eq!(note.remaining_opens(), Some(1));

        let value = serde_json::to_value(&note).unwrap();
        assert_eq!(value["title"], "T");
        assert_eq!(value["content"], DECRYPTION_FAILED_SENTINEL);
        assert_eq!(value["blind_mode"], true);
        assert_eq!(value["max_opens"], 2);
    }
}
