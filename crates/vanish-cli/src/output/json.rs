//! JSON output formatting for notes.

use vanish_core::{NoteId, NoteSummary, OpenedNote};

/// Convert an opened note to JSON for output.
pub fn opened_note_json(note: &OpenedNote) -> anyhow::Result<serde_json::Value> {
    let mut value = serde_json::to_value(note)?;
    if let Some(object) = value.as_object_mut() {
        object.insert("status".to_string(), "opened".into());
        object.insert("remaining_opens".to_string(), note.remaining_opens().into());
    }
    Ok(value)
}

/// JSON for a read that destroyed the note.
pub fn deleted_note_json(id: NoteId) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "status": "deleted",
    })
}

/// Convert multiple summaries to a JSON array for output.
pub fn summaries_json(summaries: &[NoteSummary]) -> anyhow::Result<serde_json::Value> {
    Ok(serde_json::to_value(summaries)?)
}
