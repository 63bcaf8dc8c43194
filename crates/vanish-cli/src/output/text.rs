//! Human-readable output for notes.

use chrono::{DateTime, Utc};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};

use vanish_core::{NoteFlags, NoteSummary, OpenedNote};

use super::mode::OutputMode;

const TITLE_WIDTH: usize = 40;

pub fn format_datetime(value: &DateTime<Utc>) -> String {
    value.format("%Y-%m-%d %H:%M").to_string()
}

fn format_opens(open_count: u32, max_opens: Option<u32>) -> String {
    match max_opens {
        Some(max) => format!("{}/{}", open_count, max),
        None => open_count.to_string(),
    }
}

fn format_flags(flags: &NoteFlags) -> String {
    let mut parts = Vec::new();
    if flags.is_reflection {
        parts.push("reflection");
    }
    if flags.blind_mode {
        parts.push("blind");
    }
    parts.join(",")
}

/// Truncate to `max` characters, marking the cut.
pub fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_string();
    }
    let kept: String = value.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}

/// Print an opened note. In quiet mode only the content is printed.
pub fn print_opened_note(note: &OpenedNote, quiet: bool) {
    if !quiet {
        println!("ID: {}", note.id);
        println!("Title: {}", note.title);
        println!("Created: {}", format_datetime(&note.created_at));
        println!("Opens: {}", format_opens(note.open_count, note.max_opens));
        if let Some(expires_at) = note.expires_at {
            println!("Expires: {}", format_datetime(&expires_at));
        }
        let flags = format_flags(&note.flags);
        if !flags.is_empty() {
            println!("Flags: {}", flags);
        }
        println!();
    }
    println!("{}", note.content);
    if !quiet && note.remaining_opens() == Some(0) {
        eprintln!();
        eprintln!("This was the last read. The note will be destroyed on the next attempt.");
    }
}

/// Render summaries as a table (pretty) or space-separated rows (plain).
pub fn render_summaries(mode: OutputMode, summaries: &[NoteSummary]) -> String {
    let rows: Vec<Vec<String>> = summaries
        .iter()
        .map(|summary| {
            vec![
                summary.id.to_string(),
                truncate(summary.title.as_str(), TITLE_WIDTH),
                format_datetime(&summary.created_at),
                format_opens(summary.open_count, summary.max_opens),
                summary
                    .expires_at
                    .map(|at| format_datetime(&at))
                    .unwrap_or_else(|| "-".to_string()),
                format_flags(&summary.flags),
            ]
        })
        .collect();

    match mode {
        OutputMode::Pretty => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .apply_modifier(UTF8_ROUND_CORNERS)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["ID", "Title", "Created", "Opens", "Expires", "Flags"]);
            for row in rows {
                table.add_row(row);
            }
            table.to_string()
        }
        OutputMode::Plain | OutputMode::Json => rows
            .iter()
            .map(|row| row.join("\t"))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}
