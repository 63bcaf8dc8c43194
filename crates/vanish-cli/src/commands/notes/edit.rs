use chrono::Utc;

use vanish_core::{NoteDraft, VanishError};

use crate::app::AppContext;
use crate::cli::EditArgs;
use crate::errors::CliError;
use crate::helpers::{read_content, resolve_expiry};

/// Replace a note. Limits and flags not mentioned on the command line keep
/// their current values; the open count is never reset.
pub fn handle_edit(ctx: &AppContext, args: &EditArgs) -> anyhow::Result<()> {
    let limits = &args.limits;
    let new_expiry = resolve_expiry(limits.expires.as_deref(), limits.ttl.as_deref(), Utc::now())?;

    let (app, session) = ctx.unlock()?;
    // Listing does not count as a read, so the current values come from it.
    let current = app
        .list_notes(&session)?
        .into_iter()
        .find(|summary| summary.id == args.id)
        .ok_or(VanishError::NotFound(args.id))?;

    let title = match (&args.title, current.title.text()) {
        (Some(title), _) => title.clone(),
        (None, Some(title)) => title.to_string(),
        (None, None) => {
            return Err(CliError::invalid_input(
                "The current title cannot be decrypted.\nHint: Pass --title to replace it.",
            )
            .into())
        }
    };
    let content = read_content(args.content.clone())?;

    let max_opens = if args.no_max_opens {
        None
    } else {
        limits.max_opens.or(current.max_opens)
    };
    let expires_at = if args.no_expiry {
        None
    } else {
        new_expiry.or(current.expires_at)
    };

    let mut draft = NoteDraft::new(title, content)
        .reflection(limits.reflection.unwrap_or(current.flags.is_reflection))
        .blind(limits.blind.unwrap_or(current.flags.blind_mode));
    draft.max_opens = max_opens;
    draft.expires_at = expires_at;

    app.update_note(&session, args.id, draft)?;

    if !ctx.quiet() {
        println!("Updated note {}", args.id);
    }
    Ok(())
}
