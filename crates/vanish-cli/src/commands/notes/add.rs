use chrono::Utc;

use vanish_core::NoteDraft;

use crate::app::AppContext;
use crate::cli::AddArgs;
use crate::helpers::{read_content, resolve_expiry};

pub fn handle_add(ctx: &AppContext, args: &AddArgs) -> anyhow::Result<()> {
    let limits = &args.limits;
    let expires_at = resolve_expiry(limits.expires.as_deref(), limits.ttl.as_deref(), Utc::now())?;

    let (app, session) = ctx.unlock()?;
    let content = read_content(args.content.clone())?;

    let mut draft = NoteDraft::new(args.title.clone(), content)
        .reflection(limits.reflection.unwrap_or(false))
        .blind(limits.blind.unwrap_or(false));
    if let Some(max_opens) = limits.max_opens {
        draft = draft.with_max_opens(max_opens);
    }
    if let Some(at) = expires_at {
        draft = draft.with_expires_at(at);
    }

    let id = app.create_note(&session, draft)?;

    if ctx.quiet() {
        println!("{}", id);
    } else {
        println!("Added note {}", id);
    }
    Ok(())
}
