use vanish_core::ReadOutcome;

use crate::app::AppContext;
use crate::cli::ReadArgs;
use crate::output::json::{deleted_note_json, opened_note_json};
use crate::output::text::print_opened_note;

pub fn handle_read(ctx: &AppContext, args: &ReadArgs) -> anyhow::Result<()> {
    let (app, session) = ctx.unlock()?;

    match app.read_note(&session, args.id)? {
        ReadOutcome::Opened(note) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&opened_note_json(&note)?)?);
            } else {
                print_opened_note(&note, ctx.quiet());
            }
        }
        ReadOutcome::Deleted => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&deleted_note_json(args.id))?);
            } else if !ctx.quiet() {
                println!("Note {} reached its limit and has been destroyed.", args.id);
            }
        }
    }
    Ok(())
}
