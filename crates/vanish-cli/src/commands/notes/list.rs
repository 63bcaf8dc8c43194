use crate::app::AppContext;
use crate::cli::ListArgs;
use crate::errors::CliError;
use crate::helpers::parse_output_format;
use crate::output::json::summaries_json;
use crate::output::text::render_summaries;
use crate::output::OutputMode;

pub fn handle_list(ctx: &AppContext, args: &ListArgs) -> anyhow::Result<()> {
    let format = parse_output_format(args.format.as_deref())?;
    if args.json && format.is_some() {
        return Err(CliError::invalid_input("--format cannot be used with --json").into());
    }

    let (app, session) = ctx.unlock()?;
    let summaries = app.list_notes(&session)?;

    let mode = OutputMode::from_env(args.json, format);
    if mode.is_json() {
        println!("{}", serde_json::to_string_pretty(&summaries_json(&summaries)?)?);
        return Ok(());
    }

    if summaries.is_empty() {
        if !ctx.quiet() {
            println!("No notes.");
        }
        return Ok(());
    }

    println!("{}", render_summaries(mode, &summaries));
    if mode == OutputMode::Pretty && !ctx.quiet() {
        println!("{} notes", summaries.len());
    }
    Ok(())
}
