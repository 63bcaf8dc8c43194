use crate::app::AppContext;
use crate::cli::RmArgs;

pub fn handle_rm(ctx: &AppContext, args: &RmArgs) -> anyhow::Result<()> {
    let (app, _session) = ctx.unlock()?;
    app.delete_note(args.id)?;

    if !ctx.quiet() {
        println!("Deleted note {}", args.id);
    }
    Ok(())
}
