use clap::CommandFactory;
use clap_complete::generate;

use crate::app::AppContext;
use crate::cli::{Cli, CompletionsArgs};

pub fn handle_completions(args: &CompletionsArgs) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    generate(args.shell, &mut cmd, "vanish", &mut std::io::stdout());
    Ok(())
}

pub fn handle_purge(ctx: &AppContext) -> anyhow::Result<()> {
    let removed = ctx.open_app()?.purge_exhausted()?;
    if !ctx.quiet() {
        match removed {
            0 => println!("No exhausted notes."),
            1 => println!("Purged 1 note."),
            n => println!("Purged {} notes.", n),
        }
    }
    Ok(())
}
