use vanish_core::VERSION;

use crate::app::AppContext;
use crate::cli::StatusArgs;

pub fn handle_status(ctx: &AppContext, args: &StatusArgs) -> anyhow::Result<()> {
    let settings = ctx.settings();
    // Status never creates the database.
    let initialized = settings.db_path.exists() && ctx.open_app()?.is_initialized()?;
    let config = settings
        .config_path
        .as_ref()
        .map(|path| path.display().to_string());

    if args.json {
        let output = serde_json::json!({
            "app_name": settings.app_name,
            "version": VERSION,
            "database": settings.db_path.display().to_string(),
            "config": config,
            "initialized": initialized,
            "kdf": settings.kdf,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{} v{}", settings.app_name, VERSION);
    println!("Database: {}", settings.db_path.display());
    println!("Config: {}", config.as_deref().unwrap_or("(none)"));
    println!(
        "Initialized: {}",
        if initialized { "yes" } else { "no" }
    );
    if !initialized && !ctx.quiet() {
        println!();
        println!("Hint: Run `vanish init` to set a password.");
    }
    Ok(())
}
