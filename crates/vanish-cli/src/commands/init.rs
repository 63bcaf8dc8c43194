use secrecy::ExposeSecret;

use vanish_core::crypto::validate_password;

use crate::app::{prompt_new_password, AppContext};
use crate::cli::InitArgs;
use crate::errors::CliError;

pub fn handle_init(ctx: &AppContext, args: &InitArgs) -> anyhow::Result<()> {
    let app = ctx.open_app()?;
    if app.is_initialized()? && !args.force {
        return Err(CliError::invalid_input(format!(
            "Vault already initialized at {}.\nHint: Pass --force to replace it; existing notes become unreadable.",
            ctx.settings().db_path.display()
        ))
        .into());
    }

    let password = prompt_new_password()?;
    validate_password(password.expose_secret())?;

    app.setup(password.expose_secret())?;

    if !ctx.quiet() {
        println!(
            "Initialized {} vault at {}",
            ctx.settings().app_name,
            ctx.settings().db_path.display()
        );
    }
    Ok(())
}
