//! Vanish CLI - encrypted notes that destroy themselves
//!
//! This is the command-line front-end for Vanish. It only moves plaintext in
//! and out; all cryptography and lifecycle rules live in `vanish-core`.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod helpers;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use vanish_core::VERSION;

use crate::app::AppContext;
use crate::cli::{Cli, Commands};
use crate::constants::LOG_ENV;

fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(err) = run(&cli) {
        std::process::exit(errors::report(&err));
    }
}

/// Logs go to stderr so they never mix with note output.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let Some(command) = &cli.command else {
        println!("Vanish v{}", VERSION);
        println!("\nRun `vanish --help` for usage information.");
        return Ok(());
    };

    if let Commands::Completions(args) = command {
        return commands::handle_completions(args);
    }

    let ctx = AppContext::new(cli)?;
    match command {
        Commands::Init(args) => commands::handle_init(&ctx, args),
        Commands::Status(args) => commands::handle_status(&ctx, args),
        Commands::Add(args) => commands::handle_add(&ctx, args),
        Commands::Read(args) => commands::handle_read(&ctx, args),
        Commands::Edit(args) => commands::handle_edit(&ctx, args),
        Commands::Rm(args) => commands::handle_rm(&ctx, args),
        Commands::List(args) => commands::handle_list(&ctx, args),
        Commands::Purge => commands::handle_purge(&ctx),
        Commands::Completions(args) => commands::handle_completions(args),
    }
}
