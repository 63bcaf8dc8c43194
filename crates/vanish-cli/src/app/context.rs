//! Application context for the Vanish CLI.
//!
//! Bundles the parsed arguments with the resolved settings so handlers do
//! not thread paths and KDF parameters around.

use vanish_core::{Session, SqliteStore, Vanish};

use crate::cli::Cli;

use super::password::unlock_with_retry;
use super::resolver::{load_settings, Settings};

pub struct AppContext<'a> {
    cli: &'a Cli,
    settings: Settings,
}

impl<'a> AppContext<'a> {
    pub fn new(cli: &'a Cli) -> anyhow::Result<Self> {
        let settings = load_settings(cli)?;
        tracing::debug!(
            db = %settings.db_path.display(),
            kdf = settings.kdf.algorithm_name(),
            "Resolved settings"
        );
        Ok(Self { cli, settings })
    }

    /// Check if quiet mode is enabled.
    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Open the note database.
    pub fn open_app(&self) -> anyhow::Result<Vanish<SqliteStore>> {
        let store = SqliteStore::open(&self.settings.db_path)?;
        Ok(Vanish::new(store, self.settings.kdf))
    }

    /// Open the database and unlock it with the user's password.
    pub fn unlock(&self) -> anyhow::Result<(Vanish<SqliteStore>, Session)> {
        let app = self.open_app()?;
        let session = unlock_with_retry(&app)?;
        Ok((app, session))
    }
}
