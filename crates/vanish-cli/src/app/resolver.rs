//! Path and setting resolution.

use std::path::PathBuf;

use vanish_core::KdfParams;

use crate::cli::Cli;
use crate::config::{default_config_path, default_db_path, read_config, VanishConfig, DEFAULT_APP_NAME};

/// Settings after applying flags, environment and the config file.
#[derive(Debug)]
pub struct Settings {
    pub app_name: String,
    pub db_path: PathBuf,
    pub kdf: KdfParams,
    /// Config file that was read, if one existed
    pub config_path: Option<PathBuf>,
}

pub fn resolve_config_path() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("VANISH_CONFIG") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value));
        }
    }
    default_config_path()
}

/// Resolve settings. Precedence: flag/env, then config file, then defaults.
///
/// A missing config file is fine; an unreadable one is an error.
pub fn load_settings(cli: &Cli) -> anyhow::Result<Settings> {
    let config_path = resolve_config_path()?;
    let (config, config_path) = if config_path.exists() {
        (read_config(&config_path)?, Some(config_path))
    } else {
        (VanishConfig::default(), None)
    };

    let db_path = match cli.db.as_deref().filter(|p| !p.trim().is_empty()) {
        Some(path) => PathBuf::from(path),
        None => match config.store.path.as_deref() {
            Some(path) => PathBuf::from(path),
            None => default_db_path()?,
        },
    };

    let app_name = env_override("VANISH_APP_NAME")
        .or(config.app.name.clone())
        .unwrap_or_else(|| DEFAULT_APP_NAME.to_string());

    Ok(Settings {
        app_name,
        db_path,
        kdf: config.kdf.params()?,
        config_path,
    })
}

fn env_override(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}
