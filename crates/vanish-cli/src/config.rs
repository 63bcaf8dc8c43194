use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use vanish_core::KdfParams;

/// Display name used when none is configured.
pub const DEFAULT_APP_NAME: &str = "Vanish";

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct VanishConfig {
    #[serde(default)]
    pub app: AppSection,
    #[serde(default)]
    pub store: StoreSection,
    #[serde(default)]
    pub kdf: KdfSection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AppSection {
    pub name: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StoreSection {
    pub path: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct KdfSection {
    #[serde(default)]
    pub algorithm: KdfAlgorithm,
    pub iterations: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum KdfAlgorithm {
    #[default]
    Pbkdf2Sha256,
    Argon2id,
}

impl KdfSection {
    /// KDF parameters for new vaults.
    pub fn params(&self) -> anyhow::Result<KdfParams> {
        match self.algorithm {
            KdfAlgorithm::Pbkdf2Sha256 => {
                let iterations = self
                    .iterations
                    .unwrap_or(vanish_core::crypto::kdf::DEFAULT_PBKDF2_ITERATIONS);
                if iterations == 0 {
                    return Err(anyhow::anyhow!("kdf.iterations must be positive"));
                }
                Ok(KdfParams::pbkdf2(iterations))
            }
            KdfAlgorithm::Argon2id => {
                if self.iterations.is_some() {
                    return Err(anyhow::anyhow!(
                        "kdf.iterations only applies to pbkdf2_sha256"
                    ));
                }
                Ok(KdfParams::argon2id())
            }
        }
    }
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn default_db_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_data_dir()?.join("vanish.db"))
}

pub fn read_config(path: &Path) -> anyhow::Result<VanishConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("vanish"));
        }
    }
    Ok(home_dir()?.join(".config").join("vanish"))
}

pub fn xdg_data_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_DATA_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("vanish"));
        }
    }
    Ok(home_dir()?.join(".local").join("share").join("vanish"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: VanishConfig = toml::from_str("").unwrap();
        assert!(config.app.name.is_none());
        assert!(config.store.path.is_none());
        assert_eq!(config.kdf.algorithm, KdfAlgorithm::Pbkdf2Sha256);
        assert_eq!(config.kdf.params().unwrap(), KdfParams::default());
    }

    #[test]
    fn test_full_config_parses() {
        let config: VanishConfig = toml::from_str(
            r#"
            [app]
            name = "Secure Notes"

            [store]
            path = "/tmp/notes.db"

            [kdf]
            algorithm = "pbkdf2_sha256"
            iterations = 300000
            "#,
        )
        .unwrap();
        assert_eq!(config.app.name.as_deref(), Some("Secure Notes"));
        assert_eq!(config.store.path.as_deref(), Some("/tmp/notes.db"));
        assert_eq!(config.kdf.params().unwrap(), KdfParams::pbkdf2(300_000));
    }

    #[test]
    fn test_argon2_config() {
        let config: VanishConfig = toml::from_str("[kdf]\nalgorithm = \"argon2id\"\n").unwrap();
        assert_eq!(config.kdf.params().unwrap(), KdfParams::argon2id());
    }

    #[test]
    fn test_invalid_kdf_settings_rejected() {
        let zero: VanishConfig = toml::from_str("[kdf]\niterations = 0\n").unwrap();
        assert!(zero.kdf.params().is_err());

        let mixed: VanishConfig =
            toml::from_str("[kdf]\nalgorithm = \"argon2id\"\niterations = 5\n").unwrap();
        assert!(mixed.kdf.params().is_err());

        assert!(toml::from_str::<VanishConfig>("[kdf]\nalgorithm = \"md5\"\n").is_err());
    }
}
