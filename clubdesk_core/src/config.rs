//! Configuration file support for Clubdesk.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/clubdesk/config.toml`.

use crate::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub rotation: RotationConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Daily rotation configuration
///
/// `catalog_size` pins the cycle length independently of the built-in
/// catalog; left unset, the catalog's own length is used. Note that changing
/// the cycle length reshuffles which problem every future date maps to.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RotationConfig {
    #[serde(default = "default_epoch")]
    pub epoch: NaiveDate,

    #[serde(default)]
    pub catalog_size: Option<usize>,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            epoch: default_epoch(),
            catalog_size: None,
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        let home = std::env::var("HOME").expect("HOME environment variable not set");
        PathBuf::from(home).join(".local/share")
    });
    base.join("clubdesk")
}

fn default_epoch() -> NaiveDate {
    crate::rotation::DEFAULT_EPOCH
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Reject configurations the rotation cannot run on
    pub fn validate(&self) -> Result<()> {
        if self.rotation.catalog_size == Some(0) {
            return Err(Error::Config(
                "rotation.catalog_size must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// The rotation cycle length for a catalog of `catalog_len` problems
    pub fn rotation_total(&self, catalog_len: usize) -> usize {
        self.rotation.catalog_size.unwrap_or(catalog_len)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            let home = std::env::var("HOME").expect("HOME environment variable not set");
            PathBuf::from(home).join(".config")
        });
        base.join("clubdesk").join("config.toml")
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.rotation.epoch, crate::rotation::DEFAULT_EPOCH);
        assert_eq!(config.rotation.catalog_size, None);
        assert_eq!(config.rotation_total(12), 12);
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(config.rotation.epoch, parsed.rotation.epoch);
        assert_eq!(config.data.data_dir, parsed.data.data_dir);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[rotation]
epoch = "2026-09-01"
catalog_size = 50
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.rotation.epoch,
            NaiveDate::from_ymd_opt(2026, 9, 1).unwrap()
        );
        assert_eq!(config.rotation_total(12), 50); // pinned
        assert!(!config.data.data_dir.as_os_str().is_empty()); // default
    }

    #[test]
    fn test_save_to_then_load_from() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");

        let mut config = Config::default();
        config.rotation.epoch = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
        config.rotation.catalog_size = Some(40);
        config.data.data_dir = temp_dir.path().join("data");
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.rotation.epoch, config.rotation.epoch);
        assert_eq!(loaded.rotation.catalog_size, Some(40));
        assert_eq!(loaded.data.data_dir, config.data.data_dir);
    }

    #[test]
    fn test_zero_catalog_size_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[rotation]\ncatalog_size = 0\n").unwrap();

        let result = Config::load_from(&path);
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
