//! Configuration file support for kcal.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/kcal/config.toml`.

use crate::{Error, Result, DEFAULT_CALORIE_LIMIT};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name of the tracker document inside the data directory
pub const STORE_FILE_NAME: &str = "tracker.json";

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub tracker: TrackerConfig,
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

/// Tracker defaults
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Limit used until the user sets one explicitly
    #[serde(default = "default_calorie_limit")]
    pub default_calorie_limit: u32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            default_calorie_limit: default_calorie_limit(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        std::env::var_os("HOME")
            .map(|home| PathBuf::from(home).join(".local/share"))
            .unwrap_or_else(|| PathBuf::from("."))
    });
    base.join("kcal")
}

fn default_calorie_limit() -> u32 {
    DEFAULT_CALORIE_LIMIT
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            std::env::var_os("HOME")
                .map(|home| PathBuf::from(home).join(".config"))
                .unwrap_or_else(|| PathBuf::from("."))
        });
        base.join("kcal").join("config.toml")
    }

    /// Path of the tracker document under a data directory
    pub fn store_path(data_dir: &Path) -> PathBuf {
        data_dir.join(STORE_FILE_NAME)
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
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
        assert_eq!(config.tracker.default_calorie_limit, 2000);
        assert!(config.data.data_dir.ends_with("kcal"));
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[tracker]
default_calorie_limit = 1800
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.tracker.default_calorie_limit, 1800);
        assert!(config.data.data_dir.ends_with("kcal")); // default
    }

    #[test]
    fn test_save_and_load_from_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.data.data_dir = temp_dir.path().join("data");
        config.tracker.default_calorie_limit = 2500;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.tracker.default_calorie_limit, 2500);
        assert_eq!(loaded.data.data_dir, temp_dir.path().join("data"));
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[tracker]\ndefault_calorie_limit = \"lots\"\n").unwrap();

        assert!(matches!(Config::load_from(&path), Err(Error::Toml(_))));
    }

    #[test]
    fn test_store_path() {
        let path = Config::store_path(Path::new("/tmp/kcal"));
        assert_eq!(path, PathBuf::from("/tmp/kcal/tracker.json"));
    }
}
