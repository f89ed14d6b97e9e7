//! Configuration management for runlog.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::run::{Run, DEFAULT_UNITS};
use crate::storage::DEFAULT_SLOT_KEY;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "runlog";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "runlog.db";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `RUNLOG_`)
/// 2. TOML config file at `~/.config/runlog/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Entry form configuration.
    pub form: FormConfig,
    /// Interactive shell configuration.
    pub shell: ShellConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/runlog/runlog.db`
    pub database_path: Option<PathBuf>,
    /// Name of the slot holding the run collection.
    pub slot_key: String,
}

/// Entry form configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// Unit preselected on a cleared form.
    pub default_units: String,
    /// Options offered by the unit selector. A saved run must use one.
    pub units: Vec<String>,
}

/// Interactive shell configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Ask before deleting a run.
    pub confirm_delete: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: None, // Will be resolved to default at runtime
            slot_key: DEFAULT_SLOT_KEY.to_string(),
        }
    }
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            default_units: DEFAULT_UNITS.to_string(),
            units: vec!["Km".to_string(), "Mi".to_string()],
        }
    }
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            confirm_delete: true,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("RUNLOG_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.storage.slot_key.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "slot_key must not be empty".to_string(),
            });
        }

        if self.form.units.is_empty() {
            return Err(Error::ConfigValidation {
                message: "units must list at least one option".to_string(),
            });
        }

        if !self.form.units.contains(&self.form.default_units) {
            return Err(Error::ConfigValidation {
                message: format!(
                    "default_units ({}) is not one of the unit options ({})",
                    self.form.default_units,
                    self.form.units.join(", ")
                ),
            });
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// The run a cleared form shows.
    #[must_use]
    pub fn default_run(&self) -> Run {
        Run::blank(self.form.default_units.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.storage.database_path.is_none());
        assert_eq!(config.storage.slot_key, "run_db");
        assert_eq!(config.form.default_units, "Km");
        assert_eq!(config.form.units, vec!["Km", "Mi"]);
        assert!(config.shell.confirm_delete);
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_empty_slot_key() {
        let mut config = Config::default();
        config.storage.slot_key = "  ".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("slot_key"));
    }

    #[test]
    fn test_validate_no_units() {
        let mut config = Config::default();
        config.form.units.clear();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("at least one"));
    }

    #[test]
    fn test_validate_default_units_not_offered() {
        let mut config = Config::default();
        config.form.default_units = "Leagues".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("Leagues"));
    }

    #[test]
    fn test_database_path_default() {
        let path = Config::default().database_path();
        assert!(path.to_string_lossy().contains("runlog.db"));
    }

    #[test]
    fn test_database_path_custom() {
        let mut config = Config::default();
        config.storage.database_path = Some(PathBuf::from("/custom/path/runs.db"));

        assert_eq!(config.database_path(), PathBuf::from("/custom/path/runs.db"));
    }

    #[test]
    fn test_default_run_uses_default_units() {
        let mut config = Config::default();
        config.form.default_units = "Mi".to_string();

        let run = config.default_run();
        assert!(run.is_new());
        assert_eq!(run.units, "Mi");
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("runlog"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        let config = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml"))).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_toml_file() {
        let path =
            std::env::temp_dir().join(format!("runlog_config_test_{}.toml", std::process::id()));
        std::fs::write(
            &path,
            "[storage]\nslot_key = \"runs\"\n\n[form]\ndefault_units = \"Mi\"\n",
        )
        .unwrap();

        let config = Config::load_from(Some(path.clone())).unwrap();
        assert_eq!(config.storage.slot_key, "runs");
        assert_eq!(config.form.default_units, "Mi");
        assert!(config.shell.confirm_delete);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_invalid_toml_values_rejected() {
        let path = std::env::temp_dir().join(format!(
            "runlog_config_invalid_test_{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "[form]\ndefault_units = \"Parsecs\"\n").unwrap();

        let result = Config::load_from(Some(path.clone()));
        assert!(result.is_err());

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_config_serialize() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        assert!(json.contains("slot_key"));
        assert!(json.contains("default_units"));
        assert!(json.contains("confirm_delete"));
    }

    #[test]
    fn test_storage_config_deserialize() {
        let json = r#"{"slot_key": "other"}"#;
        let storage: StorageConfig = serde_json::from_str(json).unwrap();
        assert_eq!(storage.slot_key, "other");
        assert!(storage.database_path.is_none());
    }
}
