//! Configuration management for the CLI
//!
//! This module handles loading and merging configuration from:
//! - Default values
//! - Configuration files (YAML/JSON/TOML)
//! - Environment variables
//!
//! Command-line arguments are applied on top by the handlers.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use typecast_core::{Dialect, EngineConfig};

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Dialect used when `--dialect` is not given
    pub default_dialect: Dialect,

    /// Table name used when `--table` is not given
    pub default_table: String,

    /// Abort a batch at the first failing value
    pub fail_fast: bool,

    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,

    /// Built-in registries to install
    pub engine: EngineConfig,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Use colored output by default
    pub color: bool,

    /// Show progress indicators
    pub progress: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level used when no verbosity flag is given
    pub level: Option<String>,

    /// Log format (compact, full, json)
    pub format: Option<String>,

    /// Log file path
    pub file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_dialect: Dialect::PostgreSql,
            default_table: "records".to_string(),
            fail_fast: false,
            output: OutputConfig::default(),
            logging: LoggingConfig::default(),
            engine: EngineConfig::default(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            color: true,
            progress: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Json,
    Yaml,
    Toml,
}

impl FileFormat {
    fn of(path: &Path) -> Self {
        match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => FileFormat::Yaml,
            Some("toml") => FileFormat::Toml,
            _ => FileFormat::Json,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;

        let config = match FileFormat::of(path) {
            FileFormat::Yaml => serde_yaml::from_str(&content)?,
            FileFormat::Toml => toml::from_str(&content).map_err(|e| Error::InvalidFormat {
                path: path.to_path_buf(),
                expected: "TOML".to_string(),
                reason: e.to_string(),
            })?,
            FileFormat::Json => serde_json::from_str(&content)?,
        };

        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_config_paths())
    }

    /// Load the first of `paths` that exists. A file that exists but cannot
    /// be read is an error naming the file; logging is not set up yet, so a
    /// skipped file would go unnoticed.
    pub fn load_from(paths: &[PathBuf]) -> Result<Self> {
        match paths.iter().find(|path| path.exists()) {
            Some(path) => {
                let config = Self::from_file(path)
                    .map_err(|e| Error::config(format!("failed to load {}: {}", path.display(), e)))?;
                tracing::debug!(path = %path.display(), "Loaded configuration");
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific file or default locations, then
    /// apply environment overrides
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        let mut config = if let Some(path) = file {
            Self::from_file(path)?
        } else {
            Self::load()?
        };
        config.merge_with_env();
        Ok(config)
    }

    /// Default configuration file paths, in search order
    pub fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("typecast.yaml"), PathBuf::from("typecast.json")];
        if let Some(user_path) = Self::user_config_path() {
            paths.push(user_path);
        }
        paths
    }

    /// `~/.config/typecast/config.yaml`
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config").join("typecast").join("config.yaml"))
    }

    /// Apply `TYPECAST_*` environment overrides
    pub fn merge_with_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dialect) = lookup("TYPECAST_DIALECT") {
            self.default_dialect = Dialect::from_tag(&dialect);
        }
        if let Some(table) = lookup("TYPECAST_TABLE") {
            self.default_table = table;
        }
        if let Some(format) = lookup("TYPECAST_LOG_FORMAT") {
            self.logging.format = Some(format);
        }
        if let Some(file) = lookup("TYPECAST_LOG_FILE") {
            self.logging.file = Some(PathBuf::from(file));
        }
    }

    /// Save configuration to a file, in the format its extension names
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = match FileFormat::of(path) {
            FileFormat::Yaml => serde_yaml::to_string(self)?,
            FileFormat::Toml => toml::to_string_pretty(self)
                .map_err(|e| Error::config(format!("Failed to serialize as TOML: {}", e)))?,
            FileFormat::Json => serde_json::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_yaml_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("typecast.yaml");
        std::fs::write(
            &path,
            "default_dialect: mysql\ndefault_table: users\nengine:\n  install_builtin_rules: false\n",
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.default_dialect, Dialect::MySql);
        assert_eq!(config.default_table, "users");
        assert!(!config.engine.install_builtin_rules);
        assert!(config.engine.install_builtin_converters);
        assert!(!config.fail_fast);
    }

    #[test]
    fn test_malformed_discovered_config_is_reported() {
        let dir = TempDir::new().unwrap();
        let broken = dir.path().join("typecast.yaml");
        std::fs::write(&broken, "default_dialect: [not, a, dialect
").unwrap();
        let fallback = dir.path().join("typecast.json");
        std::fs::write(&fallback, r#"{"default_table": "users"}"#).unwrap();

        let err = Config::load_from(&[broken.clone(), fallback]).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert_eq!(err.exit_code(), 5);
        assert!(err.to_string().contains(&broken.display().to_string()));
    }

    #[test]
    fn test_load_from_skips_missing_paths() {
        let dir = TempDir::new().unwrap();
        let present = dir.path().join("typecast.json");
        std::fs::write(&present, r#"{"default_table": "users"}"#).unwrap();

        let config = Config::load_from(&[dir.path().join("typecast.yaml"), present]).unwrap();
        assert_eq!(config.default_table, "users");

        let config = Config::load_from(&[dir.path().join("absent.yaml")]).unwrap();
        assert_eq!(config.default_table, Config::default().default_table);
    }

    #[test]
    fn test_toml_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config {
            default_dialect: Dialect::Sqlite,
            fail_fast: true,
            ..Config::default()
        };

        config.save(&path).unwrap();
        assert_eq!(Config::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file() {
        let err = Config::from_file(Path::new("/nonexistent/typecast.yaml")).unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }

    #[test]
    fn test_environment_overrides() {
        let env: HashMap<&str, &str> = [("TYPECAST_DIALECT", "mariadb"), ("TYPECAST_TABLE", "orders")]
            .into_iter()
            .collect();
        let mut config = Config::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.default_dialect, Dialect::MySql);
        assert_eq!(config.default_table, "orders");
        assert_eq!(config.logging.format, None);
    }

    #[test]
    fn test_unknown_dialect_in_file_is_generic() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("typecast.json");
        std::fs::write(&path, r#"{"default_dialect": "oracle"}"#).unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.default_dialect, Dialect::Generic);
    }
}
