//! Main application configuration
//!
//! Defaults first, then an optional TOML file, then environment variable
//! overrides.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub service: ServiceSettings,
    #[serde(default)]
    pub store: StoreSettings,
}

/// Service-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceSettings {
    /// Service name for logging
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

/// Record store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Path of the JSON store file
    pub path: PathBuf,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "goban-ratings".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("ratings.json"),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| anyhow!("failed to read config {}: {e}", path.display()))?;
        let config: Self = toml::from_str(&contents)
            .map_err(|e| anyhow!("failed to parse config {}: {e}", path.display()))?;
        Ok(config)
    }

    /// Load configuration from environment variables with fallback to defaults.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env();
        Ok(config)
    }

    /// Apply environment variable overrides on top of the current values.
    pub fn apply_env(&mut self) {
        if let Ok(name) = env::var("GOBAN_SERVICE_NAME") {
            self.service.name = name;
        }
        if let Ok(level) = env::var("GOBAN_LOG_LEVEL") {
            self.service.log_level = level;
        }
        if let Ok(path) = env::var("GOBAN_STORE_PATH") {
            self.store.path = PathBuf::from(path);
        }
    }
}

/// Validate a loaded configuration.
pub fn validate_config(config: &AppConfig) -> Result<()> {
    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.service.log_level.as_str()) {
        return Err(anyhow!(
            "invalid log level '{}', expected one of {:?}",
            config.service.log_level,
            valid_levels
        ));
    }
    if config.service.name.is_empty() {
        return Err(anyhow!("service name must not be empty"));
    }
    if config.store.path.as_os_str().is_empty() {
        return Err(anyhow!("store path must not be empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
        assert_eq!(config.service.log_level, "info");
        assert_eq!(config.store.path, PathBuf::from("ratings.json"));
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let mut config = AppConfig::default();
        config.service.log_level = "loud".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_toml_parsing() {
        let parsed: AppConfig = toml::from_str(
            r#"
            [service]
            name = "club-ratings"
            log_level = "debug"

            [store]
            path = "/var/lib/goban/ratings.json"
            "#,
        )
        .unwrap();
        assert_eq!(parsed.service.name, "club-ratings");
        assert_eq!(
            parsed.store.path,
            PathBuf::from("/var/lib/goban/ratings.json")
        );
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed: AppConfig = toml::from_str(
            r#"
            [store]
            path = "club.json"
            "#,
        )
        .unwrap();
        assert_eq!(parsed.service.name, "goban-ratings");
        assert_eq!(parsed.store.path, PathBuf::from("club.json"));
    }
}
