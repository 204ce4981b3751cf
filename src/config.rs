//! Configuration management module.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration load result.
#[derive(Debug)]
pub enum ConfigLoadResult {
    /// Config loaded successfully.
    Loaded(AppConfig),
    /// Config file missing (defaults apply).
    Missing,
    /// Config file exists but invalid.
    Invalid(ConfigError),
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Main application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// Upstream salon REST API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    /// Per-request timeout in seconds (default: 10).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Health-check timeout in seconds (default: 5).
    #[serde(default = "default_health_timeout_secs")]
    pub health_timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_health_timeout_secs() -> u64 {
    5
}

/// Time-to-live, in seconds, for each cached endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub customers_ttl_secs: u64,
    pub bookings_ttl_secs: u64,
    pub upcoming_ttl_secs: u64,
    pub stats_ttl_secs: u64,
    pub services_ttl_secs: u64,
    pub health_ttl_secs: u64,
}

/// Login settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Local gate password checked before any network call.
    pub gate_password: String,
    /// Name of the environment variable holding the upstream API credential.
    pub credential_env: String,
}

/// UI preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    pub page_title: String,
    /// Default dashboard period filter, in days (7, 30, or 90).
    pub default_period_days: u32,
    /// Default upcoming-bookings window, in hours (1-168).
    pub upcoming_hours: u32,
}

impl AppConfig {
    /// Get config file path (same directory as executable).
    pub fn default_path() -> PathBuf {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("config.toml")
    }

    /// Attempt to load config with detailed result.
    pub fn try_load(path: &Path) -> ConfigLoadResult {
        if !path.exists() {
            return ConfigLoadResult::Missing;
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<AppConfig>(&content) {
                Ok(config) => match config.validate() {
                    Ok(()) => ConfigLoadResult::Loaded(config),
                    Err(e) => ConfigLoadResult::Invalid(e),
                },
                Err(e) => ConfigLoadResult::Invalid(ConfigError::Parse(e)),
            },
            Err(e) => ConfigLoadResult::Invalid(ConfigError::Read(e)),
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.api.base_url.starts_with("http") {
            return Err(ConfigError::Validation(
                "API base URL must start with http:// or https://".to_string(),
            ));
        }
        if self.api.timeout_secs < 5 {
            return Err(ConfigError::Validation(
                "API timeout must be at least 5 seconds".to_string(),
            ));
        }
        if self.api.health_timeout_secs < 1 {
            return Err(ConfigError::Validation(
                "Health timeout must be at least 1 second".to_string(),
            ));
        }
        for (name, ttl) in [
            ("customers", self.cache.customers_ttl_secs),
            ("bookings", self.cache.bookings_ttl_secs),
            ("upcoming", self.cache.upcoming_ttl_secs),
            ("stats", self.cache.stats_ttl_secs),
            ("services", self.cache.services_ttl_secs),
            ("health", self.cache.health_ttl_secs),
        ] {
            if ttl < 1 {
                return Err(ConfigError::Validation(format!(
                    "Cache TTL for {name} must be at least 1 second"
                )));
            }
            if ttl > 86400 {
                return Err(ConfigError::Validation(format!(
                    "Cache TTL for {name} cannot exceed 86400 seconds"
                )));
            }
        }
        if self.auth.gate_password.is_empty() {
            return Err(ConfigError::Validation("Gate password cannot be empty".to_string()));
        }
        if self.auth.credential_env.trim().is_empty() {
            return Err(ConfigError::Validation(
                "Credential environment variable name cannot be empty".to_string(),
            ));
        }
        if !matches!(self.ui.default_period_days, 7 | 30 | 90) {
            return Err(ConfigError::Validation(
                "Default period must be 7, 30, or 90 days".to_string(),
            ));
        }
        if self.ui.upcoming_hours < 1 || self.ui.upcoming_hours > 168 {
            return Err(ConfigError::Validation(
                "Upcoming hours must be between 1 and 168".to_string(),
            ));
        }
        Ok(())
    }

    /// Save configuration to file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://skinbylauralo.com/wp-json/salon/api/v1".to_string(),
            timeout_secs: default_timeout_secs(),
            health_timeout_secs: default_health_timeout_secs(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            customers_ttl_secs: 300,
            bookings_ttl_secs: 60,
            upcoming_ttl_secs: 60,
            stats_ttl_secs: 300,
            services_ttl_secs: 3600,
            health_ttl_secs: 60,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            gate_password: "admin".to_string(),
            credential_env: "SALON_API_PASSWORD".to_string(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            page_title: "Lalo's Salon Dashboard".to_string(),
            default_period_days: 30,
            upcoming_hours: 48,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_bad_base_url() {
        let mut config = AppConfig::default();
        config.api.base_url = "ftp://invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_timeout_too_low() {
        let mut config = AppConfig::default();
        config.api.timeout_secs = 2;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_ttl_bounds() {
        let mut config = AppConfig::default();

        config.cache.bookings_ttl_secs = 0;
        assert!(config.validate().is_err());

        config.cache.bookings_ttl_secs = 86401;
        assert!(config.validate().is_err());

        config.cache.bookings_ttl_secs = 60;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_period_days() {
        let mut config = AppConfig::default();
        config.ui.default_period_days = 14;
        assert!(config.validate().is_err());

        config.ui.default_period_days = 90;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.auth.gate_password, "admin");
        assert_eq!(config.cache.services_ttl_secs, 3600);
    }

    #[test]
    fn test_save_and_reload_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = AppConfig::default();
        config.ui.page_title = "Test Salon".to_string();
        config.save(&path).unwrap();

        match AppConfig::try_load(&path) {
            ConfigLoadResult::Loaded(loaded) => {
                assert_eq!(loaded.ui.page_title, "Test Salon");
            }
            other => panic!("expected Loaded, got {other:?}"),
        }
    }

    #[test]
    fn test_try_load_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        assert!(matches!(AppConfig::try_load(&path), ConfigLoadResult::Missing));
    }
}
