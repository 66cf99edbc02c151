//! Main application configuration
//!
//! This module defines the primary configuration structures for the game
//! tracker, including environment variable and TOML file loading and
//! validation.

use crate::config::database::DatabaseSettings;
use crate::config::rating::RatingConfig;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub database: DatabaseSettings,
    pub rating: RatingConfig,
}

/// Service-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Service name for logging and metrics
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Address the HTTP server binds to
    pub http_host: String,
    /// Port for the HTTP API
    pub http_port: u16,
    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout_seconds: u64,
    /// Number of games and sets shown on the dashboard
    pub recent_limit: usize,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "gametracker".to_string(),
            log_level: "info".to_string(),
            http_host: "0.0.0.0".to_string(),
            http_port: 4567,
            shutdown_timeout_seconds: 10,
            recent_limit: 10,
        }
    }
}

fn parse_var<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| anyhow!("Invalid {} value: {}", key, value))
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        // Service settings
        if let Some(name) = lookup("SERVICE_NAME") {
            config.service.name = name;
        }
        if let Some(log_level) = lookup("LOG_LEVEL") {
            config.service.log_level = log_level;
        }
        if let Some(host) = lookup("HTTP_HOST") {
            config.service.http_host = host;
        }
        if let Some(port) = lookup("HTTP_PORT") {
            config.service.http_port = parse_var("HTTP_PORT", &port)?;
        }
        if let Some(timeout) = lookup("SHUTDOWN_TIMEOUT_SECONDS") {
            config.service.shutdown_timeout_seconds =
                parse_var("SHUTDOWN_TIMEOUT_SECONDS", &timeout)?;
        }
        if let Some(limit) = lookup("RECENT_LIMIT") {
            config.service.recent_limit = parse_var("RECENT_LIMIT", &limit)?;
        }

        // Database settings
        let environment = lookup("APP_ENV").unwrap_or_else(|| config.database.environment.clone());
        config.database = DatabaseSettings::for_environment(&environment, &lookup);

        // Rating settings
        if let Some(k) = lookup("ELO_K_FACTOR") {
            config.rating.k_factor = parse_var("ELO_K_FACTOR", &k)?;
        }
        if let Some(initial) = lookup("INITIAL_RATING") {
            config.rating.initial_rating = parse_var("INITIAL_RATING", &initial)?;
        }

        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file; missing keys take defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_toml_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Get shutdown timeout as Duration
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.service.shutdown_timeout_seconds)
    }

    pub fn http_address(&self) -> String {
        format!("{}:{}", self.service.http_host, self.service.http_port)
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    // Validate log level
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    if config.service.http_port == 0 {
        return Err(anyhow!("HTTP port cannot be 0"));
    }
    if config.service.shutdown_timeout_seconds == 0 {
        return Err(anyhow!("Shutdown timeout must be greater than 0"));
    }
    if config.service.recent_limit == 0 {
        return Err(anyhow!("Recent limit must be greater than 0"));
    }

    config.database.backend()?;

    if !config.rating.k_factor.is_finite() || config.rating.k_factor <= 0.0 {
        return Err(anyhow!("K factor must be a positive number"));
    }
    if !config.rating.initial_rating.is_finite() {
        return Err(anyhow!("Initial rating must be finite"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::database::DatabaseBackend;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<&str, &str> = vars.iter().copied().collect();
        AppConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()))
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
        assert_eq!(config.rating.k_factor, 32.0);
        assert_eq!(config.rating.initial_rating, 0.0);
        assert_eq!(config.service.recent_limit, 10);
    }

    #[test]
    fn test_env_overrides() {
        let config = config_from(&[
            ("HTTP_PORT", "8081"),
            ("LOG_LEVEL", "debug"),
            ("APP_ENV", "production"),
            ("DATABASE_URL", "memory"),
            ("ELO_K_FACTOR", "24"),
            ("INITIAL_RATING", "1000"),
        ])
        .unwrap();

        assert_eq!(config.service.http_port, 8081);
        assert_eq!(config.service.log_level, "debug");
        assert!(config.database.is_production());
        assert_eq!(config.database.backend().unwrap(), DatabaseBackend::Memory);
        assert_eq!(config.rating.k_factor, 24.0);
        assert_eq!(config.rating.initial_rating, 1000.0);
    }

    #[test]
    fn test_invalid_env_values() {
        assert!(config_from(&[("HTTP_PORT", "not-a-port")]).is_err());
        assert!(config_from(&[("LOG_LEVEL", "loud")]).is_err());
        assert!(config_from(&[("ELO_K_FACTOR", "-3")]).is_err());
        assert!(config_from(&[("TRACKER_DB_URL", "mysql://db")]).is_err());
    }

    #[test]
    fn test_toml_config() {
        let config = AppConfig::from_toml_str(
            r#"
            [service]
            http_port = 9000

            [database]
            url = "memory"

            [rating]
            k_factor = 16.0
            "#,
        )
        .unwrap();

        assert_eq!(config.service.http_port, 9000);
        assert_eq!(config.service.name, "gametracker");
        assert_eq!(config.database.backend().unwrap(), DatabaseBackend::Memory);
        assert_eq!(config.rating.k_factor, 16.0);
        assert_eq!(config.rating.initial_rating, 0.0);
    }

    #[test]
    fn test_http_address() {
        let config = AppConfig::default();
        assert_eq!(config.http_address(), "0.0.0.0:4567");
    }
}
