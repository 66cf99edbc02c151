//! Database selection
//!
//! The deployment environment decides which URL is read; the URL then
//! decides the backend. Nothing below the composition root sees either.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const PRODUCTION_ENVIRONMENT: &str = "production";
pub const DEFAULT_PRODUCTION_URL: &str = "sqlite://gametracker.db";
pub const DEFAULT_DEVELOPMENT_URL: &str = "sqlite://gametracker-dev.db";

/// Database connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// Deployment environment name, `production` or anything else
    pub environment: String,
    /// Store URL: `sqlite://<path>`, a bare path, or `memory`
    pub url: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            url: DEFAULT_DEVELOPMENT_URL.to_string(),
        }
    }
}

/// Concrete store selected from the URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseBackend {
    Memory,
    Sqlite(PathBuf),
}

impl std::fmt::Display for DatabaseBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatabaseBackend::Memory => write!(f, "memory"),
            DatabaseBackend::Sqlite(path) => write!(f, "sqlite://{}", path.display()),
        }
    }
}

impl DatabaseSettings {
    /// Pick the URL for the environment the way deployments expect:
    /// production reads `DATABASE_URL`, everything else `TRACKER_DB_URL`.
    pub fn for_environment(
        environment: &str,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let url = if environment == PRODUCTION_ENVIRONMENT {
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_PRODUCTION_URL.to_string())
        } else {
            lookup("TRACKER_DB_URL").unwrap_or_else(|| DEFAULT_DEVELOPMENT_URL.to_string())
        };

        Self {
            environment: environment.to_string(),
            url,
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == PRODUCTION_ENVIRONMENT
    }

    pub fn backend(&self) -> Result<DatabaseBackend> {
        parse_database_url(&self.url)
    }
}

/// Parse a store URL into a backend
pub fn parse_database_url(url: &str) -> Result<DatabaseBackend> {
    let url = url.trim();
    match url {
        "" => Err(anyhow!("Database URL cannot be empty")),
        "memory" | ":memory:" | "memory://" => Ok(DatabaseBackend::Memory),
        _ => {
            if let Some(path) = url.strip_prefix("sqlite://") {
                if path.is_empty() {
                    return Err(anyhow!("SQLite URL is missing a path: {}", url));
                }
                Ok(DatabaseBackend::Sqlite(PathBuf::from(path)))
            } else if url.contains("://") {
                Err(anyhow!("Unsupported database URL scheme: {}", url))
            } else {
                Ok(DatabaseBackend::Sqlite(PathBuf::from(url)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_production_reads_database_url() {
        let settings = DatabaseSettings::for_environment(
            "production",
            lookup(&[
                ("DATABASE_URL", "sqlite:///var/lib/tracker.db"),
                ("TRACKER_DB_URL", "memory"),
            ]),
        );
        assert!(settings.is_production());
        assert_eq!(
            settings.backend().unwrap(),
            DatabaseBackend::Sqlite(PathBuf::from("/var/lib/tracker.db"))
        );
    }

    #[test]
    fn test_production_default() {
        let settings = DatabaseSettings::for_environment("production", lookup(&[]));
        assert_eq!(settings.url, DEFAULT_PRODUCTION_URL);
    }

    #[test]
    fn test_development_reads_tracker_url() {
        let settings = DatabaseSettings::for_environment(
            "development",
            lookup(&[("DATABASE_URL", "sqlite://prod.db"), ("TRACKER_DB_URL", "memory")]),
        );
        assert!(!settings.is_production());
        assert_eq!(settings.backend().unwrap(), DatabaseBackend::Memory);
    }

    #[test]
    fn test_parse_database_url() {
        assert_eq!(parse_database_url(":memory:").unwrap(), DatabaseBackend::Memory);
        assert_eq!(
            parse_database_url("tracker.db").unwrap(),
            DatabaseBackend::Sqlite(PathBuf::from("tracker.db"))
        );
        assert!(parse_database_url("").is_err());
        assert!(parse_database_url("sqlite://").is_err());
        assert!(parse_database_url("postgres://localhost/tracker").is_err());
    }

    #[test]
    fn test_backend_display() {
        assert_eq!(DatabaseBackend::Memory.to_string(), "memory");
        assert_eq!(
            DatabaseBackend::Sqlite(PathBuf::from("a.db")).to_string(),
            "sqlite://a.db"
        );
    }
}
