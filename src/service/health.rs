//! Health check reporting
//!
//! This module provides health check functionality for the tracker,
//! including liveness and store readiness.

use crate::service::app::AppState;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

/// Health check status
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthStatus::Healthy => write!(f, "✅ healthy"),
            HealthStatus::Degraded => write!(f, "⚠️  degraded"),
            HealthStatus::Unhealthy => write!(f, "❌ unhealthy"),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheck {
    /// Overall service status
    pub status: HealthStatus,
    pub service: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// Detailed component checks
    pub checks: Vec<ComponentCheck>,
    pub stats: ServiceStats,
    /// Active rating system and its parameters
    pub rating: serde_json::Value,
}

/// Individual component health check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentCheck {
    pub name: String,
    pub status: HealthStatus,
    /// Optional error message if unhealthy
    pub message: Option<String>,
    /// Check duration in milliseconds
    pub duration_ms: u64,
}

/// Store statistics for health reporting
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceStats {
    pub players: usize,
    pub sets_recorded: u64,
    pub games_recorded: u64,
}

impl HealthCheck {
    /// Perform a full health check of the service
    pub async fn check(app_state: &AppState) -> Self {
        let mut checks = Vec::new();
        let mut overall_status = HealthStatus::Healthy;

        let service_check = Self::check_service_running(app_state).await;
        if service_check.status != HealthStatus::Healthy {
            overall_status = HealthStatus::Degraded;
        }
        checks.push(service_check);

        let store_check = Self::check_store(app_state);
        if store_check.status == HealthStatus::Unhealthy {
            overall_status = HealthStatus::Unhealthy;
        }
        checks.push(store_check);

        let stats = Self::gather_service_stats(app_state);

        HealthCheck {
            status: overall_status,
            service: app_state.config().service.name.clone(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: chrono::Utc::now(),
            checks,
            stats,
            rating: app_state.calculator().config(),
        }
    }

    /// Simple liveness check - just verify service is running
    pub async fn liveness_check(app_state: &AppState) -> HealthStatus {
        if app_state.is_running().await {
            HealthStatus::Healthy
        } else {
            HealthStatus::Unhealthy
        }
    }

    /// Readiness check - running and the store answers
    pub async fn readiness_check(app_state: &AppState) -> HealthStatus {
        if !app_state.is_running().await {
            return HealthStatus::Unhealthy;
        }
        Self::check_store(app_state).status
    }

    async fn check_service_running(app_state: &AppState) -> ComponentCheck {
        let start = std::time::Instant::now();

        let (status, message) = if app_state.is_running().await {
            (HealthStatus::Healthy, None)
        } else {
            (
                HealthStatus::Unhealthy,
                Some("Service is not running".to_string()),
            )
        };

        ComponentCheck {
            name: "service_running".to_string(),
            status,
            message,
            duration_ms: start.elapsed().as_millis() as u64,
        }
    }

    fn check_store(app_state: &AppState) -> ComponentCheck {
        let start = std::time::Instant::now();

        let (status, message) = match app_state.store().ping() {
            Ok(()) => (HealthStatus::Healthy, None),
            Err(e) => {
                error!("Store ping failed: {:#}", e);
                (
                    HealthStatus::Unhealthy,
                    Some(format!("Store unreachable: {}", e)),
                )
            }
        };

        ComponentCheck {
            name: "store".to_string(),
            status,
            message,
            duration_ms: start.elapsed().as_millis() as u64,
        }
    }

    fn gather_service_stats(app_state: &AppState) -> ServiceStats {
        let metrics = app_state.metrics();
        let players = match app_state.store().list_players() {
            Ok(players) => players.len(),
            Err(e) => {
                debug!("Failed to count players for health check: {}", e);
                0
            }
        };

        ServiceStats {
            players,
            sets_recorded: metrics.recording().sets_recorded_total.get(),
            games_recorded: metrics.recording().games_recorded_total.get(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::storage::{InMemoryStore, MockTrackerStore};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_health_of_running_service() {
        let state = AppState::with_store(AppConfig::default(), Arc::new(InMemoryStore::new()))
            .unwrap();
        state.start().await.unwrap();
        state.create_player("Alice", None, None).unwrap();

        let health = HealthCheck::check(&state).await;
        assert_eq!(health.status, HealthStatus::Healthy);
        assert_eq!(health.checks.len(), 2);
        assert_eq!(health.stats.players, 1);
        assert_eq!(health.rating["type"], "elo");
        assert_eq!(health.rating["k_factor"], 32.0);
        assert_eq!(health.rating["initial_rating"], 0.0);
        assert_eq!(HealthCheck::liveness_check(&state).await, HealthStatus::Healthy);
        assert_eq!(HealthCheck::readiness_check(&state).await, HealthStatus::Healthy);
    }

    #[tokio::test]
    async fn test_not_started_service() {
        let state = AppState::with_store(AppConfig::default(), Arc::new(InMemoryStore::new()))
            .unwrap();

        let health = HealthCheck::check(&state).await;
        assert_eq!(health.status, HealthStatus::Degraded);
        assert_eq!(HealthCheck::liveness_check(&state).await, HealthStatus::Unhealthy);
        assert_eq!(HealthCheck::readiness_check(&state).await, HealthStatus::Unhealthy);
    }

    #[tokio::test]
    async fn test_unreachable_store() {
        let mut store = MockTrackerStore::new();
        store
            .expect_ping()
            .returning(|| Err(anyhow::anyhow!("database is locked")));
        store
            .expect_list_players()
            .returning(|| Err(anyhow::anyhow!("database is locked")));

        let state = AppState::with_store(AppConfig::default(), Arc::new(store)).unwrap();

        let health = HealthCheck::check(&state).await;
        assert_eq!(health.status, HealthStatus::Unhealthy);
        assert_eq!(health.stats.players, 0);
        let store_check = health.checks.iter().find(|c| c.name == "store").unwrap();
        assert!(store_check
            .message
            .as_deref()
            .unwrap()
            .contains("database is locked"));
    }
}
