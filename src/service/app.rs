//! Main application state and service coordination
//!
//! `AppState` is the composition root: it turns configuration into a store,
//! a rating calculator and the tracker components that share them.

use crate::config::AppConfig;
use crate::metrics::MetricsCollector;
use crate::rating::{EloCalculator, RatingCalculator};
use crate::storage::{open_store, TrackerStore};
use crate::tracker::{MatchRecorder, PlayerDirectory, RankingAggregator};
use crate::types::{PlayerId, RankingRow, RecordedSet, SetSubmission};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;

/// Service-level errors
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Service initialization error: {message}")]
    Initialization { message: String },
}

/// Main application state containing all service components
pub struct AppState {
    config: AppConfig,
    store: Arc<dyn TrackerStore>,
    calculator: Arc<dyn RatingCalculator>,
    players: PlayerDirectory,
    recorder: MatchRecorder,
    rankings: RankingAggregator,
    metrics: Arc<MetricsCollector>,
    is_running: Arc<RwLock<bool>>,
}

impl AppState {
    /// Initialize the application, opening the store named by configuration
    pub async fn new(config: AppConfig) -> Result<Self, ServiceError> {
        info!("Initializing {} service", config.service.name);

        let backend = config
            .database
            .backend()
            .map_err(|e| ServiceError::Configuration {
                message: format!("Invalid database URL: {}", e),
            })?;

        info!(
            "Opening {} store ({} environment)",
            backend, config.database.environment
        );
        let store = open_store(&backend).map_err(|e| ServiceError::Storage {
            message: format!("Failed to open store {}: {:#}", backend, e),
        })?;

        Self::with_store(config, store)
    }

    /// Build the service around an already opened store
    pub fn with_store(
        config: AppConfig,
        store: Arc<dyn TrackerStore>,
    ) -> Result<Self, ServiceError> {
        let metrics =
            Arc::new(
                MetricsCollector::new().map_err(|e| ServiceError::Initialization {
                    message: format!("Failed to create metrics collector: {}", e),
                })?,
            );

        let calculator: Arc<dyn RatingCalculator> = Arc::new(
            EloCalculator::new(&config.rating).map_err(|e| ServiceError::Configuration {
                message: format!("Failed to initialize rating calculator: {}", e),
            })?,
        );

        let players = PlayerDirectory::new(store.clone(), calculator.initial_rating())
            .with_metrics(metrics.clone());
        let recorder = MatchRecorder::new(store.clone(), calculator.clone(), players.clone())
            .with_metrics(metrics.clone());
        let rankings = RankingAggregator::new(store.clone()).with_metrics(metrics.clone());

        Ok(Self {
            config,
            store,
            calculator,
            players,
            recorder,
            rankings,
            metrics,
            is_running: Arc::new(RwLock::new(false)),
        })
    }

    /// Mark the service as accepting requests
    pub async fn start(&self) -> Result<(), ServiceError> {
        self.store.ping().map_err(|e| ServiceError::Storage {
            message: format!("Store is not reachable: {:#}", e),
        })?;

        *self.is_running.write().await = true;
        self.metrics.update_health_status(2);

        info!("✅ {} service started", self.config.service.name);
        Ok(())
    }

    pub async fn shutdown(&self) {
        *self.is_running.write().await = false;
        self.metrics.update_health_status(0);
        info!("✅ {} service shutdown completed", self.config.service.name);
    }

    pub async fn is_running(&self) -> bool {
        *self.is_running.read().await
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn store(&self) -> Arc<dyn TrackerStore> {
        self.store.clone()
    }

    pub fn players(&self) -> &PlayerDirectory {
        &self.players
    }

    pub fn calculator(&self) -> Arc<dyn RatingCalculator> {
        self.calculator.clone()
    }

    pub fn rankings(&self) -> &RankingAggregator {
        &self.rankings
    }

    pub fn metrics(&self) -> Arc<MetricsCollector> {
        self.metrics.clone()
    }

    pub fn compute_rankings(&self) -> crate::error::Result<Vec<RankingRow>> {
        self.rankings.compute_rankings()
    }

    pub fn record_set(&self, submission: &SetSubmission) -> crate::error::Result<RecordedSet> {
        self.recorder.record_set(submission)
    }

    pub fn create_player(
        &self,
        name: &str,
        email: Option<&str>,
        department: Option<&str>,
    ) -> crate::error::Result<PlayerId> {
        self.players.create_player(name, email, department)
    }

    pub fn lookup_player_id_by_name(&self, name: &str) -> crate::error::Result<Option<PlayerId>> {
        self.players.lookup_player_id_by_name(name)
    }
}
