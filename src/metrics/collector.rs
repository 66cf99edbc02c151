//! Metrics collection using Prometheus
//!
//! This module provides metrics collection for the game tracker using
//! Prometheus metrics.

use anyhow::Result;
use prometheus::{
    Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Main metrics collector for the tracker
#[derive(Clone)]
pub struct MetricsCollector {
    /// Prometheus registry
    registry: Arc<Registry>,

    /// Recording-related metrics
    recording_metrics: RecordingMetrics,

    /// Read-side and service metrics
    service_metrics: ServiceMetrics,
}

/// Metrics for set submissions
#[derive(Clone)]
pub struct RecordingMetrics {
    /// Total sets recorded
    pub sets_recorded_total: IntCounter,

    /// Total individual games recorded
    pub games_recorded_total: IntCounter,

    /// Rejected or failed submissions by reason
    pub record_failures_total: IntCounterVec,

    /// Time spent recording a set, store commit included
    pub record_set_duration: Histogram,
}

/// Service-level metrics
#[derive(Clone)]
pub struct ServiceMetrics {
    /// Total players created
    pub players_created_total: IntCounter,

    /// Total leaderboard computations
    pub rankings_computed_total: IntCounter,

    /// Time spent computing the leaderboard
    pub rankings_duration: Histogram,

    /// Health check status (0=unhealthy, 2=healthy)
    pub health_status: IntGauge,
}

impl MetricsCollector {
    /// Create a new metrics collector with default registry
    pub fn new() -> Result<Self> {
        let registry = Arc::new(Registry::new());
        Self::with_registry(registry)
    }

    /// Create a new metrics collector with custom registry
    pub fn with_registry(registry: Arc<Registry>) -> Result<Self> {
        let recording_metrics = RecordingMetrics::new(&registry)?;
        let service_metrics = ServiceMetrics::new(&registry)?;

        Ok(Self {
            registry,
            recording_metrics,
            service_metrics,
        })
    }

    /// Get the Prometheus registry
    pub fn registry(&self) -> Arc<Registry> {
        self.registry.clone()
    }

    pub fn recording(&self) -> &RecordingMetrics {
        &self.recording_metrics
    }

    pub fn service(&self) -> &ServiceMetrics {
        &self.service_metrics
    }

    /// Record a successfully committed set
    pub fn record_set_recorded(&self, games: usize, duration: Duration) {
        self.recording_metrics.sets_recorded_total.inc();
        self.recording_metrics
            .games_recorded_total
            .inc_by(games as u64);
        self.recording_metrics
            .record_set_duration
            .observe(duration.as_secs_f64());
    }

    /// Record a submission that did not produce a set
    pub fn record_set_failed(&self, reason: &str) {
        self.recording_metrics
            .record_failures_total
            .with_label_values(&[reason])
            .inc();
    }

    pub fn record_player_created(&self) {
        self.service_metrics.players_created_total.inc();
    }

    pub fn record_rankings_computed(&self, duration: Duration) {
        self.service_metrics.rankings_computed_total.inc();
        self.service_metrics
            .rankings_duration
            .observe(duration.as_secs_f64());
    }

    /// Update health status
    pub fn update_health_status(&self, status: u8) {
        self.service_metrics.health_status.set(status as i64);
    }

    /// Create a timer for measuring operation duration
    pub fn start_timer(&self) -> MetricsTimer {
        MetricsTimer::new()
    }
}

/// Timer for measuring operation durations
pub struct MetricsTimer {
    start: Instant,
}

impl MetricsTimer {
    fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Get the elapsed duration
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Stop the timer and return the duration
    pub fn stop(self) -> Duration {
        self.elapsed()
    }
}

impl RecordingMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let sets_recorded_total =
            IntCounter::new("gametracker_sets_recorded_total", "Total sets recorded")?;
        registry.register(Box::new(sets_recorded_total.clone()))?;

        let games_recorded_total =
            IntCounter::new("gametracker_games_recorded_total", "Total games recorded")?;
        registry.register(Box::new(games_recorded_total.clone()))?;

        let record_failures_total = IntCounterVec::new(
            Opts::new(
                "gametracker_record_failures_total",
                "Set submissions that failed, by reason",
            ),
            &["reason"],
        )?;
        registry.register(Box::new(record_failures_total.clone()))?;

        let record_set_duration = Histogram::with_opts(HistogramOpts::new(
            "gametracker_record_set_duration_seconds",
            "Time spent recording a set",
        ))?;
        registry.register(Box::new(record_set_duration.clone()))?;

        Ok(Self {
            sets_recorded_total,
            games_recorded_total,
            record_failures_total,
            record_set_duration,
        })
    }
}

impl ServiceMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let players_created_total =
            IntCounter::new("gametracker_players_created_total", "Total players created")?;
        registry.register(Box::new(players_created_total.clone()))?;

        let rankings_computed_total = IntCounter::new(
            "gametracker_rankings_computed_total",
            "Total leaderboard computations",
        )?;
        registry.register(Box::new(rankings_computed_total.clone()))?;

        let rankings_duration = Histogram::with_opts(HistogramOpts::new(
            "gametracker_rankings_duration_seconds",
            "Time spent computing the leaderboard",
        ))?;
        registry.register(Box::new(rankings_duration.clone()))?;

        let health_status = IntGauge::new(
            "gametracker_health_status",
            "Health status (0=unhealthy, 2=healthy)",
        )?;
        registry.register(Box::new(health_status.clone()))?;

        Ok(Self {
            players_created_total,
            rankings_computed_total,
            rankings_duration,
            health_status,
        })
    }
}
