//! Metrics and monitoring for the game tracker
//!
//! This module provides Prometheus metrics collection for set recording,
//! player registration and leaderboard computation.

pub mod collector;

pub use collector::{MetricsCollector, MetricsTimer, RecordingMetrics, ServiceMetrics};
