//! Game Tracker - head-to-head results and Elo ratings
//!
//! This crate records sets of games between two players, keeps separate
//! Elo ratings for individual games and for whole sets, and serves a
//! leaderboard over a small JSON API.

pub mod config;
pub mod error;
pub mod http;
pub mod metrics;
pub mod rating;
pub mod service;
pub mod storage;
pub mod tracker;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{Result, TrackerError};
pub use types::*;

// Re-export key components
pub use rating::{EloCalculator, RatingCalculator};
pub use storage::{InMemoryStore, SqliteStore, TrackerStore};
pub use tracker::{MatchRecorder, PlayerDirectory, RankingAggregator};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
