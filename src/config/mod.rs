//! Configuration management for the game tracker
//!
//! This module handles configuration loading from environment variables and
//! TOML files, validation, and default values.

pub mod app;
pub mod database;
pub mod rating;

// Re-export commonly used types
pub use app::{validate_config, AppConfig, ServiceSettings};
pub use database::{DatabaseBackend, DatabaseSettings};
pub use rating::RatingConfig;
