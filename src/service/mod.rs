//! Service layer for the game tracker
//!
//! This module contains the application state that wires configuration,
//! storage and the tracker components together, plus health reporting.

pub mod app;
pub mod health;

pub use app::{AppState, ServiceError};
pub use health::{HealthCheck, HealthStatus};
