//! Rating system configuration

use serde::{Deserialize, Serialize};

/// Tuning for the Elo engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingConfig {
    /// Maximum rating change per outcome
    pub k_factor: f64,
    /// Rating assigned to both tracks of a newly created player
    pub initial_rating: f64,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            k_factor: 32.0,
            initial_rating: 0.0,
        }
    }
}
