//! Utility functions for the game tracker

use chrono::{DateTime, Utc};

/// Get the current UTC timestamp
pub fn current_timestamp() -> DateTime<Utc> {
    Utc::now()
}

/// Round to a fixed number of decimal places
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Share of sets won as a percentage, rounded to three places before scaling
pub fn win_percentage(wins: u64, losses: u64) -> f64 {
    let total = wins + losses;
    if total == 0 {
        return 0.0;
    }
    round_to(wins as f64 / total as f64, 3) * 100.0
}
