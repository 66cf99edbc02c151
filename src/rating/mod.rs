//! Rating system integration using paired Elo updates
//!
//! This module provides the rating calculator interface, the Elo
//! implementation backed by the skillratings crate, and the majority-vote
//! rule that decides who took a set.

pub mod calculator;
pub mod elo;
pub mod outcome;

// Re-export commonly used types
pub use calculator::{Outcome, RatingCalculator};
pub use elo::EloCalculator;
pub use outcome::resolve_set_winner;
