//! Rating calculator trait
//!
//! This module defines the interface the recorder uses to turn a head-to-head
//! outcome into new ratings, independent of the rating system behind it.

use serde::{Deserialize, Serialize};

/// Result of a head-to-head between side A and side B
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    AWins,
    BWins,
}

impl Outcome {
    /// Actual score credited to side A
    pub fn score_for_a(self) -> f64 {
        match self {
            Outcome::AWins => 1.0,
            Outcome::BWins => 0.0,
        }
    }
}

/// Trait for calculating rating changes after a head-to-head result
#[cfg_attr(test, mockall::automock)]
pub trait RatingCalculator: Send + Sync {
    /// Calculate new ratings for both sides from their pre-update ratings
    ///
    /// # Arguments
    /// * `current_a` - Current rating of side A
    /// * `current_b` - Current rating of side B
    /// * `outcome` - Which side won
    ///
    /// # Returns
    /// `(new_a, new_b)`, both computed from the pre-update values
    fn update_ratings(
        &self,
        current_a: f64,
        current_b: f64,
        outcome: Outcome,
    ) -> crate::error::Result<(f64, f64)>;

    /// Probability that a player rated `own` beats one rated `opponent`
    fn expected_score(&self, own: f64, opponent: f64) -> f64;

    /// Get the rating for new players
    fn initial_rating(&self) -> f64;

    /// Get current configuration as JSON
    fn config(&self) -> serde_json::Value;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_scores() {
        assert_eq!(Outcome::AWins.score_for_a(), 1.0);
        assert_eq!(Outcome::BWins.score_for_a(), 0.0);
    }

    #[test]
    fn test_mock_calculator() {
        let mut calculator = MockRatingCalculator::new();
        calculator
            .expect_update_ratings()
            .withf(|a, b, outcome| *a == 10.0 && *b == 20.0 && *outcome == Outcome::AWins)
            .times(1)
            .returning(|a, b, _| Ok((a + 1.0, b - 1.0)));

        let (a, b) = calculator.update_ratings(10.0, 20.0, Outcome::AWins).unwrap();
        assert_eq!((a, b), (11.0, 19.0));
    }
}
