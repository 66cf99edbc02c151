//! Elo rating system implementation
//!
//! This module provides the production rating calculator, a paired Elo update
//! backed by the skillratings crate. Both sides are updated from the ratings
//! they held before the result, so the order the pair is given in never
//! changes the outcome.

use crate::config::RatingConfig;
use crate::error::TrackerError;
use crate::rating::calculator::{Outcome, RatingCalculator};
use skillratings::elo::{elo, expected_score, EloConfig, EloRating};
use skillratings::Outcomes;

/// Elo rating calculator
#[derive(Debug, Clone)]
pub struct EloCalculator {
    config: EloConfig,
    initial_rating: f64,
}

impl EloCalculator {
    /// Create a new Elo calculator
    pub fn new(config: &RatingConfig) -> crate::error::Result<Self> {
        if !config.k_factor.is_finite() || config.k_factor <= 0.0 {
            return Err(TrackerError::ConfigurationError {
                message: format!("K factor must be positive, got {}", config.k_factor),
            }
            .into());
        }

        if !config.initial_rating.is_finite() {
            return Err(TrackerError::ConfigurationError {
                message: "Initial rating must be finite".to_string(),
            }
            .into());
        }

        Ok(Self {
            config: EloConfig {
                k: config.k_factor,
            },
            initial_rating: config.initial_rating,
        })
    }

    pub fn k_factor(&self) -> f64 {
        self.config.k
    }
}

impl Default for EloCalculator {
    fn default() -> Self {
        Self {
            config: EloConfig::new(),
            initial_rating: RatingConfig::default().initial_rating,
        }
    }
}

fn ensure_finite(label: &str, value: f64) -> crate::error::Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(TrackerError::invalid_input(format!("{} rating is not finite: {}", label, value)).into())
    }
}

impl RatingCalculator for EloCalculator {
    fn update_ratings(
        &self,
        current_a: f64,
        current_b: f64,
        outcome: Outcome,
    ) -> crate::error::Result<(f64, f64)> {
        ensure_finite("first", current_a)?;
        ensure_finite("second", current_b)?;

        let outcome = match outcome {
            Outcome::AWins => Outcomes::WIN,
            Outcome::BWins => Outcomes::LOSS,
        };

        let (new_a, new_b) = elo(
            &EloRating { rating: current_a },
            &EloRating { rating: current_b },
            &outcome,
            &self.config,
        );

        Ok((new_a.rating, new_b.rating))
    }

    fn expected_score(&self, own: f64, opponent: f64) -> f64 {
        let (own_expected, _) =
            expected_score(&EloRating { rating: own }, &EloRating { rating: opponent });
        own_expected
    }

    fn initial_rating(&self) -> f64 {
        self.initial_rating
    }

    fn config(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "elo",
            "k_factor": self.config.k,
            "initial_rating": self.initial_rating,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::error_kind;
    use proptest::prelude::*;

    const EPSILON: f64 = 1e-9;

    fn calculator() -> EloCalculator {
        EloCalculator::new(&RatingConfig::default()).unwrap()
    }

    /// Reference formula: own + K * (actual - 1 / (1 + 10^((opp - own) / 400)))
    fn reference_update(own: f64, opponent: f64, actual: f64, k: f64) -> f64 {
        let expected = 1.0 / (1.0 + 10f64.powf((opponent - own) / 400.0));
        own + k * (actual - expected)
    }

    #[test]
    fn test_equal_ratings_winner_gains() {
        let (a, b) = calculator().update_ratings(1000.0, 1000.0, Outcome::AWins).unwrap();
        assert!(a > 1000.0);
        assert!(b < 1000.0);
        assert!((a - 1016.0).abs() < EPSILON);
        assert!((b - 984.0).abs() < EPSILON);
    }

    #[test]
    fn test_fresh_players_from_zero() {
        let (a, b) = calculator().update_ratings(0.0, 0.0, Outcome::BWins).unwrap();
        assert!((a + 16.0).abs() < EPSILON);
        assert!((b - 16.0).abs() < EPSILON);
    }

    #[test]
    fn test_matches_reference_formula() {
        let calc = calculator();
        let (a, b) = calc.update_ratings(1200.0, 1000.0, Outcome::AWins).unwrap();
        assert!((a - reference_update(1200.0, 1000.0, 1.0, 32.0)).abs() < EPSILON);
        assert!((b - reference_update(1000.0, 1200.0, 0.0, 32.0)).abs() < EPSILON);
    }

    #[test]
    fn test_upset_moves_more_than_expected_win() {
        let calc = calculator();
        let (fav_win, _) = calc.update_ratings(1400.0, 1000.0, Outcome::AWins).unwrap();
        let (_, underdog_win) = calc.update_ratings(1400.0, 1000.0, Outcome::BWins).unwrap();
        assert!(fav_win - 1400.0 < underdog_win - 1000.0);
    }

    #[test]
    fn test_custom_k_factor() {
        let calc = EloCalculator::new(&RatingConfig {
            k_factor: 10.0,
            initial_rating: 0.0,
        })
        .unwrap();
        let (a, b) = calc.update_ratings(0.0, 0.0, Outcome::AWins).unwrap();
        assert!((a - 5.0).abs() < EPSILON);
        assert!((b + 5.0).abs() < EPSILON);
        assert_eq!(calc.k_factor(), 10.0);
    }

    #[test]
    fn test_invalid_inputs() {
        let calc = calculator();
        let err = calc
            .update_ratings(f64::NAN, 0.0, Outcome::AWins)
            .unwrap_err();
        assert_eq!(error_kind(&err), "invalid_input");
        assert!(calc
            .update_ratings(0.0, f64::INFINITY, Outcome::AWins)
            .is_err());
    }

    #[test]
    fn test_invalid_config() {
        let err = EloCalculator::new(&RatingConfig {
            k_factor: 0.0,
            initial_rating: 0.0,
        })
        .unwrap_err();
        assert_eq!(error_kind(&err), "configuration");
    }

    #[test]
    fn test_config_json() {
        let config = calculator().config();
        assert_eq!(config["type"], "elo");
        assert_eq!(config["k_factor"], 32.0);
    }

    proptest! {
        #[test]
        fn prop_expected_scores_sum_to_one(a in -3000.0f64..3000.0, b in -3000.0f64..3000.0) {
            let calc = calculator();
            let sum = calc.expected_score(a, b) + calc.expected_score(b, a);
            prop_assert!((sum - 1.0).abs() < 1e-9);
        }

        #[test]
        fn prop_update_is_zero_sum(a in -3000.0f64..3000.0, b in -3000.0f64..3000.0, a_wins in any::<bool>()) {
            let outcome = if a_wins { Outcome::AWins } else { Outcome::BWins };
            let (new_a, new_b) = calculator().update_ratings(a, b, outcome).unwrap();
            prop_assert!(((new_a - a) + (new_b - b)).abs() < 1e-6);
        }

        #[test]
        fn prop_winner_never_loses_points(a in -3000.0f64..3000.0, b in -3000.0f64..3000.0) {
            let (new_a, new_b) = calculator().update_ratings(a, b, Outcome::AWins).unwrap();
            prop_assert!(new_a >= a);
            prop_assert!(new_b <= b);
        }
    }
}
