//! Set recording
//!
//! A submission is validated and every rating is computed in memory first.
//! Only then is the whole result handed to the store as one [`SetCommit`],
//! so a rejected submission never leaves partial writes behind.

use crate::error::{error_kind, TrackerError};
use crate::metrics::MetricsCollector;
use crate::rating::{resolve_set_winner, Outcome, RatingCalculator};
use crate::storage::TrackerStore;
use crate::tracker::players::PlayerDirectory;
use crate::types::{
    NewGame, NewGameSet, Player, RatingKind, RatingUpdate, RecordedSet, SetCommit, SetSubmission,
};
use crate::utils::current_timestamp;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const MIN_GAMES_PER_SET: usize = 2;
pub const MAX_GAMES_PER_SET: usize = 3;

/// Records complete sets and keeps both rating tracks up to date
#[derive(Clone)]
pub struct MatchRecorder {
    store: Arc<dyn TrackerStore>,
    calculator: Arc<dyn RatingCalculator>,
    players: PlayerDirectory,
    metrics: Option<Arc<MetricsCollector>>,
}

impl MatchRecorder {
    pub fn new(
        store: Arc<dyn TrackerStore>,
        calculator: Arc<dyn RatingCalculator>,
        players: PlayerDirectory,
    ) -> Self {
        Self {
            store,
            calculator,
            players,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<MetricsCollector>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Record one set and all of its games
    pub fn record_set(&self, submission: &SetSubmission) -> crate::error::Result<RecordedSet> {
        let timer = self.metrics.as_ref().map(|metrics| metrics.start_timer());

        match self.try_record_set(submission) {
            Ok(recorded) => {
                if let (Some(metrics), Some(timer)) = (&self.metrics, timer) {
                    metrics.record_set_recorded(recorded.games.len(), timer.stop());
                }
                Ok(recorded)
            }
            Err(e) => {
                let reason = error_kind(&e);
                warn!(
                    "Rejected set {} vs {} ({}): {:#}",
                    submission.player_one, submission.player_two, reason, e
                );
                if let Some(metrics) = &self.metrics {
                    metrics.record_set_failed(reason);
                }
                Err(e)
            }
        }
    }

    fn try_record_set(&self, submission: &SetSubmission) -> crate::error::Result<RecordedSet> {
        validate_submission(submission)?;

        let player_one = self.players.require_player(&submission.player_one)?;
        let player_two = self.players.require_player(&submission.player_two)?;

        let winners: Vec<&str> = submission.games.iter().map(|g| g.winner.trim()).collect();
        let set_winner_name = resolve_set_winner(&winners)?;
        let (set_winner, set_loser) = order_pair(&player_one, &player_two, set_winner_name);

        let (set_winner_rating, set_loser_rating) = self.calculator.update_ratings(
            set_winner.sets_rating,
            set_loser.sets_rating,
            Outcome::AWins,
        )?;

        let now = current_timestamp();

        // Game ratings carry forward from one game to the next within the set
        let mut one_rating = player_one.games_rating;
        let mut two_rating = player_two.games_rating;
        let mut games = Vec::with_capacity(submission.games.len());

        for (index, entry) in submission.games.iter().enumerate() {
            let one_won = entry.winner.trim() == player_one.name;
            let (winner, loser) = if one_won {
                (&player_one, &player_two)
            } else {
                (&player_two, &player_one)
            };
            let server = if entry.server.trim() == player_one.name {
                &player_one
            } else {
                &player_two
            };

            let (winner_current, loser_current) = if one_won {
                (one_rating, two_rating)
            } else {
                (two_rating, one_rating)
            };
            let (winner_rating, loser_rating) =
                self.calculator
                    .update_ratings(winner_current, loser_current, Outcome::AWins)?;

            if one_won {
                one_rating = winner_rating;
                two_rating = loser_rating;
            } else {
                one_rating = loser_rating;
                two_rating = winner_rating;
            }

            debug!(
                "Game {}: {} beat {} {} ({:.1} / {:.1})",
                index + 1,
                winner.name,
                loser.name,
                entry.score,
                winner_rating,
                loser_rating
            );

            games.push(NewGame {
                winner_id: winner.id,
                loser_id: loser.id,
                server_id: server.id,
                winner_score: entry.score.winner_points,
                loser_score: entry.score.loser_points,
                winner_rating,
                loser_rating,
                created_at: now,
            });
        }

        let commit = SetCommit {
            set: NewGameSet {
                winner_id: set_winner.id,
                loser_id: set_loser.id,
                winner_rating: set_winner_rating,
                loser_rating: set_loser_rating,
                created_at: now,
            },
            games,
            rating_updates: vec![
                RatingUpdate {
                    player_id: set_winner.id,
                    kind: RatingKind::Sets,
                    value: set_winner_rating,
                },
                RatingUpdate {
                    player_id: set_loser.id,
                    kind: RatingKind::Sets,
                    value: set_loser_rating,
                },
                RatingUpdate {
                    player_id: player_one.id,
                    kind: RatingKind::Games,
                    value: one_rating,
                },
                RatingUpdate {
                    player_id: player_two.id,
                    kind: RatingKind::Games,
                    value: two_rating,
                },
            ],
        };

        let recorded = self.store.commit_set(commit)?;

        info!(
            "Recorded set {}: {} beat {} in {} games, sets rating {:.1} -> {:.1} / {:.1} -> {:.1}",
            recorded.set.id,
            set_winner.name,
            set_loser.name,
            recorded.games.len(),
            set_winner.sets_rating,
            set_winner_rating,
            set_loser.sets_rating,
            set_loser_rating
        );

        Ok(recorded)
    }
}

fn order_pair<'a>(one: &'a Player, two: &'a Player, winner_name: &str) -> (&'a Player, &'a Player) {
    if one.name == winner_name {
        (one, two)
    } else {
        (two, one)
    }
}

/// Structural checks that need no store access
pub fn validate_submission(submission: &SetSubmission) -> crate::error::Result<()> {
    let one = submission.player_one.trim();
    let two = submission.player_two.trim();

    if one.is_empty() || two.is_empty() {
        return Err(TrackerError::invalid_input("both players must be named").into());
    }
    if one == two {
        return Err(TrackerError::invalid_input(format!(
            "a player cannot play against themselves: {}",
            one
        ))
        .into());
    }

    let count = submission.games.len();
    if !(MIN_GAMES_PER_SET..=MAX_GAMES_PER_SET).contains(&count) {
        return Err(TrackerError::invalid_input(format!(
            "a set has {} to {} games, got {}",
            MIN_GAMES_PER_SET, MAX_GAMES_PER_SET, count
        ))
        .into());
    }

    for (index, game) in submission.games.iter().enumerate() {
        let winner = game.winner.trim();
        if winner != one && winner != two {
            return Err(TrackerError::invalid_input(format!(
                "game {} winner {} is not playing in this set",
                index + 1,
                game.winner
            ))
            .into());
        }
        let server = game.server.trim();
        if server != one && server != two {
            return Err(TrackerError::invalid_input(format!(
                "game {} server {} is not playing in this set",
                index + 1,
                game.server
            ))
            .into());
        }
    }

    Ok(())
}
