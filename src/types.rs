//! Common types used throughout the game tracker

use crate::error::{Result, TrackerError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Unique identifier for players
pub type PlayerId = i64;

/// Unique identifier for individual games
pub type GameId = i64;

/// Unique identifier for sets
pub type SetId = i64;

/// A registered player with both rating tracks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub email: Option<String>,
    pub department: Option<String>,
    pub games_rating: f64,
    pub sets_rating: f64,
    pub created_at: DateTime<Utc>,
}

/// Fields required to register a player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPlayer {
    pub name: String,
    pub email: Option<String>,
    pub department: Option<String>,
    pub initial_rating: f64,
    pub created_at: DateTime<Utc>,
}

/// A single recorded game, with the post-game rating snapshots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    pub set_id: SetId,
    pub winner_id: PlayerId,
    pub loser_id: PlayerId,
    pub server_id: PlayerId,
    pub winner_score: u32,
    pub loser_score: u32,
    pub winner_rating: f64,
    pub loser_rating: f64,
    pub created_at: DateTime<Utc>,
}

/// A game waiting to be attached to a set during commit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewGame {
    pub winner_id: PlayerId,
    pub loser_id: PlayerId,
    pub server_id: PlayerId,
    pub winner_score: u32,
    pub loser_score: u32,
    pub winner_rating: f64,
    pub loser_rating: f64,
    pub created_at: DateTime<Utc>,
}

/// A recorded set, with the post-set rating snapshots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSet {
    pub id: SetId,
    pub winner_id: PlayerId,
    pub loser_id: PlayerId,
    pub winner_rating: f64,
    pub loser_rating: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewGameSet {
    pub winner_id: PlayerId,
    pub loser_id: PlayerId,
    pub winner_rating: f64,
    pub loser_rating: f64,
    pub created_at: DateTime<Utc>,
}

/// Which of the two rating tracks a value belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingKind {
    Games,
    Sets,
}

impl std::fmt::Display for RatingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RatingKind::Games => write!(f, "games"),
            RatingKind::Sets => write!(f, "sets"),
        }
    }
}

/// Replacement value for one of a player's ratings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingUpdate {
    pub player_id: PlayerId,
    pub kind: RatingKind,
    pub value: f64,
}

/// Side of a set a player finished on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SetSide {
    Winner,
    Loser,
}

/// Everything one set submission writes, applied by the store as a unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetCommit {
    pub set: NewGameSet,
    pub games: Vec<NewGame>,
    pub rating_updates: Vec<RatingUpdate>,
}

impl SetCommit {
    /// Number of individual writes the commit performs
    pub fn write_count(&self) -> usize {
        1 + self.games.len() + self.rating_updates.len()
    }
}

/// A set as stored, together with its games in recording order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedSet {
    pub set: GameSet,
    pub games: Vec<Game>,
}

/// Points scored in one game, winner first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub winner_points: u32,
    pub loser_points: u32,
}

impl Score {
    pub fn new(winner_points: u32, loser_points: u32) -> Self {
        Self {
            winner_points,
            loser_points,
        }
    }
}

impl FromStr for Score {
    type Err = anyhow::Error;

    /// Parse a `"W-L"` score. `:` is accepted as an alternative delimiter.
    fn from_str(s: &str) -> Result<Self> {
        let malformed = || TrackerError::MalformedScore {
            score: s.to_string(),
        };

        let (winner, loser) = s
            .trim()
            .split_once(['-', ':'])
            .ok_or_else(malformed)?;

        let winner_points = winner.trim().parse::<u32>().map_err(|_| malformed())?;
        let loser_points = loser.trim().parse::<u32>().map_err(|_| malformed())?;

        Ok(Self::new(winner_points, loser_points))
    }
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.winner_points, self.loser_points)
    }
}

/// One game of a submitted set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameEntry {
    pub winner: String,
    pub server: String,
    pub score: Score,
}

/// A full set as entered on the game form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetSubmission {
    pub player_one: String,
    pub player_two: String,
    pub games: Vec<GameEntry>,
}

/// One leaderboard line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingRow {
    pub name: String,
    pub wins: u64,
    pub losses: u64,
    pub win_percentage: f64,
    pub department: Option<String>,
    pub sets_rating: f64,
    pub games_rating: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::error_kind;

    #[test]
    fn test_score_parsing() {
        assert_eq!("21-15".parse::<Score>().unwrap(), Score::new(21, 15));
        assert_eq!(" 11 : 9 ".parse::<Score>().unwrap(), Score::new(11, 9));
        assert_eq!(Score::new(21, 19).to_string(), "21-19");
    }

    #[test]
    fn test_malformed_scores() {
        for bad in ["", "21", "a-b", "21-", "-5", "21-15-3", "21--15"] {
            let err = bad.parse::<Score>().unwrap_err();
            assert_eq!(error_kind(&err), "malformed_score", "input {bad:?}");
        }
    }

    #[test]
    fn test_commit_write_count() {
        let now = Utc::now();
        let commit = SetCommit {
            set: NewGameSet {
                winner_id: 1,
                loser_id: 2,
                winner_rating: 16.0,
                loser_rating: -16.0,
                created_at: now,
            },
            games: vec![],
            rating_updates: vec![RatingUpdate {
                player_id: 1,
                kind: RatingKind::Sets,
                value: 16.0,
            }],
        };
        assert_eq!(commit.write_count(), 2);
    }
}
