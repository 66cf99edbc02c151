//! In-memory tracker storage
//!
//! All tables live behind one lock so a set commit is applied atomically
//! with respect to every other reader and writer.

use crate::error::TrackerError;
use crate::storage::TrackerStore;
use crate::types::{
    Game, GameSet, NewPlayer, Player, PlayerId, RatingKind, RecordedSet, SetCommit, SetId,
    SetSide,
};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
struct Tables {
    players: Vec<Player>,
    games: Vec<Game>,
    sets: Vec<GameSet>,
    next_player_id: PlayerId,
    next_game_id: i64,
    next_set_id: SetId,
}

impl Tables {
    fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    fn has_player(&self, id: PlayerId) -> bool {
        self.players.iter().any(|p| p.id == id)
    }
}

/// In-memory store implementation
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    /// Create a new, empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> crate::error::Result<RwLockReadGuard<'_, Tables>> {
        self.tables.read().map_err(|_| {
            TrackerError::Storage {
                message: "Failed to acquire tables read lock".to_string(),
            }
            .into()
        })
    }

    fn write(&self) -> crate::error::Result<RwLockWriteGuard<'_, Tables>> {
        self.tables.write().map_err(|_| {
            TrackerError::Storage {
                message: "Failed to acquire tables write lock".to_string(),
            }
            .into()
        })
    }
}

fn newest_first<T: Clone>(
    rows: &[T],
    key: impl Fn(&T) -> (chrono::DateTime<chrono::Utc>, i64),
    limit: usize,
) -> Vec<T> {
    let mut rows: Vec<T> = rows.to_vec();
    rows.sort_by(|a, b| key(b).cmp(&key(a)));
    rows.truncate(limit);
    rows
}

impl TrackerStore for InMemoryStore {
    fn insert_player(&self, player: NewPlayer) -> crate::error::Result<Player> {
        let mut tables = self.write()?;

        if tables.players.iter().any(|p| p.name == player.name) {
            return Err(TrackerError::DuplicatePlayer { name: player.name }.into());
        }

        tables.next_player_id += 1;
        let stored = Player {
            id: tables.next_player_id,
            name: player.name,
            email: player.email,
            department: player.department,
            games_rating: player.initial_rating,
            sets_rating: player.initial_rating,
            created_at: player.created_at,
        };
        tables.players.push(stored.clone());

        Ok(stored)
    }

    fn find_player(&self, id: PlayerId) -> crate::error::Result<Option<Player>> {
        let tables = self.read()?;
        Ok(tables.players.iter().find(|p| p.id == id).cloned())
    }

    fn find_player_by_name(&self, name: &str) -> crate::error::Result<Option<Player>> {
        let tables = self.read()?;
        Ok(tables.players.iter().find(|p| p.name == name).cloned())
    }

    fn list_players(&self) -> crate::error::Result<Vec<Player>> {
        let tables = self.read()?;
        Ok(tables.players.clone())
    }

    fn count_sets(&self, player_id: PlayerId, side: SetSide) -> crate::error::Result<u64> {
        let tables = self.read()?;
        let count = tables
            .sets
            .iter()
            .filter(|set| match side {
                SetSide::Winner => set.winner_id == player_id,
                SetSide::Loser => set.loser_id == player_id,
            })
            .count();
        Ok(count as u64)
    }

    fn recent_games(&self, limit: usize) -> crate::error::Result<Vec<Game>> {
        let tables = self.read()?;
        Ok(newest_first(&tables.games, |g| (g.created_at, g.id), limit))
    }

    fn recent_sets(&self, limit: usize) -> crate::error::Result<Vec<GameSet>> {
        let tables = self.read()?;
        Ok(newest_first(&tables.sets, |s| (s.created_at, s.id), limit))
    }

    fn find_set(&self, id: SetId) -> crate::error::Result<Option<GameSet>> {
        let tables = self.read()?;
        Ok(tables.sets.iter().find(|s| s.id == id).cloned())
    }

    fn games_in_set(&self, set_id: SetId) -> crate::error::Result<Vec<Game>> {
        let tables = self.read()?;
        Ok(tables
            .games
            .iter()
            .filter(|g| g.set_id == set_id)
            .cloned()
            .collect())
    }

    fn commit_set(&self, commit: SetCommit) -> crate::error::Result<RecordedSet> {
        let mut tables = self.write()?;

        // Check every reference before touching anything
        let referenced = std::iter::once(commit.set.winner_id)
            .chain(std::iter::once(commit.set.loser_id))
            .chain(
                commit
                    .games
                    .iter()
                    .flat_map(|g| [g.winner_id, g.loser_id, g.server_id]),
            )
            .chain(commit.rating_updates.iter().map(|u| u.player_id));
        for player_id in referenced {
            if !tables.has_player(player_id) {
                return Err(TrackerError::Storage {
                    message: format!("commit references unknown player id {}", player_id),
                }
                .into());
            }
        }

        tables.next_set_id += 1;
        let set = GameSet {
            id: tables.next_set_id,
            winner_id: commit.set.winner_id,
            loser_id: commit.set.loser_id,
            winner_rating: commit.set.winner_rating,
            loser_rating: commit.set.loser_rating,
            created_at: commit.set.created_at,
        };
        tables.sets.push(set.clone());

        let mut games = Vec::with_capacity(commit.games.len());
        for new_game in commit.games {
            tables.next_game_id += 1;
            let game = Game {
                id: tables.next_game_id,
                set_id: set.id,
                winner_id: new_game.winner_id,
                loser_id: new_game.loser_id,
                server_id: new_game.server_id,
                winner_score: new_game.winner_score,
                loser_score: new_game.loser_score,
                winner_rating: new_game.winner_rating,
                loser_rating: new_game.loser_rating,
                created_at: new_game.created_at,
            };
            tables.games.push(game.clone());
            games.push(game);
        }

        for update in commit.rating_updates {
            if let Some(player) = tables.player_mut(update.player_id) {
                match update.kind {
                    RatingKind::Games => player.games_rating = update.value,
                    RatingKind::Sets => player.sets_rating = update.value,
                }
            }
        }

        Ok(RecordedSet { set, games })
    }

    fn ping(&self) -> crate::error::Result<()> {
        self.read().map(|_| ())
    }
}
