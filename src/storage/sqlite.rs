//! SQLite-backed tracker storage (rusqlite)
//!
//! The schema is created on open if missing. A set commit runs inside a
//! single transaction.

use crate::error::TrackerError;
use crate::storage::TrackerStore;
use crate::types::{
    Game, GameSet, NewPlayer, Player, PlayerId, RatingKind, RecordedSet, SetCommit, SetId,
    SetSide,
};
use anyhow::Context;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Transaction};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, error, info};

const PLAYER_COLUMNS: &str =
    "id, name, email, department, games_rating, sets_rating, created_at";
const SET_COLUMNS: &str = "id, winner_id, loser_id, winner_rating, loser_rating, created_at";
const GAME_COLUMNS: &str = "id, set_id, winner_id, loser_id, server_id, winner_score, loser_score, winner_rating, loser_rating, created_at";

/// SQLite store implementation
#[derive(Debug)]
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create the database file
    pub fn open(path: &Path) -> crate::error::Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database {}", path.display()))?;
        let store = Self::with_connection(conn)?;
        info!("Opened SQLite store at {}", path.display());
        Ok(store)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> crate::error::Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> crate::error::Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .context("Failed to enable foreign keys")?;
        conn.execute_batch(include_str!("schema.sql"))
            .context("Failed to create schema")?;
        debug!("Database schema ready");

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> crate::error::Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| {
            TrackerError::Storage {
                message: "Failed to acquire connection lock".to_string(),
            }
            .into()
        })
    }
}

fn parse_player_row(row: &rusqlite::Row) -> rusqlite::Result<Player> {
    Ok(Player {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        department: row.get(3)?,
        games_rating: row.get(4)?,
        sets_rating: row.get(5)?,
        created_at: row.get(6)?,
    })
}

fn parse_set_row(row: &rusqlite::Row) -> rusqlite::Result<GameSet> {
    Ok(GameSet {
        id: row.get(0)?,
        winner_id: row.get(1)?,
        loser_id: row.get(2)?,
        winner_rating: row.get(3)?,
        loser_rating: row.get(4)?,
        created_at: row.get(5)?,
    })
}

fn parse_game_row(row: &rusqlite::Row) -> rusqlite::Result<Game> {
    Ok(Game {
        id: row.get(0)?,
        set_id: row.get(1)?,
        winner_id: row.get(2)?,
        loser_id: row.get(3)?,
        server_id: row.get(4)?,
        winner_score: row.get(5)?,
        loser_score: row.get(6)?,
        winner_rating: row.get(7)?,
        loser_rating: row.get(8)?,
        created_at: row.get(9)?,
    })
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}

/// Run every statement of a commit, counting the writes that succeed
fn apply_commit(
    tx: &Transaction<'_>,
    commit: &SetCommit,
    completed: &mut usize,
) -> crate::error::Result<RecordedSet> {
    let sql = format!(
        "INSERT INTO sets (winner_id, loser_id, winner_rating, loser_rating, created_at) VALUES (?1, ?2, ?3, ?4, ?5) RETURNING {SET_COLUMNS}"
    );
    let set = tx
        .query_row(
            &sql,
            params![
                commit.set.winner_id,
                commit.set.loser_id,
                commit.set.winner_rating,
                commit.set.loser_rating,
                commit.set.created_at
            ],
            parse_set_row,
        )
        .context("Failed to insert set")?;
    *completed += 1;

    let sql = format!(
        "INSERT INTO games (set_id, winner_id, loser_id, server_id, winner_score, loser_score, winner_rating, loser_rating, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9) RETURNING {GAME_COLUMNS}"
    );
    let mut games = Vec::with_capacity(commit.games.len());
    for game in &commit.games {
        let stored = tx
            .query_row(
                &sql,
                params![
                    set.id,
                    game.winner_id,
                    game.loser_id,
                    game.server_id,
                    game.winner_score,
                    game.loser_score,
                    game.winner_rating,
                    game.loser_rating,
                    game.created_at
                ],
                parse_game_row,
            )
            .context("Failed to insert game")?;
        *completed += 1;
        games.push(stored);
    }

    for update in &commit.rating_updates {
        let sql = match update.kind {
            RatingKind::Games => "UPDATE players SET games_rating = ?1 WHERE id = ?2",
            RatingKind::Sets => "UPDATE players SET sets_rating = ?1 WHERE id = ?2",
        };
        let changed = tx
            .execute(sql, params![update.value, update.player_id])
            .with_context(|| format!("Failed to update {} rating", update.kind))?;
        if changed != 1 {
            return Err(TrackerError::Storage {
                message: format!("rating update matched no player with id {}", update.player_id),
            }
            .into());
        }
        *completed += 1;
    }

    Ok(RecordedSet { set, games })
}

impl TrackerStore for SqliteStore {
    fn insert_player(&self, player: NewPlayer) -> crate::error::Result<Player> {
        let conn = self.lock()?;
        let name = player.name.clone();
        let sql = format!(
            "INSERT INTO players (name, email, department, games_rating, sets_rating, created_at) VALUES (?1, ?2, ?3, ?4, ?4, ?5) RETURNING {PLAYER_COLUMNS}"
        );

        conn.query_row(
            &sql,
            params![
                player.name,
                player.email,
                player.department,
                player.initial_rating,
                player.created_at
            ],
            parse_player_row,
        )
        .map_err(|e| {
            if is_unique_violation(&e) {
                TrackerError::DuplicatePlayer { name }.into()
            } else {
                anyhow::Error::new(e).context("Failed to insert new player")
            }
        })
    }

    fn find_player(&self, id: PlayerId) -> crate::error::Result<Option<Player>> {
        let conn = self.lock()?;
        let sql = format!("SELECT {PLAYER_COLUMNS} FROM players WHERE id = ?1");

        conn.query_row(&sql, params![id], parse_player_row)
            .optional()
            .context("Failed to query player by id")
    }

    fn find_player_by_name(&self, name: &str) -> crate::error::Result<Option<Player>> {
        let conn = self.lock()?;
        let sql = format!("SELECT {PLAYER_COLUMNS} FROM players WHERE name = ?1");

        conn.query_row(&sql, params![name], parse_player_row)
            .optional()
            .context("Failed to query player by name")
    }

    fn list_players(&self) -> crate::error::Result<Vec<Player>> {
        let conn = self.lock()?;
        let sql = format!("SELECT {PLAYER_COLUMNS} FROM players ORDER BY id");

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], parse_player_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
    }

    fn count_sets(&self, player_id: PlayerId, side: SetSide) -> crate::error::Result<u64> {
        let conn = self.lock()?;
        let sql = match side {
            SetSide::Winner => "SELECT COUNT(*) FROM sets WHERE winner_id = ?1",
            SetSide::Loser => "SELECT COUNT(*) FROM sets WHERE loser_id = ?1",
        };

        let count: i64 = conn
            .query_row(sql, params![player_id], |row| row.get(0))
            .context("Failed to count sets for player")?;
        Ok(count as u64)
    }

    fn recent_games(&self, limit: usize) -> crate::error::Result<Vec<Game>> {
        let conn = self.lock()?;
        let sql = format!(
            "SELECT {GAME_COLUMNS} FROM games ORDER BY created_at DESC, id DESC LIMIT ?1"
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![limit as i64], parse_game_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
    }

    fn recent_sets(&self, limit: usize) -> crate::error::Result<Vec<GameSet>> {
        let conn = self.lock()?;
        let sql = format!(
            "SELECT {SET_COLUMNS} FROM sets ORDER BY created_at DESC, id DESC LIMIT ?1"
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![limit as i64], parse_set_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
    }

    fn find_set(&self, id: SetId) -> crate::error::Result<Option<GameSet>> {
        let conn = self.lock()?;
        let sql = format!("SELECT {SET_COLUMNS} FROM sets WHERE id = ?1");

        conn.query_row(&sql, params![id], parse_set_row)
            .optional()
            .context("Failed to query set by id")
    }

    fn games_in_set(&self, set_id: SetId) -> crate::error::Result<Vec<Game>> {
        let conn = self.lock()?;
        let sql = format!("SELECT {GAME_COLUMNS} FROM games WHERE set_id = ?1 ORDER BY id");

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![set_id], parse_game_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
    }

    fn commit_set(&self, commit: SetCommit) -> crate::error::Result<RecordedSet> {
        let mut conn = self.lock()?;
        let tx = conn.transaction().context("Failed to begin transaction")?;

        let mut completed = 0;
        match apply_commit(&tx, &commit, &mut completed) {
            Ok(recorded) => {
                tx.commit().context("Failed to commit set")?;
                debug!(
                    "Committed set {} with {} write(s)",
                    recorded.set.id,
                    commit.write_count()
                );
                Ok(recorded)
            }
            Err(e) => {
                if let Err(rollback_err) = tx.rollback() {
                    error!(
                        "Rollback failed after {} write(s): {}",
                        completed, rollback_err
                    );
                    return Err(TrackerError::PartialWriteFailure {
                        completed,
                        reason: format!("{:#}; rollback failed: {}", e, rollback_err),
                    }
                    .into());
                }
                Err(e)
            }
        }
    }

    fn ping(&self) -> crate::error::Result<()> {
        let conn = self.lock()?;
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
            .context("Database ping failed")?;
        Ok(())
    }
}
