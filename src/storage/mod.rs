//! Persistence interface and implementations
//!
//! The tracker reads and writes players, games and sets only through
//! [`TrackerStore`]. Which implementation backs it is decided once, at
//! start-up, from configuration.

pub mod memory;
pub mod sqlite;

pub use memory::InMemoryStore;
pub use sqlite::SqliteStore;

use crate::config::DatabaseBackend;
use crate::types::{
    Game, GameSet, NewPlayer, Player, PlayerId, RecordedSet, SetCommit, SetId, SetSide,
};
use std::sync::Arc;

/// Trait for tracker storage operations
#[cfg_attr(test, mockall::automock)]
pub trait TrackerStore: Send + Sync {
    /// Register a player; fails with `DuplicatePlayer` if the name is taken
    fn insert_player(&self, player: NewPlayer) -> crate::error::Result<Player>;

    /// Get a player by id
    fn find_player(&self, id: PlayerId) -> crate::error::Result<Option<Player>>;

    /// Get a player by their unique name
    fn find_player_by_name(&self, name: &str) -> crate::error::Result<Option<Player>>;

    /// All players in creation order (ascending id)
    fn list_players(&self) -> crate::error::Result<Vec<Player>>;

    /// Number of sets a player finished on the given side of
    fn count_sets(&self, player_id: PlayerId, side: SetSide) -> crate::error::Result<u64>;

    /// Most recent games, newest first
    fn recent_games(&self, limit: usize) -> crate::error::Result<Vec<Game>>;

    /// Most recent sets, newest first
    fn recent_sets(&self, limit: usize) -> crate::error::Result<Vec<GameSet>>;

    /// Get a set by id
    fn find_set(&self, id: SetId) -> crate::error::Result<Option<GameSet>>;

    /// Games belonging to a set, in recording order
    fn games_in_set(&self, set_id: SetId) -> crate::error::Result<Vec<Game>>;

    /// Apply every write of one set submission as a unit.
    ///
    /// Either the set, all of its games and all rating updates land, or none
    /// do. An implementation that cannot undo writes already made must
    /// report `PartialWriteFailure` with the number that landed.
    fn commit_set(&self, commit: SetCommit) -> crate::error::Result<RecordedSet>;

    /// Cheap reachability check for health reporting
    fn ping(&self) -> crate::error::Result<()>;
}

/// Open the store selected by configuration
pub fn open_store(backend: &DatabaseBackend) -> crate::error::Result<Arc<dyn TrackerStore>> {
    let store: Arc<dyn TrackerStore> = match backend {
        DatabaseBackend::Memory => Arc::new(InMemoryStore::new()),
        DatabaseBackend::Sqlite(path) => Arc::new(SqliteStore::open(path)?),
    };
    Ok(store)
}
