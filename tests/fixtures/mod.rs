//! Test fixtures shared by the integration tests

#![allow(dead_code)]

use gametracker::config::AppConfig;
use gametracker::error::{Result, TrackerError};
use gametracker::service::AppState;
use gametracker::storage::{InMemoryStore, SqliteStore, TrackerStore};
use gametracker::types::{
    Game, GameEntry, GameSet, NewPlayer, Player, PlayerId, RecordedSet, Score, SetCommit, SetId,
    SetSide, SetSubmission,
};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

static DB_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// A database path in the temp dir that is removed on drop
pub struct TempDatabase {
    pub path: PathBuf,
}

impl TempDatabase {
    pub fn new(label: &str) -> Self {
        let path = std::env::temp_dir().join(format!(
            "gametracker-it-{}-{}-{}.db",
            label,
            std::process::id(),
            DB_COUNTER.fetch_add(1, Ordering::SeqCst)
        ));
        let _ = std::fs::remove_file(&path);
        Self { path }
    }

    pub fn url(&self) -> String {
        format!("sqlite://{}", self.path.display())
    }

    pub fn open(&self) -> Arc<SqliteStore> {
        Arc::new(SqliteStore::open(&self.path).expect("Failed to open sqlite store"))
    }
}

impl Drop for TempDatabase {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Config that starts every player at the given rating
pub fn config_with_rating(initial_rating: f64) -> AppConfig {
    let mut config = AppConfig::default();
    config.rating.initial_rating = initial_rating;
    config
}

pub fn app_with_store(store: Arc<dyn TrackerStore>, initial_rating: f64) -> AppState {
    AppState::with_store(config_with_rating(initial_rating), store)
        .expect("Failed to build app state")
}

pub fn memory_app(initial_rating: f64) -> AppState {
    app_with_store(Arc::new(InMemoryStore::new()), initial_rating)
}

pub fn game(winner: &str, server: &str, score: &str) -> GameEntry {
    GameEntry {
        winner: winner.to_string(),
        server: server.to_string(),
        score: score.parse::<Score>().expect("Invalid fixture score"),
    }
}

pub fn set_between(one: &str, two: &str, games: Vec<GameEntry>) -> SetSubmission {
    SetSubmission {
        player_one: one.to_string(),
        player_two: two.to_string(),
        games,
    }
}

/// A small office league: four players and four sets
pub fn play_league(app: &AppState) -> Result<Vec<RecordedSet>> {
    app.create_player("Alice", Some("alice@example.com"), Some("Engineering"))?;
    app.create_player("Bob", None, Some("Sales"))?;
    app.create_player("Carol", None, None)?;
    app.create_player("Dave", None, Some("Engineering"))?;

    let sets = vec![
        set_between(
            "Alice",
            "Bob",
            vec![game("Alice", "Alice", "21-15"), game("Alice", "Bob", "21-19")],
        ),
        set_between(
            "Carol",
            "Alice",
            vec![
                game("Carol", "Carol", "21-18"),
                game("Alice", "Alice", "21-10"),
                game("Carol", "Carol", "22-20"),
            ],
        ),
        set_between(
            "Bob",
            "Carol",
            vec![game("Bob", "Bob", "21-7"), game("Bob", "Carol", "21-12")],
        ),
        set_between(
            "Alice",
            "Bob",
            vec![game("Bob", "Alice", "21-17"), game("Alice", "Bob", "21-16")],
        ),
    ];

    sets.iter().map(|set| app.record_set(set)).collect()
}

/// Store that delegates everything but refuses to commit sets
pub struct RejectingStore {
    inner: InMemoryStore,
    pub commit_attempts: AtomicUsize,
}

impl RejectingStore {
    pub fn new() -> Self {
        Self {
            inner: InMemoryStore::new(),
            commit_attempts: AtomicUsize::new(0),
        }
    }
}

impl TrackerStore for RejectingStore {
    fn insert_player(&self, player: NewPlayer) -> Result<Player> {
        self.inner.insert_player(player)
    }

    fn find_player(&self, id: PlayerId) -> Result<Option<Player>> {
        self.inner.find_player(id)
    }

    fn find_player_by_name(&self, name: &str) -> Result<Option<Player>> {
        self.inner.find_player_by_name(name)
    }

    fn list_players(&self) -> Result<Vec<Player>> {
        self.inner.list_players()
    }

    fn count_sets(&self, player_id: PlayerId, side: SetSide) -> Result<u64> {
        self.inner.count_sets(player_id, side)
    }

    fn recent_games(&self, limit: usize) -> Result<Vec<Game>> {
        self.inner.recent_games(limit)
    }

    fn recent_sets(&self, limit: usize) -> Result<Vec<GameSet>> {
        self.inner.recent_sets(limit)
    }

    fn find_set(&self, id: SetId) -> Result<Option<GameSet>> {
        self.inner.find_set(id)
    }

    fn games_in_set(&self, set_id: SetId) -> Result<Vec<Game>> {
        self.inner.games_in_set(set_id)
    }

    fn commit_set(&self, commit: SetCommit) -> Result<RecordedSet> {
        self.commit_attempts.fetch_add(1, Ordering::SeqCst);
        Err(TrackerError::PartialWriteFailure {
            completed: 0,
            reason: format!("refused {} writes", commit.write_count()),
        }
        .into())
    }

    fn ping(&self) -> Result<()> {
        self.inner.ping()
    }
}
