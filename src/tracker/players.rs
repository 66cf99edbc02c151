//! Player registration and lookup

use crate::error::TrackerError;
use crate::metrics::MetricsCollector;
use crate::storage::TrackerStore;
use crate::types::{NewPlayer, Player, PlayerId};
use crate::utils::current_timestamp;
use std::sync::Arc;
use tracing::info;

/// Registers players and resolves names to records
#[derive(Clone)]
pub struct PlayerDirectory {
    store: Arc<dyn TrackerStore>,
    initial_rating: f64,
    metrics: Option<Arc<MetricsCollector>>,
}

impl PlayerDirectory {
    pub fn new(store: Arc<dyn TrackerStore>, initial_rating: f64) -> Self {
        Self {
            store,
            initial_rating,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<MetricsCollector>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Register a new player with both ratings at the initial value
    pub fn create_player(
        &self,
        name: &str,
        email: Option<&str>,
        department: Option<&str>,
    ) -> crate::error::Result<PlayerId> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TrackerError::invalid_input("player name cannot be empty").into());
        }

        let player = self.store.insert_player(NewPlayer {
            name: name.to_string(),
            email: non_blank(email),
            department: non_blank(department),
            initial_rating: self.initial_rating,
            created_at: current_timestamp(),
        })?;

        info!("Created player {} ({})", player.name, player.id);
        if let Some(metrics) = &self.metrics {
            metrics.record_player_created();
        }

        Ok(player.id)
    }

    pub fn lookup_player_id_by_name(&self, name: &str) -> crate::error::Result<Option<PlayerId>> {
        Ok(self.find_player(name)?.map(|p| p.id))
    }

    /// Names are matched the way `create_player` stores them, trimmed
    pub fn find_player(&self, name: &str) -> crate::error::Result<Option<Player>> {
        self.store.find_player_by_name(name.trim())
    }

    /// Resolve a name, failing with `PlayerNotFound` if nobody has it
    pub fn require_player(&self, name: &str) -> crate::error::Result<Player> {
        let name = name.trim();
        self.find_player(name)?
            .ok_or_else(|| {
                TrackerError::PlayerNotFound {
                    name: name.to_string(),
                }
                .into()
            })
    }

    /// All player names in alphabetical order, for the game entry form
    pub fn player_names(&self) -> crate::error::Result<Vec<String>> {
        let mut names: Vec<String> = self
            .store
            .list_players()?
            .into_iter()
            .map(|p| p.name)
            .collect();
        names.sort();
        Ok(names)
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
