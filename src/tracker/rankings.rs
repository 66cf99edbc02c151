//! Leaderboard and recent-activity views

use crate::metrics::MetricsCollector;
use crate::storage::TrackerStore;
use crate::types::{Game, GameSet, RankingRow, RecordedSet, SetId, SetSide};
use crate::utils::win_percentage;
use std::sync::Arc;
use tracing::debug;

/// Builds the leaderboard from stored players and set results
#[derive(Clone)]
pub struct RankingAggregator {
    store: Arc<dyn TrackerStore>,
    metrics: Option<Arc<MetricsCollector>>,
}

impl RankingAggregator {
    pub fn new(store: Arc<dyn TrackerStore>) -> Self {
        Self {
            store,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<MetricsCollector>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// One row per player, highest sets rating first.
    ///
    /// Players with equal sets ratings keep their creation order.
    pub fn compute_rankings(&self) -> crate::error::Result<Vec<RankingRow>> {
        let timer = self.metrics.as_ref().map(|metrics| metrics.start_timer());
        let players = self.store.list_players()?;

        let mut rows = Vec::with_capacity(players.len());
        for player in players {
            let wins = self.store.count_sets(player.id, SetSide::Winner)?;
            let losses = self.store.count_sets(player.id, SetSide::Loser)?;

            rows.push(RankingRow {
                name: player.name,
                wins,
                losses,
                win_percentage: win_percentage(wins, losses),
                department: player.department,
                sets_rating: player.sets_rating,
                games_rating: player.games_rating,
            });
        }

        rows.sort_by(|a, b| b.sets_rating.total_cmp(&a.sets_rating));

        debug!("Computed rankings for {} players", rows.len());
        if let (Some(metrics), Some(timer)) = (&self.metrics, timer) {
            metrics.record_rankings_computed(timer.stop());
        }

        Ok(rows)
    }

    pub fn recent_games(&self, limit: usize) -> crate::error::Result<Vec<Game>> {
        self.store.recent_games(limit)
    }

    pub fn recent_sets(&self, limit: usize) -> crate::error::Result<Vec<GameSet>> {
        self.store.recent_sets(limit)
    }

    /// A set with its games, or `None` if the id is unknown
    pub fn set_detail(&self, set_id: SetId) -> crate::error::Result<Option<RecordedSet>> {
        let Some(set) = self.store.find_set(set_id)? else {
            return Ok(None);
        };
        let games = self.store.games_in_set(set_id)?;
        Ok(Some(RecordedSet { set, games }))
    }
}
