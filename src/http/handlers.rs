//! JSON request handlers
//!
//! Store access is synchronous, so every handler hands its work to the
//! blocking pool and maps tracker errors to status codes on the way out.

use crate::error::TrackerError;
use crate::service::{AppState, HealthCheck, HealthStatus};
use crate::types::{GameEntry, Score, SetId, SetSubmission};
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use prometheus::{Encoder, TextEncoder};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error};

/// Error returned from handlers
#[derive(Debug)]
pub enum ApiError {
    /// A requested resource does not exist
    NotFound(String),
    Tracker(anyhow::Error),
}

impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        ApiError::Tracker(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, "not_found", message),
            ApiError::Tracker(err) => match err.downcast_ref::<TrackerError>() {
                Some(e @ TrackerError::PlayerNotFound { .. }) => {
                    (StatusCode::NOT_FOUND, e.kind(), e.to_string())
                }
                Some(e @ TrackerError::InvalidInput { .. })
                | Some(e @ TrackerError::MalformedScore { .. }) => {
                    (StatusCode::UNPROCESSABLE_ENTITY, e.kind(), e.to_string())
                }
                Some(e @ TrackerError::DuplicatePlayer { .. }) => {
                    (StatusCode::CONFLICT, e.kind(), e.to_string())
                }
                other => {
                    error!("Request failed: {:#}", err);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        other.map(TrackerError::kind).unwrap_or("internal"),
                        "Internal server error".to_string(),
                    )
                }
            },
        };

        (status, Json(json!({ "error": message, "kind": kind }))).into_response()
    }
}

/// Run synchronous tracker work on the blocking pool
async fn blocking<T, F>(state: &Arc<AppState>, work: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&AppState) -> crate::error::Result<T> + Send + 'static,
{
    let state = state.clone();
    let result = tokio::task::spawn_blocking(move || work(state.as_ref())).await?;
    Ok(result?)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlayerRequest {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
}

/// One game as posted from the entry form; the score is still text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRequest {
    pub winner: String,
    pub server: String,
    pub score: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordSetRequest {
    pub player_one: String,
    pub player_two: String,
    pub games: Vec<GameRequest>,
}

impl RecordSetRequest {
    /// Parse scores and produce a submission for the recorder
    pub fn into_submission(self) -> crate::error::Result<SetSubmission> {
        let games = self
            .games
            .into_iter()
            .map(|game| -> crate::error::Result<GameEntry> {
                let score: Score = game.score.parse()?;
                Ok(GameEntry {
                    winner: game.winner,
                    server: game.server,
                    score,
                })
            })
            .collect::<crate::error::Result<Vec<_>>>()?;

        Ok(SetSubmission {
            player_one: self.player_one,
            player_two: self.player_two,
            games,
        })
    }
}

/// Dashboard: leaderboard plus the most recent games and sets
pub async fn dashboard_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let (rankings, games, sets) = blocking(&state, |app| {
        let limit = app.config().service.recent_limit;
        let rankings = app.compute_rankings()?;
        let games = app.rankings().recent_games(limit)?;
        let sets = app.rankings().recent_sets(limit)?;
        Ok((rankings, games, sets))
    })
    .await?;

    Ok(Json(json!({
        "rankings": rankings,
        "recent_games": games,
        "recent_sets": sets,
    })))
}

pub async fn rankings_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let rankings = blocking(&state, |app| app.compute_rankings()).await?;
    Ok(Json(rankings))
}

/// Player names for the game entry form
pub async fn list_players_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let names = blocking(&state, |app| app.players().player_names()).await?;
    Ok(Json(names))
}

pub async fn create_player_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreatePlayerRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = blocking(&state, move |app| {
        app.create_player(
            &request.name,
            request.email.as_deref(),
            request.department.as_deref(),
        )
    })
    .await?;

    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

pub async fn get_player_handler(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let lookup = name.clone();
    let player = blocking(&state, move |app| app.players().find_player(&lookup)).await?;

    player
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Player not found: {}", name)))
}

pub async fn record_set_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RecordSetRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let submission = request.into_submission()?;
    debug!(
        "Set submitted: {} vs {} ({} games)",
        submission.player_one,
        submission.player_two,
        submission.games.len()
    );

    let recorded = blocking(&state, move |app| app.record_set(&submission)).await?;
    Ok((StatusCode::CREATED, Json(recorded)))
}

pub async fn get_set_handler(
    State(state): State<Arc<AppState>>,
    Path(set_id): Path<SetId>,
) -> Result<impl IntoResponse, ApiError> {
    let detail = blocking(&state, move |app| app.rankings().set_detail(set_id)).await?;

    detail
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Set not found: {}", set_id)))
}

/// Health report; 503 when the store cannot be reached
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Response {
    debug!("Health check requested");

    let health = HealthCheck::check(&state).await;
    let status = match health.status {
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status, Json(health)).into_response()
}

/// Liveness probe: the service has started and not shut down
pub async fn alive_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    debug!("Liveness check requested");

    match HealthCheck::liveness_check(&state).await {
        HealthStatus::Healthy => (StatusCode::OK, "Alive"),
        _ => (StatusCode::SERVICE_UNAVAILABLE, "Not alive"),
    }
}

/// Readiness probe: running and the store answers
pub async fn ready_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    debug!("Readiness check requested");

    match HealthCheck::readiness_check(&state).await {
        HealthStatus::Healthy => (StatusCode::OK, "Ready"),
        HealthStatus::Degraded => (StatusCode::OK, "Degraded but ready"),
        HealthStatus::Unhealthy => (StatusCode::SERVICE_UNAVAILABLE, "Not ready"),
    }
}

/// Prometheus metrics endpoint handler
pub async fn metrics_handler(State(state): State<Arc<AppState>>) -> Response {
    debug!("Metrics endpoint requested");

    let metric_families = state.metrics().registry().gather();
    let encoder = TextEncoder::new();

    match encoder.encode_to_string(&metric_families) {
        Ok(output) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, encoder.format_type().to_string())],
            output,
        )
            .into_response(),
        Err(e) => {
            error!("Failed to encode metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to encode metrics".to_string(),
            )
                .into_response()
        }
    }
}
