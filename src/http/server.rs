//! HTTP server for the tracker API
//!
//! Serves the JSON API together with the health and Prometheus endpoints
//! on a single listener using Axum.

use crate::http::handlers::{
    alive_handler, create_player_handler, dashboard_handler, get_player_handler,
    get_set_handler, health_handler, list_players_handler, metrics_handler, rankings_handler,
    ready_handler, record_set_handler,
};
use crate::service::AppState;
use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing::{info, warn};

/// Build the router with every tracker route
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(dashboard_handler))
        .route("/rankings", get(rankings_handler))
        .route("/players", get(list_players_handler).post(create_player_handler))
        .route("/players/{name}", get(get_player_handler))
        .route("/sets", post(record_set_handler))
        .route("/sets/{id}", get(get_set_handler))
        .route("/health", get(health_handler))
        .route("/health/live", get(alive_handler))
        .route("/health/ready", get(ready_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

/// HTTP server bound to the configured address
pub struct HttpServer {
    address: String,
    state: Arc<AppState>,
    shutdown_tx: broadcast::Sender<()>,
}

impl HttpServer {
    pub fn new(state: Arc<AppState>) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            address: state.config().http_address(),
            state,
            shutdown_tx,
        }
    }

    /// Serve until `stop` is called
    pub async fn start(&self) -> Result<()> {
        let addr: SocketAddr = self
            .address
            .parse()
            .with_context(|| format!("Invalid HTTP address: {}", self.address))?;

        let app = create_router(self.state.clone());
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;

        info!("HTTP server listening on http://{}", addr);

        let mut shutdown_rx = self.shutdown_tx.subscribe();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
                info!("HTTP server shutdown signal received");
            })
            .await?;

        info!("HTTP server stopped");
        Ok(())
    }

    pub fn stop(&self) {
        info!("Stopping HTTP server...");

        if let Err(e) = self.shutdown_tx.send(()) {
            warn!("Failed to send shutdown signal to HTTP server: {}", e);
        }
    }
}
