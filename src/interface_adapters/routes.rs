use crate::interface_adapters::net::{
    game_stats_handler, health_handler, mining_handler, purchase_upgrade_handler,
    resources_handler, upgrades_handler, ws_handler,
};
use crate::interface_adapters::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .route("/health", get(health_handler))
        .route("/api/resources", get(resources_handler))
        .route("/api/upgrades", get(upgrades_handler))
        .route("/api/upgrades/purchase", post(purchase_upgrade_handler))
        .route("/api/mining", post(mining_handler))
        .route("/api/game-stats", get(game_stats_handler))
        .with_state(state)
}
