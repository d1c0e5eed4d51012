use crate::domain::Ore;
use crate::interface_adapters::http::{ApiError, error_response, map_ledger_error};
use crate::interface_adapters::protocol::{
    GameStatsDto, HealthResponse, MiningRequest, PurchaseUpgradeRequest, PurchaseUpgradeResponse,
    ResourcesDto, UpgradeDto,
};
use crate::interface_adapters::state::AppState;

use axum::{
    extract::{Json, State},
    http::StatusCode,
};
use std::sync::Arc;
use tracing::info;

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn resources_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ResourcesDto>, ApiError> {
    let snapshot = state.ledger.snapshot().await.map_err(map_ledger_error)?;
    Ok(Json(snapshot.ledger.into()))
}

pub async fn upgrades_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<UpgradeDto>>, ApiError> {
    let snapshot = state.ledger.snapshot().await.map_err(map_ledger_error)?;
    Ok(Json(UpgradeDto::catalog(&snapshot)))
}

pub async fn purchase_upgrade_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<PurchaseUpgradeRequest>,
) -> Result<Json<PurchaseUpgradeResponse>, ApiError> {
    let upgrade_id = payload.upgrade_id.trim();
    if upgrade_id.is_empty() {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            "upgrade_id is required",
        ));
    }

    let updated = state
        .ledger
        .purchase_upgrade(upgrade_id)
        .await
        .map_err(map_ledger_error)?;

    Ok(Json(PurchaseUpgradeResponse {
        resources: updated.ledger.into(),
        upgrades: UpgradeDto::catalog(&updated),
    }))
}

// Deposits ore mined outside a server-side session.
pub async fn mining_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<MiningRequest>,
) -> Result<Json<ResourcesDto>, ApiError> {
    let ore = Ore::from(payload);
    let ledger = state.ledger.deposit(&ore).await.map_err(map_ledger_error)?;
    info!(amount = ore.total(), "mining deposit accepted");
    Ok(Json(ledger.into()))
}

pub async fn game_stats_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<GameStatsDto>, ApiError> {
    let stats = state.ledger.game_stats().await.map_err(map_ledger_error)?;
    Ok(Json(stats.into()))
}
