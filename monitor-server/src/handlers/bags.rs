//! Bag listing, history and engine status handlers

use std::sync::Arc;

use axum::{extract::{Path, State}, Json};
use bagwatch_core::{EngineStatus, EntityHistory};

use crate::{AppResult, AppState};

/// Sorted bag ids
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<String>>> {
    let engine = Arc::clone(&state.engine);
    let ids = tokio::task::spawn_blocking(move || engine.lock().list_entities()).await?;
    Ok(Json(ids))
}

/// Recent scoring results for one bag; unknown ids get an empty list
pub async fn history(
    State(state): State<AppState>,
    Path(bag_id): Path<String>,
) -> AppResult<Json<EntityHistory>> {
    let engine = Arc::clone(&state.engine);
    let history = tokio::task::spawn_blocking(move || engine.lock().entity_history(&bag_id)).await?;
    Ok(Json(history))
}

/// Engine counters and model description
pub async fn status(State(state): State<AppState>) -> AppResult<Json<EngineStatus>> {
    let engine = Arc::clone(&state.engine);
    let status = tokio::task::spawn_blocking(move || engine.lock().status()).await?;
    Ok(Json(status))
}
