//! Snapshot handler - every request advances the replay by one tick

use std::sync::Arc;

use axum::{extract::State, Json};
use bagwatch_core::TickReport;

use crate::{AppResult, AppState};

/// Score every bag once and return the results
pub async fn snapshot(State(state): State<AppState>) -> AppResult<Json<TickReport>> {
    let engine = Arc::clone(&state.engine);

    // Scoring runs the model synchronously; keep it off the async workers
    let report = tokio::task::spawn_blocking(move || engine.lock().tick()).await??;

    tracing::debug!(bags = report.bags.len(), "Snapshot served");
    Ok(Json(report))
}
