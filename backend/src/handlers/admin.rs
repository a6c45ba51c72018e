//! Snapshot administration

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::services::snapshot::Snapshots;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub loaded_at: DateTime<Utc>,
    pub isv_rows: usize,
    pub stockout_rows: usize,
    pub loss_rows: usize,
    pub expiry_rows: usize,
}

impl From<&Snapshots> for ReloadResponse {
    fn from(snapshots: &Snapshots) -> Self {
        Self {
            loaded_at: snapshots.loaded_at,
            isv_rows: snapshots.isv.len(),
            stockout_rows: snapshots.stockout.len(),
            loss_rows: snapshots.losses.len(),
            expiry_rows: snapshots.expiry.len(),
        }
    }
}

/// Re-read every snapshot file and swap the report bases in
pub async fn reload_snapshots(State(state): State<AppState>) -> AppResult<Json<ReloadResponse>> {
    let data = state.config.data.clone();
    let snapshots = tokio::task::spawn_blocking(move || Snapshots::load(&data))
        .await
        .map_err(|e| AppError::Snapshot(format!("reload task failed: {}", e)))?;

    let response = ReloadResponse::from(&snapshots);
    state.snapshots.replace(snapshots);
    tracing::info!(loaded_at = %response.loaded_at, "snapshots reloaded");
    Ok(Json(response))
}
