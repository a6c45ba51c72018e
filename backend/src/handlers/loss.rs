//! HTTP handlers for the loss tracking (perdas) endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use shared::models::loss::{
    ColdCutsLosses, LossBox, LossMenu, PreventiveAdjustment, ProduceLosses, SubgroupDetail,
    TotalLosses,
};
use shared::AggregateReport;

use crate::error::AppResult;
use crate::handlers::today;
use crate::services::loss::LossService;
use crate::AppState;

fn service(state: &AppState) -> LossService {
    LossService::new(state.snapshots.current().losses.clone(), &state.config.reports)
}

/// Event date range of the loss table
pub async fn get_loss_menu(State(state): State<AppState>) -> AppResult<Json<LossMenu>> {
    Ok(Json(service(&state).menu()))
}

/// Preventive adjustment totals per event
pub async fn get_preventive_adjustment(
    State(state): State<AppState>,
) -> AppResult<Json<PreventiveAdjustment>> {
    Ok(Json(service(&state).preventive_adjustment()))
}

/// Items of one subgroup; `|` in the label stands for `/`
pub async fn get_subgroup_detail(
    State(state): State<AppState>,
    Path(subgroup): Path<String>,
) -> AppResult<Json<SubgroupDetail>> {
    Ok(Json(service(&state).subgroup_detail(&subgroup)))
}

/// Loss totals per group and subgroup
pub async fn get_loss_by_group(State(state): State<AppState>) -> AppResult<Json<AggregateReport>> {
    Ok(Json(service(&state).loss_by_group()))
}

/// Negative stock events
pub async fn get_negative_stock(State(state): State<AppState>) -> AppResult<Json<LossBox>> {
    Ok(Json(service(&state).negative_stock()))
}

/// Produce (HF) losses
pub async fn get_produce_losses(State(state): State<AppState>) -> AppResult<Json<ProduceLosses>> {
    Ok(Json(service(&state).produce()))
}

/// Breakage and adjustment losses, overall and today
pub async fn get_total_losses(State(state): State<AppState>) -> AppResult<Json<TotalLosses>> {
    Ok(Json(service(&state).total_losses(today())))
}

/// Expiration losses outside produce and cold cuts
pub async fn get_expiration_losses(State(state): State<AppState>) -> AppResult<Json<LossBox>> {
    Ok(Json(service(&state).expiration()))
}

/// Cold cuts (RF) losses
pub async fn get_cold_cuts_losses(State(state): State<AppState>) -> AppResult<Json<ColdCutsLosses>> {
    Ok(Json(service(&state).cold_cuts()))
}
