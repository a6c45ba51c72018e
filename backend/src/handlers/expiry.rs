//! HTTP handlers for the expiration (vencimento) endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use shared::models::expiry::{ExpiryPage, ExpiryPrint};

use crate::error::AppResult;
use crate::handlers::{page_number, today};
use crate::services::expiry::{parse_max_days, ExpiryService};
use crate::services::export::CsvExport;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ExpiryQuery {
    pub filtro: Option<String>,
    pub dias_vencimento: Option<String>,
    pub page: Option<String>,
}

impl ExpiryQuery {
    fn filter(&self) -> &str {
        self.filtro.as_deref().unwrap_or("")
    }

    fn max_days(&self) -> Option<i64> {
        self.dias_vencimento.as_deref().and_then(parse_max_days)
    }

    fn page(&self) -> i64 {
        page_number(self.page.as_deref())
    }
}

fn service(state: &AppState) -> ExpiryService {
    ExpiryService::new(state.snapshots.current().expiry.clone(), &state.config.reports)
}

/// Filtered listing, soonest first
pub async fn get_expiry_page(
    State(state): State<AppState>,
    Query(query): Query<ExpiryQuery>,
) -> AppResult<Json<ExpiryPage>> {
    let page = service(&state).index(today(), query.filter(), query.max_days(), query.page());
    Ok(Json(page))
}

/// Listing by value at risk
pub async fn get_value_at_risk(
    State(state): State<AppState>,
    Query(query): Query<ExpiryQuery>,
) -> AppResult<Json<ExpiryPage>> {
    Ok(Json(service(&state).value_at_risk(today(), query.page())))
}

/// Lots expiring within the configured window
pub async fn get_expiring_soon(
    State(state): State<AppState>,
    Query(query): Query<ExpiryQuery>,
) -> AppResult<Json<ExpiryPage>> {
    Ok(Json(service(&state).expiring_soon(today(), query.page())))
}

/// Unpaginated filtered listing for printing
pub async fn print_expiry(
    State(state): State<AppState>,
    Query(query): Query<ExpiryQuery>,
) -> AppResult<Json<ExpiryPrint>> {
    Ok(Json(service(&state).print(today(), query.filter(), query.max_days())))
}

pub async fn export_expiry(
    State(state): State<AppState>,
    Query(query): Query<ExpiryQuery>,
) -> AppResult<CsvExport> {
    service(&state).export_filtered(today(), query.filter(), query.max_days())
}

pub async fn export_value_at_risk(State(state): State<AppState>) -> AppResult<CsvExport> {
    service(&state).export_value_at_risk(today())
}

pub async fn export_expiring_soon(State(state): State<AppState>) -> AppResult<CsvExport> {
    service(&state).export_expiring_soon(today())
}
