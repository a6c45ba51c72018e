//! HTTP handlers for the stale inventory (ISV) endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use shared::ReportEnvelope;

use crate::error::AppResult;
use crate::services::export::CsvExport;
use crate::services::isv::IsvService;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct IsvQuery {
    pub search: Option<String>,
    #[serde(alias = "min_days")]
    pub dias: Option<String>,
}

impl IsvQuery {
    fn search(&self) -> &str {
        self.search.as_deref().unwrap_or("")
    }

    fn min_days(&self, state: &AppState) -> String {
        self.dias
            .clone()
            .unwrap_or_else(|| state.config.reports.default_min_days.to_string())
    }
}

fn service(state: &AppState) -> IsvService {
    IsvService::new(state.snapshots.current().isv.clone(), &state.config.reports)
}

/// Query stale inventory
pub async fn query_isv(
    State(state): State<AppState>,
    Query(query): Query<IsvQuery>,
) -> AppResult<Json<ReportEnvelope>> {
    let result = service(&state).query(query.search(), &query.min_days(&state));
    Ok(Json(result))
}

/// Export stale inventory with the same filters
pub async fn export_isv(
    State(state): State<AppState>,
    Query(query): Query<IsvQuery>,
) -> AppResult<CsvExport> {
    service(&state).export(query.search(), &query.min_days(&state))
}
