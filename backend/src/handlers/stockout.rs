//! HTTP handlers for the stock-out (ruptura) endpoints

use std::collections::BTreeMap;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use shared::models::stockout::{GroupStats, StockoutPage, StockoutPrint};

use crate::error::AppResult;
use crate::handlers::page_number;
use crate::services::export::CsvExport;
use crate::services::stockout::StockoutService;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct StockoutQuery {
    #[serde(alias = "group")]
    pub grupo: Option<String>,
    pub page: Option<String>,
    pub include_grupo: Option<String>,
}

impl StockoutQuery {
    fn group(&self) -> &str {
        self.grupo.as_deref().unwrap_or("")
    }

    fn include_group(&self) -> bool {
        self.include_grupo
            .as_deref()
            .is_some_and(|flag| flag.trim().eq_ignore_ascii_case("true"))
    }
}

fn service(state: &AppState) -> StockoutService {
    StockoutService::new(state.snapshots.current().stockout.clone(), &state.config.reports)
}

/// Paginated stock-out listing
pub async fn get_stockout_page(
    State(state): State<AppState>,
    Query(query): Query<StockoutQuery>,
) -> AppResult<Json<StockoutPage>> {
    let page = page_number(query.page.as_deref());
    Ok(Json(service(&state).index(query.group(), page)))
}

/// Unpaginated listing for printing
pub async fn print_stockout(
    State(state): State<AppState>,
    Query(query): Query<StockoutQuery>,
) -> AppResult<Json<StockoutPrint>> {
    Ok(Json(service(&state).print(query.group())))
}

/// Delimited export of one group or all of them
pub async fn export_stockout(
    State(state): State<AppState>,
    Query(query): Query<StockoutQuery>,
) -> AppResult<CsvExport> {
    service(&state).export(query.group(), query.include_group())
}

/// Distinct groups
pub async fn list_stockout_groups(State(state): State<AppState>) -> AppResult<Json<Vec<String>>> {
    Ok(Json(service(&state).groups()))
}

/// Per-group statistics
pub async fn get_stockout_group_stats(
    State(state): State<AppState>,
) -> AppResult<Json<BTreeMap<String, GroupStats>>> {
    Ok(Json(service(&state).group_stats()))
}
