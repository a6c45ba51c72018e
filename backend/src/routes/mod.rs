//! Route definitions for the inventory dashboards

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create report routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Stale inventory query used by the dashboard home
        .route("/api/controle-isv", get(handlers::query_isv))
        .nest("/controle-isv", isv_routes())
        .nest("/controle-perdas", loss_routes())
        .nest("/controle-ruptura", stockout_routes())
        .nest("/controle-vencimento", expiry_routes())
        .nest("/admin", admin_routes())
}

/// Stale inventory (ISV) routes
fn isv_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::query_isv))
        .route("/export", get(handlers::export_isv))
}

/// Loss tracking (perdas) routes
fn loss_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::get_loss_menu))
        .route("/controle_de_perdas", get(handlers::get_loss_menu))
        .route("/menu", get(handlers::get_loss_menu))
        .route("/ajustepreventiva", get(handlers::get_preventive_adjustment))
        .route(
            "/ajustepreventiva/subgrupo/:subgrupo",
            get(handlers::get_subgroup_detail),
        )
        .route("/perdaporgrupo", get(handlers::get_loss_by_group))
        .route("/subgrupo/:subgrupo", get(handlers::get_subgroup_detail))
        .route("/negativo", get(handlers::get_negative_stock))
        .route("/perda_hf", get(handlers::get_produce_losses))
        .route("/totalperdas", get(handlers::get_total_losses))
        .route("/perda_vencimento", get(handlers::get_expiration_losses))
        .route("/perdafrios", get(handlers::get_cold_cuts_losses))
}

/// Stock-out (ruptura) routes
fn stockout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::get_stockout_page))
        .route("/imprimir", get(handlers::print_stockout))
        .route("/export", get(handlers::export_stockout))
        .route("/api/grupos", get(handlers::list_stockout_groups))
        .route("/api/group-stats", get(handlers::get_stockout_group_stats))
}

/// Expiration (vencimento) routes
fn expiry_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::get_expiry_page))
        .route("/valoravencer", get(handlers::get_value_at_risk))
        .route("/valoravencer/exportar", get(handlers::export_value_at_risk))
        .route("/imprimir", get(handlers::print_expiry))
        .route("/vencendo45", get(handlers::get_expiring_soon))
        .route("/vencendo45/exportar", get(handlers::export_expiring_soon))
        .route("/exportar", get(handlers::export_expiry))
}

/// Snapshot administration routes
fn admin_routes() -> Router<AppState> {
    Router::new().route("/reload", post(handlers::reload_snapshots))
}
