//! Inventory Dashboards - report server
//!
//! Serves stale inventory, loss, stock-out and expiration reports built from
//! periodic snapshot exports.

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod handlers;
pub mod loader;
pub mod routes;
pub mod services;

pub use config::Config;
pub use services::{SnapshotStore, Snapshots};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub snapshots: SnapshotStore,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config, snapshots: Snapshots) -> Self {
        Self {
            snapshots: SnapshotStore::new(snapshots),
            config: Arc::new(config),
        }
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .merge(routes::api_routes())
        .layer(CatchPanicLayer::custom(error::panic_response))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Inventory Dashboards API v1.0"
}
