//! Inventory Dashboards - Backend Server

use std::net::SocketAddr;

use inventory_dashboards::{create_app, AppState, Config, Snapshots};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inventory_dashboards=debug,shared=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting Inventory Dashboards Server");
    tracing::info!("Environment: {}", config.environment);

    // Build report bases from the configured snapshots
    let data = config.data.clone();
    let snapshots = tokio::task::spawn_blocking(move || Snapshots::load(&data)).await?;

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let app = create_app(AppState::new(config, snapshots));

    tracing::info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
