//! Homewire — real-estate marketing backend server.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod rates;
mod routes;
mod state;

use state::AppState;

fn resolve_data_dir() -> PathBuf {
    std::env::var("HOMEWIRE_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let data_dir = resolve_data_dir();
    info!("Data directory: {}", data_dir.display());

    let config = homewire_core::HomewireConfig::from_env(&data_dir)?;
    let port = config.port;

    if !config.idx.is_configured() {
        warn!("IDX feed not configured; listing searches will return degraded results");
    }
    if !config.crm.is_configured() {
        warn!("CRM not configured; leads will go to the fallback log");
    }

    let state = Arc::new(AppState::from_config(config));

    // Drain notification-dispatch failures in the background
    if let Some(failure_rx) = state.pipeline.take_failure_rx() {
        homewire_leads::start_failure_drain(failure_rx);
    }

    let app = routes::build_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Homewire server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
