//! HTTP route handlers.

pub mod chat;
pub mod leads;
pub mod listings;
pub mod rates;
pub mod seo;
pub mod similar;

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the main Axum router with all routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api", api_routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health))
        .merge(listings::routes())
        .merge(similar::routes())
        .merge(leads::routes())
        .merge(chat::routes())
        .merge(rates::routes())
        .merge(seo::routes())
}

async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "port": state.config.port,
        "idxConfigured": state.config.idx.is_configured(),
        "crmConfigured": state.config.crm.is_configured(),
    }))
}
