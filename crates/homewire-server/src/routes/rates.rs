//! Mortgage-rate route.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;

use crate::rates::fetch_posted_rate;
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/rates/mortgage", get(get_mortgage_rate))
}

async fn get_mortgage_rate(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let client = state.http.clone();
    let (rate, cached) = state
        .rate_cache
        .resolve(|| async move { fetch_posted_rate(&client).await })
        .await;

    Json(serde_json::json!({
        "rate": rate,
        "term": "5-year fixed",
        "cached": cached,
        "asOf": Utc::now().to_rfc3339(),
    }))
}
