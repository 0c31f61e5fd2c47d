//! SEO filter-slug route.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use tracing::warn;

use homewire_listings::filter_slugs;

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/seo/filters", get(get_filter_slugs))
}

async fn get_filter_slugs(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let cities = match state.listings.distinct_cities().await {
        Ok(cities) => cities,
        Err(e) => {
            warn!("City index fetch failed for slug generation: {}", e);
            Vec::new()
        }
    };

    let slugs = filter_slugs(&cities);
    let count = slugs.len();
    Json(serde_json::json!({ "filters": slugs, "count": count }))
}
