//! Similar-listings recommendation route.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::warn;

use homewire_similar::{SimilarityEngine, UserPreferences, MAX_RESULTS};

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/listings/{id}/similar", get(get_similar))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarQuery {
    pub limit: Option<usize>,
    /// Comma-separated city names.
    pub cities: Option<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub listing_type: Option<String>,
    /// Comma-separated property type labels.
    pub property_types: Option<String>,
    /// Comma-separated bedroom counts.
    pub bedrooms: Option<String>,
    /// Comma-separated bathroom counts.
    pub bathrooms: Option<String>,
}

impl SimilarQuery {
    pub fn preferences(&self) -> Option<UserPreferences> {
        let prefs = UserPreferences {
            cities: split_list(self.cities.as_deref()),
            min_price: self.min_price,
            max_price: self.max_price,
            listing_type: self
                .listing_type
                .as_deref()
                .and_then(super::listings::parse_listing_type),
            property_types: super::listings::parse_property_types(self.property_types.as_deref()),
            bedrooms: split_numbers(self.bedrooms.as_deref()),
            bathrooms: split_numbers(self.bathrooms.as_deref()),
        };
        if prefs.is_empty() {
            None
        } else {
            Some(prefs)
        }
    }
}

fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|r| {
        r.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    })
    .unwrap_or_default()
}

fn split_numbers(raw: Option<&str>) -> Vec<u32> {
    raw.map(|r| {
        r.split(',')
            .filter_map(|s| s.trim().parse::<u32>().ok())
            .collect()
    })
    .unwrap_or_default()
}

async fn get_similar(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<SimilarQuery>,
) -> impl IntoResponse {
    let reference = match state.listings.get_by_id(&id).await {
        Ok(Some(listing)) => listing,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({ "error": format!("Listing {} not found", id) })),
            );
        }
        Err(e) => {
            warn!("Reference lookup failed for {}: {}", id, e);
            return (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({ "error": format!("Listing {} not found", id) })),
            );
        }
    };

    let prefs = query.preferences();
    let limit = query.limit.unwrap_or(MAX_RESULTS);
    let similar = SimilarityEngine::recommend(
        state.listings.as_ref(),
        &reference,
        prefs.as_ref(),
        limit,
    )
    .await;

    let count = similar.len();
    (
        StatusCode::OK,
        Json(serde_json::json!({ "similar": similar, "count": count })),
    )
}
