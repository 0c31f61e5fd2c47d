//! Listing search and detail routes.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::warn;

use homewire_listings::{ListingStatus, ListingType, PropertyType, SearchParams};

use crate::state::AppState;

const DEFAULT_PAGE_SIZE: usize = 24;
const MAX_PAGE_SIZE: usize = 100;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/listings", get(search_listings))
        .route("/listings/{id}", get(get_listing))
        .route("/cities", get(get_cities))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingQuery {
    pub city: Option<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<u32>,
    /// Comma-separated property type labels.
    pub property_types: Option<String>,
    pub listing_type: Option<String>,
    pub status: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl ListingQuery {
    pub fn into_params(self) -> SearchParams {
        SearchParams {
            city: self.city,
            min_price: self.min_price,
            max_price: self.max_price,
            min_bedrooms: self.bedrooms,
            min_bathrooms: self.bathrooms,
            property_types: parse_property_types(self.property_types.as_deref()),
            listing_type: self.listing_type.as_deref().and_then(parse_listing_type),
            status: self.status.as_deref().and_then(parse_status),
            limit: self
                .limit
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .clamp(1, MAX_PAGE_SIZE),
            offset: self.offset.unwrap_or(0),
        }
    }
}

pub(crate) fn parse_property_types(raw: Option<&str>) -> Vec<PropertyType> {
    let Some(raw) = raw else { return Vec::new() };
    raw.split(',')
        .filter_map(|label| match label.trim().to_lowercase().as_str() {
            "detached" => Some(PropertyType::Detached),
            "semi-detached" => Some(PropertyType::SemiDetached),
            "townhouse" => Some(PropertyType::Townhouse),
            "condo" => Some(PropertyType::Condo),
            _ => None,
        })
        .collect()
}

pub(crate) fn parse_listing_type(raw: &str) -> Option<ListingType> {
    match raw.to_lowercase().as_str() {
        "sale" => Some(ListingType::Sale),
        "lease" => Some(ListingType::Lease),
        _ => None,
    }
}

fn parse_status(raw: &str) -> Option<ListingStatus> {
    match raw.to_lowercase().as_str() {
        "active" => Some(ListingStatus::Active),
        "pending" => Some(ListingStatus::Pending),
        "sold" => Some(ListingStatus::Sold),
        _ => None,
    }
}

async fn search_listings(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListingQuery>,
) -> impl IntoResponse {
    let outcome = state.listings.search(&query.into_params()).await;
    Json(outcome)
}

async fn get_listing(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.listings.get_by_id(&id).await {
        Ok(Some(listing)) => (StatusCode::OK, Json(serde_json::json!({ "listing": listing }))),
        Ok(None) => not_found(&id),
        Err(e) => {
            warn!("Listing lookup failed for {}: {}", id, e);
            not_found(&id)
        }
    }
}

fn not_found(id: &str) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": format!("Listing {} not found", id) })),
    )
}

async fn get_cities(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let cities = match state.listings.distinct_cities().await {
        Ok(cities) => cities,
        Err(e) => {
            warn!("City index fetch failed: {}", e);
            Vec::new()
        }
    };
    Json(serde_json::json!({ "cities": cities }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_translation() {
        let query = ListingQuery {
            city: Some("Markham".into()),
            min_price: Some(500_000),
            max_price: None,
            bedrooms: Some(3),
            bathrooms: None,
            property_types: Some("condo, townhouse".into()),
            listing_type: Some("sale".into()),
            status: Some("active".into()),
            limit: Some(10),
            offset: Some(20),
        };
        let params = query.into_params();

        assert_eq!(params.city.as_deref(), Some("Markham"));
        assert_eq!(params.min_bedrooms, Some(3));
        assert_eq!(
            params.property_types,
            vec![PropertyType::Condo, PropertyType::Townhouse]
        );
        assert_eq!(params.listing_type, Some(ListingType::Sale));
        assert_eq!(params.status, Some(ListingStatus::Active));
        assert_eq!(params.limit, 10);
        assert_eq!(params.offset, 20);
    }

    #[test]
    fn test_limit_defaults_and_clamping() {
        let base = ListingQuery {
            city: None,
            min_price: None,
            max_price: None,
            bedrooms: None,
            bathrooms: None,
            property_types: None,
            listing_type: None,
            status: None,
            limit: None,
            offset: None,
        };
        assert_eq!(base.into_params().limit, DEFAULT_PAGE_SIZE);

        let big = ListingQuery {
            limit: Some(10_000),
            city: None,
            min_price: None,
            max_price: None,
            bedrooms: None,
            bathrooms: None,
            property_types: None,
            listing_type: None,
            status: None,
            offset: None,
        };
        assert_eq!(big.into_params().limit, MAX_PAGE_SIZE);
    }

    #[test]
    fn test_unknown_labels_ignored() {
        assert!(parse_property_types(Some("castle")).is_empty());
        assert_eq!(parse_listing_type("timeshare"), None);
        assert_eq!(parse_status("ghost"), None);
    }
}
