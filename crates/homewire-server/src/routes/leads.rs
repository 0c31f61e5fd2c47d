//! Lead capture routes: contact form and project registration.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use homewire_crm::BoldTrailClient;
use homewire_leads::{ContactSubmission, RegistrationSubmission};

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/leads/contact", post(submit_contact))
        .route("/leads/register", post(submit_registration))
        .route("/leads/crm/status", get(crm_status))
        .route("/leads/fallback", get(fallback_entries))
}

async fn submit_contact(
    State(state): State<Arc<AppState>>,
    Json(submission): Json<ContactSubmission>,
) -> impl IntoResponse {
    match state.pipeline.submit_contact(submission).await {
        Ok(outcome) => (StatusCode::OK, Json(serde_json::json!(outcome))),
        Err(errors) => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "accepted": false, "errors": errors })),
        ),
    }
}

/// Leads that missed the CRM, for manual re-entry.
async fn fallback_entries(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let entries = state.pipeline.fallback_entries();
    let count = entries.len();
    Json(serde_json::json!({ "entries": entries, "count": count }))
}

/// Check CRM credentials without creating a contact.
async fn crm_status(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let client = BoldTrailClient::new(state.config.crm.clone());
    match client.test_credentials().await {
        Ok(()) => Json(serde_json::json!({ "connected": true })),
        Err(e) => Json(serde_json::json!({ "connected": false, "error": e.to_string() })),
    }
}

async fn submit_registration(
    State(state): State<Arc<AppState>>,
    Json(submission): Json<RegistrationSubmission>,
) -> impl IntoResponse {
    match state.pipeline.submit_registration(submission).await {
        Ok(outcome) => (StatusCode::OK, Json(serde_json::json!(outcome))),
        Err(errors) => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "accepted": false, "errors": errors })),
        ),
    }
}
