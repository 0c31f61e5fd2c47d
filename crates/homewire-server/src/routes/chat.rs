//! Chat assistant routes — listing-aware LLM streaming and lead capture.

use std::convert::Infallible;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::sse::{Event, Sse};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use futures::Stream;
use tokio_stream::StreamExt;
use tracing::info;

use homewire_chat::{
    build_messages, extract_contact, extract_preferences, providers, ChatConfigUpdate,
    ChatRequest, ListingContext, StreamChunk, StreamEvent, TestKeyRequest,
};
use homewire_leads::ContactSubmission;
use homewire_listings::{ListingStatus, SearchParams};

use crate::state::AppState;

type SseStream = Pin<Box<dyn Stream<Item = Result<Event, Infallible>> + Send>>;

const CONTEXT_LIMIT: usize = 5;
const CHAT_LEAD_SOURCE: &str = "ai-chat";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/chat/status", get(get_status))
        .route("/chat", post(chat))
        .route("/chat/stream", post(stream_chat))
        .route("/chat/config", get(get_config).put(update_config))
        .route("/chat/config/test", post(test_key))
}

// ---------------------------------------------------------------
// Status
// ---------------------------------------------------------------

async fn get_status(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let config = state.chat_config.read();
    let resolved = config.resolve_provider();

    Json(serde_json::json!({
        "llmAvailable": resolved.is_some(),
        "llmProvider": resolved.as_ref().map(|(p, _, _)| p.to_string()),
        "defaultModel": resolved.as_ref().map(|(_, m, _)| m.clone()),
        "listingSource": state.listings.source_name(),
    }))
}

// ---------------------------------------------------------------
// Non-streaming chat
// ---------------------------------------------------------------

async fn chat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> impl IntoResponse {
    let start = Instant::now();

    let resolved = {
        let config = state.chat_config.read();
        config.resolve_provider()
    };
    let (provider, model, api_key) = match resolved {
        Some(resolved) => resolved,
        None => {
            return (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({ "error": "No LLM provider configured" })),
            );
        }
    };

    let context = if req.use_listings {
        build_listing_context(&state, &req.message).await
    } else {
        Vec::new()
    };

    let messages = build_messages(&req.conversation_history, &req.message, &context);
    let temperature = req.temperature.unwrap_or(0.7);
    let max_tokens = req.max_tokens.unwrap_or(1024);

    // Capture up front so a mid-stream LLM failure cannot drop the lead.
    let lead = capture_chat_lead(&state, &req.message).await;

    let stream = providers::stream_llm(
        &state.http, provider, messages,
        &model, &api_key,
        temperature, max_tokens,
    );
    tokio::pin!(stream);

    let mut full_response = String::new();
    let mut tokens_used = 0;

    while let Some(chunk) = stream.next().await {
        match chunk {
            StreamChunk::Token(text) => full_response.push_str(&text),
            StreamChunk::Done { tokens_used: t } => tokens_used = t,
            StreamChunk::Error(e) => {
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({ "error": e, "leadCaptured": lead })),
                );
            }
        }
    }

    let duration = start.elapsed().as_millis() as u64;

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "message": full_response,
            "model": model,
            "context": if context.is_empty() { None } else { Some(&context) },
            "leadCaptured": lead,
            "tokensUsed": tokens_used,
            "duration": duration,
        })),
    )
}

// ---------------------------------------------------------------
// Streaming chat (SSE)
// ---------------------------------------------------------------

async fn stream_chat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> Sse<SseStream> {
    let start = Instant::now();

    let resolved = {
        let config = state.chat_config.read();
        config.resolve_provider()
    };
    let (provider, model, api_key) = match resolved {
        Some(r) => r,
        None => {
            let error_stream: SseStream = Box::pin(async_stream::stream! {
                let event = StreamEvent::Error {
                    error: "No LLM provider configured".into(),
                };
                yield Ok::<_, Infallible>(Event::default().data(
                    serde_json::to_string(&event).unwrap()
                ));
            });
            return Sse::new(error_stream);
        }
    };

    let context = if req.use_listings {
        build_listing_context(&state, &req.message).await
    } else {
        Vec::new()
    };

    let messages = build_messages(&req.conversation_history, &req.message, &context);
    let temperature = req.temperature.unwrap_or(0.7);
    let max_tokens = req.max_tokens.unwrap_or(1024);

    let llm_stream = providers::stream_llm(
        &state.http, provider, messages,
        &model, &api_key,
        temperature, max_tokens,
    );

    // Capture up front so a mid-stream LLM failure cannot drop the lead;
    // the event itself is still emitted in order, before done/error.
    let lead_event = capture_chat_lead(&state, &req.message).await;

    let events = chat_events(llm_stream, context, lead_event, model, start);
    let sse_stream: SseStream = Box::pin(
        events.map(|data| Ok::<_, Infallible>(Event::default().data(data))),
    );

    Sse::new(sse_stream)
}

/// Turn LLM stream chunks into serialized SSE payloads. The lead event,
/// when present, goes out before the terminal done/error event either way.
fn chat_events<S>(
    llm: S,
    context: Vec<ListingContext>,
    lead_event: Option<StreamEvent>,
    model: String,
    start: Instant,
) -> impl Stream<Item = String> + Send
where
    S: Stream<Item = StreamChunk> + Send + 'static,
{
    async_stream::stream! {
        if !context.is_empty() {
            let event = StreamEvent::Context { context };
            yield serde_json::to_string(&event).unwrap();
        }

        let mut lead_event = lead_event;
        tokio::pin!(llm);
        while let Some(chunk) = llm.next().await {
            match chunk {
                StreamChunk::Token(text) => {
                    let event = StreamEvent::Token { content: text };
                    yield serde_json::to_string(&event).unwrap();
                }
                StreamChunk::Done { tokens_used } => {
                    if let Some(event) = lead_event.take() {
                        yield serde_json::to_string(&event).unwrap();
                    }

                    let duration = start.elapsed().as_millis() as u64;
                    let event = StreamEvent::Done {
                        model: model.clone(),
                        tokens_used,
                        duration,
                    };
                    yield serde_json::to_string(&event).unwrap();
                    yield "[DONE]".to_string();
                    return;
                }
                StreamChunk::Error(e) => {
                    if let Some(event) = lead_event.take() {
                        yield serde_json::to_string(&event).unwrap();
                    }
                    let event = StreamEvent::Error { error: e };
                    yield serde_json::to_string(&event).unwrap();
                    return;
                }
            }
        }
    }
}

// ---------------------------------------------------------------
// Config
// ---------------------------------------------------------------

async fn get_config(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let config = state.chat_config.read();
    Json(serde_json::to_value(config.to_response()).unwrap_or_default())
}

async fn update_config(
    State(state): State<Arc<AppState>>,
    Json(update): Json<ChatConfigUpdate>,
) -> impl IntoResponse {
    let mut config = state.chat_config.write();
    config.apply_update(&update);

    if let Err(e) = config.save() {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": format!("Failed to save config: {}", e) })),
        );
    }

    (
        StatusCode::OK,
        Json(serde_json::to_value(config.to_response()).unwrap_or_default()),
    )
}

async fn test_key(Json(req): Json<TestKeyRequest>) -> impl IntoResponse {
    match providers::test_api_key(&req.provider, &req.api_key).await {
        Ok(()) => (StatusCode::OK, Json(serde_json::json!({ "success": true }))),
        Err(e) => (
            StatusCode::OK,
            Json(serde_json::json!({ "success": false, "error": e })),
        ),
    }
}

// ---------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------

/// Parse the visitor message for preferences and fetch matching listings
/// as conversation context.
async fn build_listing_context(state: &AppState, message: &str) -> Vec<ListingContext> {
    let cities = state.listings.distinct_cities().await.unwrap_or_default();
    let prefs = extract_preferences(message, &cities);
    if prefs.is_empty() {
        return Vec::new();
    }

    let params = SearchParams {
        city: prefs.cities.first().cloned(),
        min_price: prefs.min_price,
        max_price: prefs.max_price,
        min_bedrooms: prefs.min_bedrooms(),
        min_bathrooms: prefs.min_bathrooms(),
        property_types: prefs.property_types.clone(),
        listing_type: prefs.listing_type,
        status: Some(ListingStatus::Active),
        limit: CONTEXT_LIMIT,
        offset: 0,
    };

    let outcome = state.listings.search(&params).await;
    if !outcome.success {
        return Vec::new();
    }

    outcome
        .listings
        .into_iter()
        .map(|l| ListingContext {
            id: l.id,
            title: l.title,
            address: l.address,
            city: l.city,
            price: l.price,
            bedrooms: l.bedrooms,
            bathrooms: l.bathrooms,
            property_type: l.property_type.label().to_string(),
        })
        .collect()
}

/// Scan the message for contact details; a found email becomes a lead
/// submission through the standard pipeline.
async fn capture_chat_lead(state: &AppState, message: &str) -> Option<StreamEvent> {
    let contact = extract_contact(message);
    let email = contact.email?;

    let submission = ContactSubmission {
        first_name: "Chat".into(),
        last_name: "Visitor".into(),
        email,
        phone: contact.phone,
        reason: "general".into(),
        message: message.to_string(),
        source: CHAT_LEAD_SOURCE.into(),
    };

    match state.pipeline.submit_contact(submission).await {
        Ok(outcome) => {
            info!("Captured chat lead {} (fallback={})", outcome.lead_id, outcome.fallback);
            Some(StreamEvent::LeadCaptured {
                lead_id: outcome.lead_id,
                fallback: outcome.fallback,
            })
        }
        Err(_) => None,
    }
}
