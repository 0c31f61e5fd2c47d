//! API shape tests — validates that backend response shapes match what the
//! site frontend expects.
//!
//! These verify response field names and types as JSON, independent of any
//! live upstream feed or CRM.

/// Search response: { success, listings, total, error? }
#[test]
fn test_search_response_shape() {
    let response = serde_json::json!({
        "success": true,
        "listings": [
            {
                "id": "N5912345",
                "mlsNumber": "N5912345",
                "propertyType": "townhouse",
                "listingType": "sale",
                "status": "active",
                "address": "12 Maple St",
                "city": "Markham",
                "province": "ON",
                "postalCode": "L3R 0A1",
                "price": 900000,
                "bedrooms": 3,
                "bathrooms": 2,
                "sqft": 1500,
                "images": ["https://cdn.example.com/1.jpg"],
                "title": "Bright end-unit townhouse",
                "description": "Move-in ready.",
                "listingDate": "2026-08-01",
            }
        ],
        "total": 42,
    });

    assert!(response["success"].is_boolean());
    assert!(response["listings"].is_array());
    assert!(response["total"].is_number());

    let listing = &response["listings"][0];
    assert!(listing["id"].is_string());
    assert!(listing["propertyType"].is_string());
    assert!(listing["listingType"].is_string());
    assert!(listing["price"].is_number());
    assert!(listing["bedrooms"].is_number());
    assert!(listing["bathrooms"].is_number());
    assert!(listing["images"].is_array());
    assert!(listing["city"].is_string());
}

/// Degraded search response still carries the full shape.
#[test]
fn test_degraded_search_response_shape() {
    let response = serde_json::json!({
        "success": false,
        "listings": [],
        "total": 0,
        "error": "IDX feed not configured",
    });

    assert_eq!(response["success"], false);
    assert_eq!(response["listings"].as_array().map(|a| a.len()), Some(0));
    assert!(response["error"].is_string());
}

/// Similar-listings response: { similar, count }
#[test]
fn test_similar_response_shape() {
    let response = serde_json::json!({
        "similar": [
            { "id": "N100", "city": "Markham", "propertyType": "townhouse", "price": 950000 }
        ],
        "count": 1,
    });

    assert!(response["similar"].is_array());
    assert!(response["count"].is_number());
}

/// Lead submission success: { accepted, fallback, leadId, leadType, quality? }
#[test]
fn test_lead_outcome_shape() {
    let response = serde_json::json!({
        "accepted": true,
        "fallback": false,
        "leadId": "8c7de2b1-3f4a-4a6e-9b2d-1e5f6a7b8c9d",
        "leadType": "buyer",
        "quality": "hot",
    });

    assert!(response["accepted"].is_boolean());
    assert!(response["fallback"].is_boolean());
    assert!(response["leadId"].is_string());
    assert!(response["leadType"].is_string());
}

/// Lead validation failure: { accepted: false, errors: [{field, message}] }
#[test]
fn test_lead_validation_error_shape() {
    let response = serde_json::json!({
        "accepted": false,
        "errors": [
            { "field": "email", "message": "A valid email address is required" }
        ],
    });

    assert_eq!(response["accepted"], false);
    assert!(response["errors"].is_array());
    let error = &response["errors"][0];
    assert!(error["field"].is_string());
    assert!(error["message"].is_string());
}

/// Chat stream events are tagged by "type".
#[test]
fn test_chat_stream_event_shapes() {
    let context = serde_json::json!({
        "type": "context",
        "context": [
            { "id": "N100", "title": "T", "address": "A", "city": "Markham",
              "price": 900000, "bedrooms": 3, "bathrooms": 2, "propertyType": "townhouse" }
        ],
    });
    assert_eq!(context["type"], "context");
    assert!(context["context"].is_array());

    let token = serde_json::json!({ "type": "token", "content": "Hel" });
    assert_eq!(token["type"], "token");
    assert!(token["content"].is_string());

    let lead = serde_json::json!({
        "type": "leadCaptured",
        "leadId": "8c7de2b1",
        "fallback": true,
    });
    assert_eq!(lead["type"], "leadCaptured");
    assert!(lead["leadId"].is_string());
    assert!(lead["fallback"].is_boolean());

    let done = serde_json::json!({
        "type": "done",
        "model": "gpt-4o-mini",
        "tokensUsed": 120,
        "duration": 900,
    });
    assert_eq!(done["type"], "done");
    assert!(done["tokensUsed"].is_number());
}

/// Chat config response masks keys as booleans.
#[test]
fn test_chat_config_response_shape() {
    let response = serde_json::json!({
        "preferredProvider": "auto",
        "openaiConfigured": true,
        "anthropicConfigured": false,
        "openaiModel": "gpt-4o-mini",
        "anthropicModel": "claude-sonnet-4-20250514",
        "activeProvider": "openai",
    });

    assert!(response["openaiConfigured"].is_boolean());
    assert!(response["anthropicConfigured"].is_boolean());
    assert!(response.get("openaiApiKey").is_none());
    assert!(response.get("anthropicApiKey").is_none());
}

/// Mortgage-rate response: { rate, term, cached, asOf }
#[test]
fn test_rate_response_shape() {
    let response = serde_json::json!({
        "rate": 4.79,
        "term": "5-year fixed",
        "cached": true,
        "asOf": "2026-08-26T12:00:00Z",
    });

    assert!(response["rate"].is_number());
    assert!(response["term"].is_string());
    assert!(response["cached"].is_boolean());
    assert!(response["asOf"].is_string());
}

/// SEO filter response: { filters: [{slug, city, ...}], count }
#[test]
fn test_seo_filter_response_shape() {
    let response = serde_json::json!({
        "filters": [
            {
                "slug": "3-bedroom-condos-in-markham",
                "city": "Markham",
                "propertyType": "condo",
                "bedrooms": 3,
                "listingType": "sale",
            }
        ],
        "count": 18,
    });

    assert!(response["filters"].is_array());
    assert!(response["count"].is_number());
    let filter = &response["filters"][0];
    assert!(filter["slug"].is_string());
    assert!(filter["city"].is_string());
}

/// Cities response: { cities: [string] }
#[test]
fn test_cities_response_shape() {
    let response = serde_json::json!({ "cities": ["Markham", "Richmond Hill", "Vaughan"] });
    assert!(response["cities"].is_array());
    assert!(response["cities"][0].is_string());
}
