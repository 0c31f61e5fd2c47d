//! BoldTrail (kvCORE) contact API client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::{debug, info};

use homewire_core::UpstreamConfig;

use crate::types::{ContactRecord, CrmContactResponse, CrmError, CrmSink};

/// BoldTrail client. Contacts are upserted by email on the CRM side, so a
/// repeat submission updates the existing record.
pub struct BoldTrailClient {
    client: Client,
    config: UpstreamConfig,
}

impl BoldTrailClient {
    pub fn new(config: UpstreamConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .unwrap_or_default();
        Self { client, config }
    }

    /// Minimal authenticated request, used by the config surface to check
    /// credentials without creating a contact.
    pub async fn test_credentials(&self) -> Result<(), CrmError> {
        if !self.config.is_configured() {
            return Err(CrmError::NotConfigured);
        }

        let url = format!("{}/v2/contacts", self.config.base_url.trim_end_matches('/'));
        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .query(&[("limit", "1")])
            .send()
            .await
            .map_err(|e| CrmError::Transport(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(CrmError::Api {
                status: response.status().as_u16(),
                body: response.text().await.unwrap_or_default(),
            })
        }
    }
}

/// Build the kvCORE contact payload.
pub fn build_payload(record: &ContactRecord) -> serde_json::Value {
    let mut payload = json!({
        "firstName": record.first_name,
        "lastName": record.last_name,
        "email": record.email,
        "source": record.source,
        "dealType": record.lead_type,
        "notes": record.notes,
        "customFields": record.custom_fields,
    });
    if let Some(phone) = &record.phone {
        payload["phone"] = json!(phone);
    }
    payload
}

#[async_trait]
impl CrmSink for BoldTrailClient {
    async fn submit_contact(&self, record: &ContactRecord) -> Result<CrmContactResponse, CrmError> {
        if !self.config.is_configured() {
            return Err(CrmError::NotConfigured);
        }

        let url = format!("{}/v2/contacts", self.config.base_url.trim_end_matches('/'));
        let payload = build_payload(record);

        debug!("Submitting contact {} to CRM", record.email);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| CrmError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(CrmError::Api {
                status: response.status().as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let parsed: CrmContactResponse = response
            .json()
            .await
            .map_err(|e| CrmError::Transport(format!("Response parse failed: {}", e)))?;

        info!(
            "CRM contact {} {}",
            record.email,
            if parsed.updated { "updated" } else { "created" }
        );

        Ok(parsed)
    }
}
