//! CRM contact types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Normalized contact record, ready for CRM submission. The lead type is
/// carried as the CRM-side tag string; classification happens upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactRecord {
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Where the lead came from (e.g. `contact-form`, `registration`, `ai-chat`).
    pub source: String,
    #[serde(rename = "leadType")]
    pub lead_type: String,
    /// Free-form notes assembled from the submission.
    pub notes: String,
    /// CRM custom fields (budget, timeline, project of interest, ...).
    #[serde(rename = "customFields", default)]
    pub custom_fields: serde_json::Value,
}

/// Response from a contact create/update call.
#[derive(Debug, Clone, Deserialize)]
pub struct CrmContactResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub updated: bool,
}

/// CRM transport and API errors.
#[derive(Error, Debug)]
pub enum CrmError {
    #[error("CRM not configured")]
    NotConfigured,

    #[error("CRM transport error: {0}")]
    Transport(String),

    #[error("CRM API error {status}: {body}")]
    Api { status: u16, body: String },
}

/// Seam for the lead pipeline: the production sink is the BoldTrail
/// client; tests substitute in-memory or always-failing sinks.
#[async_trait::async_trait]
pub trait CrmSink: Send + Sync {
    async fn submit_contact(&self, record: &ContactRecord) -> Result<CrmContactResponse, CrmError>;
}
