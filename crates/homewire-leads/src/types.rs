//! Lead capture types.

use serde::{Deserialize, Serialize};

/// Classified lead type, mapped from the inquiry reason tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadType {
    Buyer,
    Seller,
    Investor,
    General,
}

impl LeadType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadType::Buyer => "buyer",
            LeadType::Seller => "seller",
            LeadType::Investor => "investor",
            LeadType::General => "general",
        }
    }
}

/// Lead quality tier for registration submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadQuality {
    Hot,
    Warm,
    Cold,
}

/// Contact-form submission.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    /// Reason for contacting (buying/selling/investing/assignment/...).
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub message: String,
    /// Which site/form the submission came from.
    #[serde(default = "default_source")]
    pub source: String,
}

/// Project-registration submission (pre-construction interest).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationSubmission {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub reason: String,
    /// Project the visitor registered for.
    #[serde(default)]
    pub project: Option<String>,
    /// Stated purchase timeline tag.
    #[serde(default)]
    pub timeline: Option<String>,
    /// Stated budget tier tag.
    #[serde(default)]
    pub budget_range: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default = "default_source")]
    pub source: String,
}

fn default_source() -> String {
    "contact-form".into()
}

/// Field-level validation failure, surfaced to the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Outcome of an accepted submission. `fallback=true` means the CRM call
/// failed and the lead went to the fallback log instead — still a success
/// from the visitor's point of view.
#[derive(Debug, Clone, Serialize)]
pub struct LeadOutcome {
    pub accepted: bool,
    pub fallback: bool,
    #[serde(rename = "leadId")]
    pub lead_id: String,
    #[serde(rename = "leadType")]
    pub lead_type: LeadType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<LeadQuality>,
}
