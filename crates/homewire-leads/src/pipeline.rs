//! Lead capture pipeline: validate → classify → forward to CRM.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::info;
use uuid::Uuid;

use homewire_crm::{ContactRecord, CrmSink};

use crate::classify::{classify_quality, lead_type_for};
use crate::fallback::FallbackLog;
use crate::notify::{dispatch, LeadNotification, Notifier, NotifyFailure};
use crate::types::*;
use crate::validate::{validate_contact, validate_registration};

pub struct LeadPipeline {
    crm: Arc<dyn CrmSink>,
    fallback: FallbackLog,
    notifier: Arc<dyn Notifier>,
    failure_tx: mpsc::UnboundedSender<NotifyFailure>,
    failure_rx: Mutex<Option<mpsc::UnboundedReceiver<NotifyFailure>>>,
}

impl LeadPipeline {
    pub fn new(crm: Arc<dyn CrmSink>, fallback: FallbackLog, notifier: Arc<dyn Notifier>) -> Self {
        let (failure_tx, failure_rx) = mpsc::unbounded_channel();
        Self {
            crm,
            fallback,
            notifier,
            failure_tx,
            failure_rx: Mutex::new(Some(failure_rx)),
        }
    }

    /// Take the notification failure receiver (once, by the drain worker).
    pub fn take_failure_rx(&self) -> Option<mpsc::UnboundedReceiver<NotifyFailure>> {
        self.failure_rx.lock().take()
    }

    pub fn fallback_entries(&self) -> Vec<crate::fallback::FallbackEntry> {
        self.fallback.entries()
    }

    /// Process a contact-form submission.
    pub async fn submit_contact(
        &self,
        submission: ContactSubmission,
    ) -> Result<LeadOutcome, Vec<ValidationError>> {
        let errors = validate_contact(&submission);
        if !errors.is_empty() {
            return Err(errors);
        }

        let lead_type = lead_type_for(&submission.reason);
        let notes = format!(
            "Reason: {}\n\n{}",
            submission.reason,
            submission.message.trim()
        );

        let record = ContactRecord {
            first_name: submission.first_name.trim().to_string(),
            last_name: submission.last_name.trim().to_string(),
            email: submission.email.trim().to_string(),
            phone: clean_phone(submission.phone.as_deref()),
            source: submission.source.clone(),
            lead_type: lead_type.as_str().to_string(),
            notes,
            custom_fields: serde_json::json!({ "reason": submission.reason }),
        };

        Ok(self.forward(record, lead_type, None).await)
    }

    /// Process a project-registration submission.
    pub async fn submit_registration(
        &self,
        submission: RegistrationSubmission,
    ) -> Result<LeadOutcome, Vec<ValidationError>> {
        let errors = validate_registration(&submission);
        if !errors.is_empty() {
            return Err(errors);
        }

        let lead_type = lead_type_for(&submission.reason);
        let phone = clean_phone(submission.phone.as_deref());
        let (score, quality) = classify_quality(
            submission.timeline.as_deref(),
            submission.budget_range.as_deref(),
            phone.is_some(),
        );

        let mut notes = format!("Reason: {}", submission.reason);
        if let Some(project) = &submission.project {
            notes.push_str(&format!("\nProject: {}", project));
        }
        if let Some(timeline) = &submission.timeline {
            notes.push_str(&format!("\nTimeline: {}", timeline));
        }
        if let Some(budget) = &submission.budget_range {
            notes.push_str(&format!("\nBudget: {}", budget));
        }
        if !submission.message.trim().is_empty() {
            notes.push_str(&format!("\n\n{}", submission.message.trim()));
        }

        let record = ContactRecord {
            first_name: submission.first_name.trim().to_string(),
            last_name: submission.last_name.trim().to_string(),
            email: submission.email.trim().to_string(),
            phone,
            source: submission.source.clone(),
            lead_type: lead_type.as_str().to_string(),
            notes,
            custom_fields: serde_json::json!({
                "project": submission.project,
                "timeline": submission.timeline,
                "budgetRange": submission.budget_range,
                "qualityScore": score,
                "quality": quality,
            }),
        };

        Ok(self.forward(record, lead_type, Some(quality)).await)
    }

    /// Forward a validated record to the CRM, falling back to the log on
    /// transport failure. Either path accepts the lead.
    async fn forward(
        &self,
        record: ContactRecord,
        lead_type: LeadType,
        quality: Option<LeadQuality>,
    ) -> LeadOutcome {
        let lead_id = Uuid::new_v4().to_string();

        let fallback = match self.crm.submit_contact(&record).await {
            Ok(response) => {
                info!(
                    "Lead {} forwarded to CRM ({})",
                    lead_id,
                    response.id.as_deref().unwrap_or("no id")
                );
                false
            }
            Err(e) => {
                self.fallback.append(&lead_id, &record, &e.to_string());
                true
            }
        };

        dispatch(
            self.notifier.clone(),
            LeadNotification {
                lead_id: lead_id.clone(),
                name: format!("{} {}", record.first_name, record.last_name)
                    .trim()
                    .to_string(),
                email: record.email.clone(),
                source: record.source.clone(),
                lead_type,
                quality,
                fallback,
            },
            self.failure_tx.clone(),
        );

        LeadOutcome {
            accepted: true,
            fallback,
            lead_id,
            lead_type,
            quality,
        }
    }
}

/// Strip formatting; keep None for blank input.
fn clean_phone(phone: Option<&str>) -> Option<String> {
    let digits: String = phone?
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        None
    } else {
        Some(digits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use homewire_crm::{CrmContactResponse, CrmError};
    use parking_lot::Mutex as PlMutex;

    struct MemorySink {
        records: PlMutex<Vec<ContactRecord>>,
    }

    #[async_trait]
    impl CrmSink for MemorySink {
        async fn submit_contact(
            &self,
            record: &ContactRecord,
        ) -> Result<CrmContactResponse, CrmError> {
            self.records.lock().push(record.clone());
            Ok(CrmContactResponse {
                id: Some("crm-1".into()),
                updated: false,
            })
        }
    }

    struct DownSink;

    #[async_trait]
    impl CrmSink for DownSink {
        async fn submit_contact(
            &self,
            _record: &ContactRecord,
        ) -> Result<CrmContactResponse, CrmError> {
            Err(CrmError::Transport("connection refused".into()))
        }
    }

    fn pipeline(crm: Arc<dyn CrmSink>, dir: &std::path::Path) -> LeadPipeline {
        LeadPipeline::new(
            crm,
            FallbackLog::open(&dir.join("fallback.jsonl")),
            Arc::new(crate::notify::NullNotifier),
        )
    }

    fn contact() -> ContactSubmission {
        ContactSubmission {
            first_name: "Ava".into(),
            last_name: "Chen".into(),
            email: "ava@example.com".into(),
            phone: Some("(416) 555-1234".into()),
            reason: "buying".into(),
            message: "Looking for a townhouse in Markham".into(),
            source: "contact-form".into(),
        }
    }

    #[tokio::test]
    async fn test_contact_reaches_crm() {
        let dir = tempfile::tempdir().unwrap();
        let sink = Arc::new(MemorySink {
            records: PlMutex::new(Vec::new()),
        });
        let pipeline = pipeline(sink.clone(), dir.path());

        let outcome = pipeline.submit_contact(contact()).await.unwrap();
        assert!(outcome.accepted);
        assert!(!outcome.fallback);
        assert_eq!(outcome.lead_type, LeadType::Buyer);

        let records = sink.records.lock();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].phone.as_deref(), Some("4165551234"));
        assert!(records[0].notes.contains("townhouse in Markham"));
        assert!(pipeline.fallback_entries().is_empty());
    }

    #[tokio::test]
    async fn test_crm_down_degrades_to_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = pipeline(Arc::new(DownSink), dir.path());

        let outcome = pipeline.submit_contact(contact()).await.unwrap();
        // Degraded success: the visitor never sees a CRM outage.
        assert!(outcome.accepted);
        assert!(outcome.fallback);

        let entries = pipeline.fallback_entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].record.email, "ava@example.com");
        assert!(entries[0].cause.contains("connection refused"));
    }

    #[tokio::test]
    async fn test_invalid_submission_rejected_whole() {
        let dir = tempfile::tempdir().unwrap();
        let sink = Arc::new(MemorySink {
            records: PlMutex::new(Vec::new()),
        });
        let pipeline = pipeline(sink.clone(), dir.path());

        let mut bad = contact();
        bad.email = "user@@x.com".into();
        let errors = pipeline.submit_contact(bad).await.unwrap_err();
        assert_eq!(errors[0].field, "email");
        // No partial submission.
        assert!(sink.records.lock().is_empty());
    }

    #[tokio::test]
    async fn test_registration_quality_flows_to_crm() {
        let dir = tempfile::tempdir().unwrap();
        let sink = Arc::new(MemorySink {
            records: PlMutex::new(Vec::new()),
        });
        let pipeline = pipeline(sink.clone(), dir.path());

        let outcome = pipeline
            .submit_registration(RegistrationSubmission {
                first_name: "Ben".into(),
                last_name: "Osei".into(),
                email: "ben@example.com".into(),
                phone: Some("6475550000".into()),
                reason: "investing".into(),
                project: Some("The Wells".into()),
                timeline: Some("immediately".into()),
                budget_range: Some("1m-1.5m".into()),
                message: String::new(),
                source: "registration".into(),
            })
            .await
            .unwrap();

        assert_eq!(outcome.lead_type, LeadType::Investor);
        assert_eq!(outcome.quality, Some(LeadQuality::Hot));

        let records = sink.records.lock();
        assert_eq!(records[0].custom_fields["qualityScore"], 7);
        assert_eq!(records[0].custom_fields["project"], "The Wells");
        assert!(records[0].notes.contains("Timeline: immediately"));
    }
}
