//! New-lead notification dispatch.
//!
//! Dispatch is fire-and-forget: the submission response never waits on it.
//! Failures go to a dedicated error channel drained by a logging worker
//! instead of disappearing inside a detached task.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::error;

use crate::types::{LeadQuality, LeadType};

/// Notification payload for a captured lead.
#[derive(Debug, Clone, Serialize)]
pub struct LeadNotification {
    #[serde(rename = "leadId")]
    pub lead_id: String,
    pub name: String,
    pub email: String,
    pub source: String,
    #[serde(rename = "leadType")]
    pub lead_type: LeadType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<LeadQuality>,
    /// True when the lead went to the fallback log instead of the CRM.
    pub fallback: bool,
}

/// A failed dispatch, reported on the error channel.
#[derive(Debug)]
pub struct NotifyFailure {
    pub lead_id: String,
    pub cause: String,
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: &LeadNotification) -> Result<(), String>;
}

/// Posts notifications to the configured email-service webhook.
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();
        Self { client, url }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, notification: &LeadNotification) -> Result<(), String> {
        let response = self
            .client
            .post(&self.url)
            .json(notification)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(format!("webhook returned status {}", response.status()))
        }
    }
}

/// No-op notifier for deployments without a webhook configured.
pub struct NullNotifier;

#[async_trait]
impl Notifier for NullNotifier {
    async fn notify(&self, _notification: &LeadNotification) -> Result<(), String> {
        Ok(())
    }
}

/// Spawn the dispatch; failures are reported, never awaited by the caller.
pub fn dispatch(
    notifier: Arc<dyn Notifier>,
    notification: LeadNotification,
    failure_tx: mpsc::UnboundedSender<NotifyFailure>,
) {
    tokio::spawn(async move {
        if let Err(cause) = notifier.notify(&notification).await {
            let _ = failure_tx.send(NotifyFailure {
                lead_id: notification.lead_id,
                cause,
            });
        }
    });
}

/// Drain worker: logs dispatch failures from the error channel.
pub fn start_failure_drain(mut failure_rx: mpsc::UnboundedReceiver<NotifyFailure>) {
    tokio::spawn(async move {
        while let Some(failure) = failure_rx.recv().await {
            error!(
                "Lead notification failed for {}: {}",
                failure.lead_id, failure.cause
            );
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    struct FailingNotifier;

    #[async_trait]
    impl Notifier for FailingNotifier {
        async fn notify(&self, _notification: &LeadNotification) -> Result<(), String> {
            Err("smtp relay down".into())
        }
    }

    struct RecordingNotifier {
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn notify(&self, notification: &LeadNotification) -> Result<(), String> {
            self.seen.lock().push(notification.lead_id.clone());
            Ok(())
        }
    }

    fn notification(lead_id: &str) -> LeadNotification {
        LeadNotification {
            lead_id: lead_id.into(),
            name: "Ava Chen".into(),
            email: "ava@example.com".into(),
            source: "contact-form".into(),
            lead_type: LeadType::Buyer,
            quality: None,
            fallback: false,
        }
    }

    #[tokio::test]
    async fn test_failure_lands_on_channel() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        dispatch(Arc::new(FailingNotifier), notification("lead-1"), tx);

        let failure = rx.recv().await.unwrap();
        assert_eq!(failure.lead_id, "lead-1");
        assert_eq!(failure.cause, "smtp relay down");
    }

    #[tokio::test]
    async fn test_success_sends_nothing() {
        let notifier = Arc::new(RecordingNotifier {
            seen: Mutex::new(Vec::new()),
        });
        let (tx, mut rx) = mpsc::unbounded_channel();
        dispatch(notifier.clone(), notification("lead-2"), tx);

        // Channel closes without a failure once the task finishes.
        assert!(rx.recv().await.is_none());
        assert_eq!(notifier.seen.lock().as_slice(), &["lead-2".to_string()]);
    }
}
