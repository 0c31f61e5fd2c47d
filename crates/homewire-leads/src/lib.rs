//! Lead capture pipeline.
//!
//! Visitor submissions are validated, classified (lead type + quality
//! tier), and forwarded to the CRM. A CRM outage degrades to the fallback
//! log rather than losing the lead; notification dispatch is
//! fire-and-forget with failures reported on a dedicated channel.

pub mod classify;
pub mod fallback;
pub mod notify;
pub mod pipeline;
pub mod types;
pub mod validate;

pub use fallback::FallbackLog;
pub use notify::{start_failure_drain, Notifier, NullNotifier, WebhookNotifier};
pub use pipeline::LeadPipeline;
pub use types::*;
