//! CRM adapter: BoldTrail/kvCORE contact create/update.

pub mod boldtrail;
pub mod types;

pub use boldtrail::BoldTrailClient;
pub use types::{ContactRecord, CrmContactResponse, CrmError, CrmSink};
