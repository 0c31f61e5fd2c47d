//! Listing source seam.

use async_trait::async_trait;

use crate::types::{Listing, SearchOutcome, SearchParams};

/// Common trait for listing sources. The production implementation is the
/// RESO feed client; tests substitute in-memory sources.
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Search listings. Never returns an error: upstream failures surface
    /// as `SearchOutcome { success: false, .. }`.
    async fn search(&self, params: &SearchParams) -> SearchOutcome;

    /// Direct lookup by listing key. Absent is a normal outcome.
    async fn get_by_id(&self, id: &str) -> homewire_core::Result<Option<Listing>>;

    /// Deduplicated, sorted list of cities with active listings.
    async fn distinct_cities(&self) -> homewire_core::Result<Vec<String>>;

    /// Name of the upstream source, for logging.
    fn source_name(&self) -> &'static str;
}
