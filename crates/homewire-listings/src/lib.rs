//! Listing source adapter: IDX/RESO feed client and normalization.
//!
//! Fetches raw listings and per-listing media from the MLS feed, normalizes
//! them into the internal [`Listing`] model, and exposes limit/offset
//! pagination plus a distinct-city index. No listing data is cached
//! locally; every call re-fetches upstream state.

pub mod reso;
pub mod slugs;
pub mod source;
pub mod types;

pub use reso::ResoClient;
pub use slugs::{filter_slugs, FilterSlug};
pub use source::ListingSource;
pub use types::*;
