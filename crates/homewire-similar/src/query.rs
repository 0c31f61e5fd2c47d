//! Candidate query construction.
//!
//! Hard constraints (city, residential class, listing type, property types)
//! always apply. Preference-derived bounds only narrow the fetch; nothing
//! is filtered out after the fetch besides the reference itself and
//! zero-score candidates.

use homewire_listings::{ListingStatus, SearchParams};

use crate::prefs::UserPreferences;

/// Candidates fetched per ranking request. Bounds upstream cost while
/// giving the scorer enough material to differentiate.
pub const CANDIDATE_POOL_SIZE: usize = 50;

/// Build the constrained candidate search for a reference listing.
pub fn candidate_query(
    reference: &homewire_listings::Listing,
    prefs: Option<&UserPreferences>,
) -> SearchParams {
    let listing_type = prefs
        .and_then(|p| p.listing_type)
        .unwrap_or(reference.listing_type);

    let property_types = match prefs {
        Some(p) if !p.property_types.is_empty() => p.property_types.clone(),
        _ => vec![reference.property_type],
    };

    SearchParams {
        city: Some(reference.city.clone()),
        min_price: prefs.and_then(|p| p.min_price),
        max_price: prefs.and_then(|p| p.max_price),
        min_bedrooms: prefs.and_then(|p| p.min_bedrooms()),
        min_bathrooms: prefs.and_then(|p| p.min_bathrooms()),
        property_types,
        listing_type: Some(listing_type),
        status: Some(ListingStatus::Active),
        limit: CANDIDATE_POOL_SIZE,
        offset: 0,
    }
}
