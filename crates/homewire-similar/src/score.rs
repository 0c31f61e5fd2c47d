//! Additive relevance scoring for candidate listings.

use homewire_listings::Listing;

pub const SAME_CITY_POINTS: u32 = 30;
pub const SAME_TYPE_POINTS: u32 = 25;
pub const PRICE_PROXIMITY_POINTS: u32 = 20;
pub const BEDROOM_MATCH_POINTS: u32 = 15;
pub const BEDROOM_NEAR_POINTS: u32 = 8;
pub const BATHROOM_MATCH_POINTS: u32 = 10;
pub const BATHROOM_NEAR_POINTS: u32 = 5;

/// A scored candidate. The fetch index is the explicit secondary sort key,
/// keeping tie order identical to the candidate pool order.
#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    pub listing: Listing,
    pub score: u32,
    pub fetch_index: usize,
}

/// Score a candidate against the reference listing. Terms are independent
/// and additive; bedroom and bathroom exact/near bonuses are mutually
/// exclusive (exact wins).
pub fn score_candidate(reference: &Listing, candidate: &Listing) -> u32 {
    let mut score = 0;

    if candidate.city == reference.city {
        score += SAME_CITY_POINTS;
    }
    if candidate.property_type == reference.property_type {
        score += SAME_TYPE_POINTS;
    }
    if price_within_20_percent(reference.price, candidate.price) {
        score += PRICE_PROXIMITY_POINTS;
    }

    let bedroom_diff = candidate.bedrooms.abs_diff(reference.bedrooms);
    if bedroom_diff == 0 {
        score += BEDROOM_MATCH_POINTS;
    } else if bedroom_diff == 1 {
        score += BEDROOM_NEAR_POINTS;
    }

    let bathroom_diff = candidate.bathrooms.abs_diff(reference.bathrooms);
    if bathroom_diff == 0 {
        score += BATHROOM_MATCH_POINTS;
    } else if bathroom_diff <= 1 {
        score += BATHROOM_NEAR_POINTS;
    }

    score
}

/// |candidate - reference| <= 20% of reference, in exact integer math.
fn price_within_20_percent(reference: i64, candidate: i64) -> bool {
    (candidate - reference).abs() * 5 <= reference
}
