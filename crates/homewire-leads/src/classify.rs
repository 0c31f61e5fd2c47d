//! Lead classification: type mapping and quality scoring.

use crate::types::{LeadQuality, LeadType};

const HOT_THRESHOLD: u32 = 5;
const WARM_THRESHOLD: u32 = 3;

/// Map an inquiry reason tag to a lead type. Assignment sales are an
/// investor activity on pre-construction projects.
pub fn lead_type_for(reason: &str) -> LeadType {
    match reason.trim().to_lowercase().as_str() {
        "buying" | "renting" => LeadType::Buyer,
        "selling" => LeadType::Seller,
        "investing" | "assignment" => LeadType::Investor,
        _ => LeadType::General,
    }
}

/// Points for the stated purchase timeline (more urgent scores higher).
pub fn timeline_score(timeline: Option<&str>) -> u32 {
    match timeline.map(str::trim) {
        Some("immediately") => 4,
        Some("1-3months") => 3,
        Some("3-6months") => 2,
        Some("6-12months") => 1,
        _ => 0,
    }
}

/// Points for the stated budget tier.
pub fn budget_score(budget_range: Option<&str>) -> u32 {
    match budget_range.map(str::trim) {
        Some("2m+") => 3,
        Some("1.5m-2m") | Some("1m-1.5m") => 2,
        Some("750k-1m") | Some("500k-750k") => 1,
        _ => 0,
    }
}

/// Score a registration and bucket it into a quality tier.
pub fn classify_quality(
    timeline: Option<&str>,
    budget_range: Option<&str>,
    has_phone: bool,
) -> (u32, LeadQuality) {
    let score = timeline_score(timeline) + budget_score(budget_range) + u32::from(has_phone);
    let quality = if score >= HOT_THRESHOLD {
        LeadQuality::Hot
    } else if score >= WARM_THRESHOLD {
        LeadQuality::Warm
    } else {
        LeadQuality::Cold
    };
    (score, quality)
}
