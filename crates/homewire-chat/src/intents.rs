//! Preference and contact-detail extraction from chat messages.
//!
//! Regex-based, compiled once. The extracted preferences seed the listing
//! search that supplies context to the assistant; extracted contact details
//! feed the lead pipeline.

use once_cell::sync::Lazy;
use regex::Regex;

use homewire_listings::{ListingType, PropertyType};
use homewire_similar::UserPreferences;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").unwrap());
static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\+?1[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}").unwrap()
});
static PRICE_UNDER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:under|below|less than|max(?:imum)?(?: of)?|up to)\s*\$?\s*([\d,.]+)\s*(k|m)?")
        .unwrap()
});
static PRICE_OVER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:over|above|more than|at least|min(?:imum)?(?: of)?|starting at)\s*\$?\s*([\d,.]+)\s*(k|m)?")
        .unwrap()
});
static BEDROOMS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+)\s*\+?\s*(?:bed(?:room)?s?|br\b)").unwrap());
static BATHROOMS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+)\s*\+?\s*(?:bath(?:room)?s?|ba\b)").unwrap());

/// Contact details found in free text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactDetails {
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl ContactDetails {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.phone.is_none()
    }
}

/// Scan a chat message for an email address and/or phone number.
pub fn extract_contact(message: &str) -> ContactDetails {
    ContactDetails {
        email: EMAIL_RE.find(message).map(|m| m.as_str().to_string()),
        phone: PHONE_RE.find(message).map(|m| m.as_str().to_string()),
    }
}

/// Parse search preferences out of a chat message.
///
/// `known_cities` is the live distinct-city index from the feed; a city is
/// only recognized when it appears there, so the extractor never invents
/// locations the feed cannot serve.
pub fn extract_preferences(message: &str, known_cities: &[String]) -> UserPreferences {
    let lower = message.to_lowercase();
    let mut prefs = UserPreferences::default();

    for city in known_cities {
        if lower.contains(&city.to_lowercase()) {
            prefs.cities.push(city.clone());
        }
    }

    if let Some(caps) = PRICE_UNDER_RE.captures(message) {
        prefs.max_price = parse_amount(&caps[1], caps.get(2).map(|m| m.as_str()));
    }
    if let Some(caps) = PRICE_OVER_RE.captures(message) {
        prefs.min_price = parse_amount(&caps[1], caps.get(2).map(|m| m.as_str()));
    }

    for caps in BEDROOMS_RE.captures_iter(message) {
        if let Ok(n) = caps[1].parse::<u32>() {
            prefs.bedrooms.push(n);
        }
    }
    for caps in BATHROOMS_RE.captures_iter(message) {
        if let Ok(n) = caps[1].parse::<u32>() {
            prefs.bathrooms.push(n);
        }
    }

    prefs.listing_type = detect_listing_type(&lower);
    prefs.property_types = detect_property_types(&lower);

    prefs
}

fn detect_listing_type(lower: &str) -> Option<ListingType> {
    // Whole words only; "current" must not read as "rent".
    const LEASE_WORDS: [&str; 5] = ["rent", "rental", "renting", "lease", "leasing"];
    const SALE_WORDS: [&str; 4] = ["buy", "buying", "purchase", "sale"];

    let words: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    if words.iter().any(|w| LEASE_WORDS.contains(w)) {
        Some(ListingType::Lease)
    } else if words.iter().any(|w| SALE_WORDS.contains(w)) {
        Some(ListingType::Sale)
    } else {
        None
    }
}

fn detect_property_types(lower: &str) -> Vec<PropertyType> {
    let mut types = Vec::new();
    if lower.contains("condo") || lower.contains("apartment") {
        types.push(PropertyType::Condo);
    }
    if lower.contains("townhouse") || lower.contains("townhome") || lower.contains("town house") {
        types.push(PropertyType::Townhouse);
    }
    if lower.contains("semi-detached") || lower.contains("semi detached") {
        types.push(PropertyType::SemiDetached);
    // "townhouse" contains "house", so only check the bare word after it
    } else if lower.contains("detached")
        || (lower.contains("house") && !lower.contains("townhouse") && !lower.contains("town house"))
    {
        types.push(PropertyType::Detached);
    }
    types
}

fn parse_amount(digits: &str, suffix: Option<&str>) -> Option<i64> {
    let cleaned = digits.replace(',', "");
    let value: f64 = cleaned.parse().ok()?;
    let multiplier = match suffix.map(|s| s.to_lowercase()) {
        Some(s) if s == "k" => 1_000.0,
        Some(s) if s == "m" => 1_000_000.0,
        _ => 1.0,
    };
    let amount = (value * multiplier).round() as i64;
    if amount > 0 {
        Some(amount)
    } else {
        None
    }
}
