//! Listing read model and search parameter types.

use serde::{Deserialize, Serialize};

/// Prices below this are monthly rents; the feed does not flag lease
/// listings explicitly, so listing type is derived from price alone.
pub const LEASE_PRICE_THRESHOLD: i64 = 10_000;

/// Broad property class (the feed also carries commercial and land).
pub const RESIDENTIAL_CLASS: &str = "Residential";

/// Property type, mapped from the feed's PropertySubType values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PropertyType {
    Detached,
    SemiDetached,
    Townhouse,
    Condo,
}

impl PropertyType {
    /// Label as used in feed queries and SEO slugs.
    pub fn label(&self) -> &'static str {
        match self {
            PropertyType::Detached => "detached",
            PropertyType::SemiDetached => "semi-detached",
            PropertyType::Townhouse => "townhouse",
            PropertyType::Condo => "condo",
        }
    }

    /// Feed-side PropertySubType value for this type.
    pub fn feed_value(&self) -> &'static str {
        match self {
            PropertyType::Detached => "Detached",
            PropertyType::SemiDetached => "Semi-Detached",
            PropertyType::Townhouse => "Att/Row/Townhouse",
            PropertyType::Condo => "Condo Apartment",
        }
    }

    /// Map a feed PropertySubType back to a property type.
    pub fn from_feed_value(value: &str) -> Option<Self> {
        let v = value.to_lowercase();
        if v.contains("semi") {
            Some(PropertyType::SemiDetached)
        } else if v.contains("town") || v.contains("row") {
            Some(PropertyType::Townhouse)
        } else if v.contains("condo") || v.contains("apartment") {
            Some(PropertyType::Condo)
        } else if v.contains("detached") {
            Some(PropertyType::Detached)
        } else {
            None
        }
    }
}

/// Sale vs lease. Always derived, never set from the feed directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingType {
    Sale,
    Lease,
}

impl ListingType {
    /// Derive the listing type from a price.
    pub fn from_price(price: i64) -> Self {
        if price < LEASE_PRICE_THRESHOLD {
            ListingType::Lease
        } else {
            ListingType::Sale
        }
    }
}

/// Listing status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    Active,
    Pending,
    Sold,
}

impl ListingStatus {
    pub fn from_feed_value(value: &str) -> Self {
        match value {
            "Pending" => ListingStatus::Pending,
            "Closed" | "Sold" => ListingStatus::Sold,
            _ => ListingStatus::Active,
        }
    }
}

/// Normalized listing. Constructed fresh on every fetch; mirrors the
/// upstream feed at read time and is never persisted locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none", rename = "mlsNumber")]
    pub mls_number: Option<String>,
    #[serde(rename = "propertyType")]
    pub property_type: PropertyType,
    #[serde(rename = "listingType")]
    pub listing_type: ListingType,
    pub status: ListingStatus,
    pub address: String,
    pub city: String,
    pub province: String,
    #[serde(rename = "postalCode")]
    pub postal_code: String,
    pub price: i64,
    pub bedrooms: u32,
    pub bathrooms: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sqft: Option<u32>,
    pub images: Vec<String>,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none", rename = "listingDate")]
    pub listing_date: Option<String>,
}

/// Search constraints passed to the listing source.
#[derive(Debug, Clone, Default)]
pub struct SearchParams {
    pub city: Option<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub min_bedrooms: Option<u32>,
    pub min_bathrooms: Option<u32>,
    pub property_types: Vec<PropertyType>,
    pub listing_type: Option<ListingType>,
    pub status: Option<ListingStatus>,
    pub limit: usize,
    pub offset: usize,
}

impl SearchParams {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit,
            ..Default::default()
        }
    }
}

/// Result of a listing search. Upstream failures land here as
/// `success=false` with an empty page; errors never cross this boundary.
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub success: bool,
    pub listings: Vec<Listing>,
    /// Full matching count, independent of the returned page size.
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchOutcome {
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            listings: Vec::new(),
            total: 0,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_type_derivation() {
        assert_eq!(ListingType::from_price(2_800), ListingType::Lease);
        assert_eq!(ListingType::from_price(9_999), ListingType::Lease);
        assert_eq!(ListingType::from_price(10_000), ListingType::Sale);
        assert_eq!(ListingType::from_price(900_000), ListingType::Sale);
    }

    #[test]
    fn test_property_type_feed_mapping() {
        assert_eq!(
            PropertyType::from_feed_value("Att/Row/Townhouse"),
            Some(PropertyType::Townhouse)
        );
        assert_eq!(
            PropertyType::from_feed_value("Condo Apartment"),
            Some(PropertyType::Condo)
        );
        assert_eq!(
            PropertyType::from_feed_value("Semi-Detached"),
            Some(PropertyType::SemiDetached)
        );
        assert_eq!(
            PropertyType::from_feed_value("Detached"),
            Some(PropertyType::Detached)
        );
        assert_eq!(PropertyType::from_feed_value("Vacant Land"), None);
    }

    #[test]
    fn test_status_mapping_defaults_active() {
        assert_eq!(
            ListingStatus::from_feed_value("Active"),
            ListingStatus::Active
        );
        assert_eq!(
            ListingStatus::from_feed_value("Closed"),
            ListingStatus::Sold
        );
        assert_eq!(
            ListingStatus::from_feed_value("Something Else"),
            ListingStatus::Active
        );
    }
}
