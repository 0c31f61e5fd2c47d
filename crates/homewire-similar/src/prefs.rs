//! Visitor preferences. Request-scoped: built from query-string parameters
//! or parsed out of a chat session, discarded after the response.

use serde::Deserialize;

use homewire_listings::{ListingType, PropertyType};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    #[serde(default)]
    pub cities: Vec<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub listing_type: Option<ListingType>,
    #[serde(default)]
    pub property_types: Vec<PropertyType>,
    /// Multiple values allowed; the minimum is used as a floor.
    #[serde(default)]
    pub bedrooms: Vec<u32>,
    #[serde(default)]
    pub bathrooms: Vec<u32>,
}

impl UserPreferences {
    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
            && self.min_price.is_none()
            && self.max_price.is_none()
            && self.listing_type.is_none()
            && self.property_types.is_empty()
            && self.bedrooms.is_empty()
            && self.bathrooms.is_empty()
    }

    pub fn min_bedrooms(&self) -> Option<u32> {
        self.bedrooms.iter().copied().min()
    }

    pub fn min_bathrooms(&self) -> Option<u32> {
        self.bathrooms.iter().copied().min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimum_of_multiple_values() {
        let prefs = UserPreferences {
            bedrooms: vec![4, 2, 3],
            bathrooms: vec![3],
            ..Default::default()
        };
        assert_eq!(prefs.min_bedrooms(), Some(2));
        assert_eq!(prefs.min_bathrooms(), Some(3));
    }

    #[test]
    fn test_empty() {
        assert!(UserPreferences::default().is_empty());
        let prefs = UserPreferences {
            min_price: Some(500_000),
            ..Default::default()
        };
        assert!(!prefs.is_empty());
    }
}
