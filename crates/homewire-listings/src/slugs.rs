//! SEO filter-slug generation.
//!
//! The marketing frontends pre-render one landing page per filter slug.
//! Slugs are generated from the distinct-city index crossed with property
//! types and bedroom presets, so the set tracks the feed without manual
//! curation.

use serde::Serialize;

use crate::types::{ListingType, PropertyType};

const BEDROOM_PRESETS: &[u32] = &[2, 3, 4];

const ALL_PROPERTY_TYPES: &[PropertyType] = &[
    PropertyType::Detached,
    PropertyType::SemiDetached,
    PropertyType::Townhouse,
    PropertyType::Condo,
];

/// One pre-renderable filter page.
#[derive(Debug, Clone, Serialize)]
pub struct FilterSlug {
    pub slug: String,
    pub city: String,
    #[serde(skip_serializing_if = "Option::is_none", rename = "propertyType")]
    pub property_type: Option<PropertyType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bedrooms: Option<u32>,
    #[serde(rename = "listingType")]
    pub listing_type: ListingType,
}

/// Kebab-case a city name for use in a URL path.
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    let mut last_dash = true;
    for c in value.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Plural page label for a property type.
fn type_plural(property_type: PropertyType) -> &'static str {
    match property_type {
        PropertyType::Detached => "detached-homes",
        PropertyType::SemiDetached => "semi-detached-homes",
        PropertyType::Townhouse => "townhouses",
        PropertyType::Condo => "condos",
    }
}

/// Generate the full slug set for a list of cities.
pub fn filter_slugs(cities: &[String]) -> Vec<FilterSlug> {
    let mut slugs = Vec::new();

    for city in cities {
        let city_slug = slugify(city);
        if city_slug.is_empty() {
            continue;
        }

        // City landing pages, sale and lease
        slugs.push(FilterSlug {
            slug: format!("homes-for-sale-in-{}", city_slug),
            city: city.clone(),
            property_type: None,
            bedrooms: None,
            listing_type: ListingType::Sale,
        });
        slugs.push(FilterSlug {
            slug: format!("homes-for-lease-in-{}", city_slug),
            city: city.clone(),
            property_type: None,
            bedrooms: None,
            listing_type: ListingType::Lease,
        });

        // City x property type
        for &property_type in ALL_PROPERTY_TYPES {
            slugs.push(FilterSlug {
                slug: format!("{}-{}", city_slug, type_plural(property_type)),
                city: city.clone(),
                property_type: Some(property_type),
                bedrooms: None,
                listing_type: ListingType::Sale,
            });

            // City x property type x bedroom preset
            for &bedrooms in BEDROOM_PRESETS {
                slugs.push(FilterSlug {
                    slug: format!(
                        "{}-bedroom-{}-in-{}",
                        bedrooms,
                        type_plural(property_type),
                        city_slug
                    ),
                    city: city.clone(),
                    property_type: Some(property_type),
                    bedrooms: Some(bedrooms),
                    listing_type: ListingType::Sale,
                });
            }
        }
    }

    slugs
}
