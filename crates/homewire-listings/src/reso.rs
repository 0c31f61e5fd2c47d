//! RESO Web API (OData) feed client.
//!
//! Two upstream resources are used: `Property` for listing search and
//! `Media` for photos. Media is fetched once per search page, batched by
//! listing key, so a page costs two upstream calls regardless of size.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use homewire_core::{Error, Result, UpstreamConfig};

use crate::source::ListingSource;
use crate::types::*;

const DEFAULT_PAGE_SIZE: usize = 20;
const CITY_INDEX_SCAN_LIMIT: usize = 1000;

/// RESO feed client.
pub struct ResoClient {
    client: Client,
    config: UpstreamConfig,
}

/// Raw `Property` record as returned by the feed.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedProperty {
    #[serde(rename = "ListingKey")]
    pub listing_key: String,
    #[serde(rename = "ListingId", default)]
    pub listing_id: Option<String>,
    #[serde(rename = "PropertySubType", default)]
    pub property_sub_type: Option<String>,
    #[serde(rename = "StandardStatus", default)]
    pub standard_status: Option<String>,
    #[serde(rename = "UnparsedAddress", default)]
    pub unparsed_address: Option<String>,
    #[serde(rename = "City", default)]
    pub city: Option<String>,
    #[serde(rename = "StateOrProvince", default)]
    pub state_or_province: Option<String>,
    #[serde(rename = "PostalCode", default)]
    pub postal_code: Option<String>,
    #[serde(rename = "ListPrice", default)]
    pub list_price: Option<f64>,
    #[serde(rename = "BedroomsTotal", default)]
    pub bedrooms_total: Option<f64>,
    #[serde(rename = "BathroomsTotalInteger", default)]
    pub bathrooms_total: Option<f64>,
    #[serde(rename = "LivingArea", default)]
    pub living_area: Option<f64>,
    #[serde(rename = "PublicRemarks", default)]
    pub public_remarks: Option<String>,
    #[serde(rename = "ListingContractDate", default)]
    pub listing_contract_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PropertyPage {
    #[serde(rename = "@odata.count", default)]
    count: Option<usize>,
    #[serde(default)]
    value: Vec<FeedProperty>,
}

#[derive(Debug, Deserialize)]
struct MediaRecord {
    #[serde(rename = "ResourceRecordKey")]
    resource_record_key: String,
    #[serde(rename = "MediaURL", default)]
    media_url: Option<String>,
    #[serde(rename = "Order", default)]
    order: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct MediaPage {
    #[serde(default)]
    value: Vec<MediaRecord>,
}

impl ResoClient {
    pub fn new(config: UpstreamConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .unwrap_or_default();
        Self { client, config }
    }

    async fn fetch_properties(&self, filter: &str, top: usize, skip: usize) -> Result<PropertyPage> {
        if !self.config.is_configured() {
            return Err(Error::Config("IDX feed not configured".into()));
        }

        let url = format!("{}/Property", self.config.base_url.trim_end_matches('/'));
        debug!("Feed query: {} (top={}, skip={})", filter, top, skip);

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .query(&[
                ("$filter", filter),
                ("$top", &top.to_string()),
                ("$skip", &skip.to_string()),
                ("$count", "true"),
                ("$orderby", "ListingContractDate desc"),
            ])
            .send()
            .await
            .map_err(|e| Error::Upstream(format!("Feed request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Upstream(format!(
                "Feed returned status {}",
                response.status()
            )));
        }

        response
            .json::<PropertyPage>()
            .await
            .map_err(|e| Error::Upstream(format!("Feed response parse failed: {}", e)))
    }

    /// Batched media fetch: one call for the whole page of listing keys.
    pub async fn fetch_media(&self, listing_keys: &[String]) -> Result<HashMap<String, Vec<String>>> {
        if listing_keys.is_empty() {
            return Ok(HashMap::new());
        }

        let filter = media_filter(listing_keys);
        let url = format!("{}/Media", self.config.base_url.trim_end_matches('/'));

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .query(&[
                ("$filter", filter.as_str()),
                ("$orderby", "Order asc"),
                ("$top", "500"),
            ])
            .send()
            .await
            .map_err(|e| Error::Upstream(format!("Media request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Upstream(format!(
                "Media returned status {}",
                response.status()
            )));
        }

        let page: MediaPage = response
            .json()
            .await
            .map_err(|e| Error::Upstream(format!("Media response parse failed: {}", e)))?;

        Ok(group_media(page.value))
    }
}

#[async_trait]
impl ListingSource for ResoClient {
    async fn search(&self, params: &SearchParams) -> SearchOutcome {
        let filter = build_filter(params);
        let top = if params.limit == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            params.limit
        };

        let page = match self.fetch_properties(&filter, top, params.offset).await {
            Ok(p) => p,
            Err(e) => {
                warn!("Listing search degraded: {}", e);
                return SearchOutcome::failed(e.to_string());
            }
        };

        let total = page.count.unwrap_or(page.value.len());

        let keys: Vec<String> = page.value.iter().map(|p| p.listing_key.clone()).collect();
        let media = match self.fetch_media(&keys).await {
            Ok(m) => m,
            Err(e) => {
                // Listings without photos beat no listings at all.
                warn!("Media fetch degraded: {}", e);
                HashMap::new()
            }
        };

        let listings: Vec<Listing> = page
            .value
            .into_iter()
            .filter_map(|p| {
                let images = media.get(&p.listing_key).cloned().unwrap_or_default();
                normalize(p, images)
            })
            .collect();

        SearchOutcome {
            success: true,
            listings,
            total,
            error: None,
        }
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Listing>> {
        let filter = format!("ListingKey eq '{}'", escape_odata(id));
        let page = self.fetch_properties(&filter, 1, 0).await?;

        let Some(property) = page.value.into_iter().next() else {
            return Ok(None);
        };

        let keys = vec![property.listing_key.clone()];
        let media = self.fetch_media(&keys).await.unwrap_or_default();
        let images = media.get(&property.listing_key).cloned().unwrap_or_default();

        Ok(normalize(property, images))
    }

    async fn distinct_cities(&self) -> Result<Vec<String>> {
        let filter = format!(
            "PropertyType eq '{}' and StandardStatus eq 'Active'",
            RESIDENTIAL_CLASS
        );
        let url = format!("{}/Property", self.config.base_url.trim_end_matches('/'));

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .query(&[
                ("$filter", filter.as_str()),
                ("$select", "City"),
                ("$top", &CITY_INDEX_SCAN_LIMIT.to_string()),
            ])
            .send()
            .await
            .map_err(|e| Error::Upstream(format!("City index request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Upstream(format!(
                "City index returned status {}",
                response.status()
            )));
        }

        let page: PropertyPage = response
            .json()
            .await
            .map_err(|e| Error::Upstream(format!("City index parse failed: {}", e)))?;

        let mut cities: Vec<String> = page
            .value
            .into_iter()
            .filter_map(|p| p.city)
            .filter(|c| !c.is_empty())
            .collect();
        cities.sort();
        cities.dedup();
        Ok(cities)
    }

    fn source_name(&self) -> &'static str {
        "reso"
    }
}

/// Build the OData `$filter` clause for a search.
pub fn build_filter(params: &SearchParams) -> String {
    let mut clauses = vec![format!("PropertyType eq '{}'", RESIDENTIAL_CLASS)];

    let status = params.status.unwrap_or(ListingStatus::Active);
    let status_value = match status {
        ListingStatus::Active => "Active",
        ListingStatus::Pending => "Pending",
        ListingStatus::Sold => "Closed",
    };
    clauses.push(format!("StandardStatus eq '{}'", status_value));

    if let Some(city) = &params.city {
        clauses.push(format!("City eq '{}'", escape_odata(city)));
    }
    if let Some(min) = params.min_price {
        clauses.push(format!("ListPrice ge {}", min));
    }
    if let Some(max) = params.max_price {
        clauses.push(format!("ListPrice le {}", max));
    }
    // The feed has no lease flag; the price threshold is the discriminator.
    match params.listing_type {
        Some(ListingType::Sale) => clauses.push(format!("ListPrice ge {}", LEASE_PRICE_THRESHOLD)),
        Some(ListingType::Lease) => clauses.push(format!("ListPrice lt {}", LEASE_PRICE_THRESHOLD)),
        None => {}
    }
    if let Some(beds) = params.min_bedrooms {
        clauses.push(format!("BedroomsTotal ge {}", beds));
    }
    if let Some(baths) = params.min_bathrooms {
        clauses.push(format!("BathroomsTotalInteger ge {}", baths));
    }
    if !params.property_types.is_empty() {
        let alternatives: Vec<String> = params
            .property_types
            .iter()
            .map(|t| format!("PropertySubType eq '{}'", t.feed_value()))
            .collect();
        clauses.push(format!("({})", alternatives.join(" or ")));
    }

    clauses.join(" and ")
}

fn media_filter(listing_keys: &[String]) -> String {
    let alternatives: Vec<String> = listing_keys
        .iter()
        .map(|k| format!("ResourceRecordKey eq '{}'", escape_odata(k)))
        .collect();
    alternatives.join(" or ")
}

/// OData string literals escape single quotes by doubling them.
fn escape_odata(value: &str) -> String {
    value.replace('\'', "''")
}

/// Group media records by listing key, preserving feed order.
fn group_media(records: Vec<MediaRecord>) -> HashMap<String, Vec<String>> {
    let mut by_key: HashMap<String, Vec<(i64, String)>> = HashMap::new();
    for record in records {
        if let Some(url) = record.media_url {
            by_key
                .entry(record.resource_record_key)
                .or_default()
                .push((record.order.unwrap_or(i64::MAX), url));
        }
    }

    by_key
        .into_iter()
        .map(|(key, mut urls)| {
            urls.sort_by_key(|(order, _)| *order);
            (key, urls.into_iter().map(|(_, url)| url).collect())
        })
        .collect()
}

/// Normalize a raw feed property. Returns None when the record is outside
/// the supported residential subtypes or has no usable price.
pub fn normalize(property: FeedProperty, images: Vec<String>) -> Option<Listing> {
    let property_type =
        PropertyType::from_feed_value(property.property_sub_type.as_deref().unwrap_or(""))?;
    let price = property.list_price.map(|p| p as i64).filter(|p| *p >= 0)?;

    let city = property.city.unwrap_or_default();
    let address = property.unparsed_address.unwrap_or_default();
    let title = if address.is_empty() {
        city.clone()
    } else if city.is_empty() {
        address.clone()
    } else {
        format!("{}, {}", address, city)
    };

    Some(Listing {
        id: property.listing_key,
        mls_number: property.listing_id,
        property_type,
        listing_type: ListingType::from_price(price),
        status: ListingStatus::from_feed_value(property.standard_status.as_deref().unwrap_or("")),
        address,
        city,
        province: property.state_or_province.unwrap_or_default(),
        postal_code: property.postal_code.unwrap_or_default(),
        price,
        bedrooms: property.bedrooms_total.map(|b| b.max(0.0) as u32).unwrap_or(0),
        bathrooms: property.bathrooms_total.map(|b| b.max(0.0) as u32).unwrap_or(0),
        sqft: property.living_area.map(|a| a.max(0.0) as u32).filter(|a| *a > 0),
        images,
        title,
        description: property.public_remarks.unwrap_or_default(),
        listing_date: property.listing_contract_date,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_property(key: &str) -> FeedProperty {
        FeedProperty {
            listing_key: key.into(),
            listing_id: Some(format!("N{}", key)),
            property_sub_type: Some("Att/Row/Townhouse".into()),
            standard_status: Some("Active".into()),
            unparsed_address: Some("12 Main St".into()),
            city: Some("Markham".into()),
            state_or_province: Some("ON".into()),
            postal_code: Some("L3R 0A1".into()),
            list_price: Some(900_000.0),
            bedrooms_total: Some(3.0),
            bathrooms_total: Some(2.0),
            living_area: Some(1650.0),
            public_remarks: Some("Bright end unit".into()),
            listing_contract_date: Some("2026-05-01".into()),
        }
    }

    #[test]
    fn test_build_filter_defaults() {
        let filter = build_filter(&SearchParams::default());
        assert_eq!(
            filter,
            "PropertyType eq 'Residential' and StandardStatus eq 'Active'"
        );
    }

    #[test]
    fn test_build_filter_full() {
        let params = SearchParams {
            city: Some("Markham".into()),
            min_price: Some(700_000),
            max_price: Some(1_080_000),
            min_bedrooms: Some(3),
            min_bathrooms: Some(2),
            property_types: vec![PropertyType::Townhouse, PropertyType::Condo],
            listing_type: Some(ListingType::Sale),
            status: None,
            limit: 50,
            offset: 0,
        };
        let filter = build_filter(&params);
        assert!(filter.contains("City eq 'Markham'"));
        assert!(filter.contains("ListPrice ge 700000"));
        assert!(filter.contains("ListPrice le 1080000"));
        assert!(filter.contains("ListPrice ge 10000"));
        assert!(filter.contains("BedroomsTotal ge 3"));
        assert!(filter.contains("BathroomsTotalInteger ge 2"));
        assert!(filter.contains(
            "(PropertySubType eq 'Att/Row/Townhouse' or PropertySubType eq 'Condo Apartment')"
        ));
    }

    #[test]
    fn test_build_filter_lease() {
        let params = SearchParams {
            listing_type: Some(ListingType::Lease),
            ..Default::default()
        };
        assert!(build_filter(&params).contains("ListPrice lt 10000"));
    }

    #[test]
    fn test_escape_odata_quotes() {
        let params = SearchParams {
            city: Some("King's Point".into()),
            ..Default::default()
        };
        assert!(build_filter(&params).contains("City eq 'King''s Point'"));
    }

    #[test]
    fn test_normalize_townhouse() {
        let listing = normalize(feed_property("W100"), vec!["https://cdn/a.jpg".into()]).unwrap();
        assert_eq!(listing.id, "W100");
        assert_eq!(listing.property_type, PropertyType::Townhouse);
        assert_eq!(listing.listing_type, ListingType::Sale);
        assert_eq!(listing.price, 900_000);
        assert_eq!(listing.bedrooms, 3);
        assert_eq!(listing.title, "12 Main St, Markham");
        assert_eq!(listing.images.len(), 1);
    }

    #[test]
    fn test_normalize_rejects_unsupported_subtype() {
        let mut property = feed_property("W101");
        property.property_sub_type = Some("Vacant Land".into());
        assert!(normalize(property, Vec::new()).is_none());
    }

    #[test]
    fn test_normalize_rejects_missing_price() {
        let mut property = feed_property("W102");
        property.list_price = None;
        assert!(normalize(property, Vec::new()).is_none());
    }

    #[test]
    fn test_group_media_orders_and_groups() {
        let records = vec![
            MediaRecord {
                resource_record_key: "W1".into(),
                media_url: Some("https://cdn/2.jpg".into()),
                order: Some(2),
            },
            MediaRecord {
                resource_record_key: "W1".into(),
                media_url: Some("https://cdn/1.jpg".into()),
                order: Some(1),
            },
            MediaRecord {
                resource_record_key: "W2".into(),
                media_url: Some("https://cdn/3.jpg".into()),
                order: Some(1),
            },
            MediaRecord {
                resource_record_key: "W2".into(),
                media_url: None,
                order: Some(2),
            },
        ];

        let grouped = group_media(records);
        assert_eq!(
            grouped["W1"],
            vec!["https://cdn/1.jpg".to_string(), "https://cdn/2.jpg".to_string()]
        );
        assert_eq!(grouped["W2"], vec!["https://cdn/3.jpg".to_string()]);
    }

    #[test]
    fn test_media_filter_is_single_batch() {
        let filter = media_filter(&["W1".into(), "W2".into()]);
        assert_eq!(
            filter,
            "ResourceRecordKey eq 'W1' or ResourceRecordKey eq 'W2'"
        );
    }
}
