//! Similarity engine — fetch, exclude self, score, rank, truncate.

use tracing::{debug, warn};

use homewire_listings::{Listing, ListingSource};

use crate::prefs::UserPreferences;
use crate::query::candidate_query;
use crate::score::{score_candidate, ScoredCandidate};

/// Output length bounds. The requested limit is clamped into this range.
pub const MIN_RESULTS: usize = 3;
pub const MAX_RESULTS: usize = 5;

/// Stateless similarity engine. Each invocation is a single pass:
/// fetch → exclude self → score → filter(score > 0) → sort → truncate.
pub struct SimilarityEngine;

impl SimilarityEngine {
    /// Produce ranked recommendations for a reference listing.
    ///
    /// Recommendations are a non-critical enhancement: an upstream fetch
    /// failure yields an empty list, never an error.
    pub async fn recommend(
        source: &dyn ListingSource,
        reference: &Listing,
        prefs: Option<&UserPreferences>,
        requested_limit: usize,
    ) -> Vec<Listing> {
        let query = candidate_query(reference, prefs);
        let outcome = source.search(&query).await;

        if !outcome.success {
            warn!(
                "Similar-listings fetch degraded for {}: {}",
                reference.id,
                outcome.error.as_deref().unwrap_or("unknown")
            );
            return Vec::new();
        }

        let ranked = rank(reference, outcome.listings);
        let limit = requested_limit.clamp(MIN_RESULTS, MAX_RESULTS);

        debug!(
            "Ranked {} candidates for {} (limit {})",
            ranked.len(),
            reference.id,
            limit
        );

        ranked
            .into_iter()
            .take(limit)
            .map(|c| c.listing)
            .collect()
    }
}

/// Score and rank a candidate pool. Zero-score candidates are discarded;
/// ties keep pool order (stable sort, secondary key = fetch index).
pub fn rank(reference: &Listing, candidates: Vec<Listing>) -> Vec<ScoredCandidate> {
    let mut scored: Vec<ScoredCandidate> = candidates
        .into_iter()
        .enumerate()
        .filter(|(_, candidate)| candidate.id != reference.id)
        .map(|(fetch_index, listing)| ScoredCandidate {
            score: score_candidate(reference, &listing),
            listing,
            fetch_index,
        })
        .filter(|c| c.score > 0)
        .collect();

    scored.sort_by_key(|c| (std::cmp::Reverse(c.score), c.fetch_index));
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use homewire_listings::{
        ListingStatus, ListingType, PropertyType, SearchOutcome, SearchParams,
    };

    fn listing(id: &str, city: &str, price: i64, beds: u32, baths: u32) -> Listing {
        Listing {
            id: id.into(),
            mls_number: None,
            property_type: PropertyType::Townhouse,
            listing_type: ListingType::from_price(price),
            status: ListingStatus::Active,
            address: String::new(),
            city: city.into(),
            province: "ON".into(),
            postal_code: String::new(),
            price,
            bedrooms: beds,
            bathrooms: baths,
            sqft: None,
            images: Vec::new(),
            title: String::new(),
            description: String::new(),
            listing_date: None,
        }
    }

    struct FixedSource {
        outcome: SearchOutcome,
    }

    #[async_trait]
    impl ListingSource for FixedSource {
        async fn search(&self, _params: &SearchParams) -> SearchOutcome {
            self.outcome.clone()
        }

        async fn get_by_id(&self, _id: &str) -> homewire_core::Result<Option<Listing>> {
            Ok(None)
        }

        async fn distinct_cities(&self) -> homewire_core::Result<Vec<String>> {
            Ok(Vec::new())
        }

        fn source_name(&self) -> &'static str {
            "fixed"
        }
    }

    fn pool(listings: Vec<Listing>) -> FixedSource {
        FixedSource {
            outcome: SearchOutcome {
                success: true,
                total: listings.len(),
                listings,
                error: None,
            },
        }
    }

    #[test]
    fn test_rank_orders_by_score_then_fetch_index() {
        let reference = listing("R", "Markham", 900_000, 3, 2);
        let strong = listing("A", "Markham", 950_000, 3, 2); // 100
        let weak = listing("B", "Markham", 1_300_000, 4, 3); // 68
        let tie_first = listing("C", "Markham", 910_000, 3, 2); // 100, earlier
        let ranked = rank(&reference, vec![weak.clone(), strong, tie_first]);

        assert_eq!(ranked[0].listing.id, "A");
        assert_eq!(ranked[0].score, 100);
        // A and C tie on 100; A was fetched first and stays first.
        assert_eq!(ranked[1].listing.id, "C");
        assert_eq!(ranked[2].listing.id, "B");
        assert_eq!(ranked[2].score, 68);
    }

    #[test]
    fn test_rank_excludes_reference_and_zero_scores() {
        let reference = listing("R", "Markham", 900_000, 3, 2);
        let self_copy = listing("R", "Markham", 900_000, 3, 2);
        let unrelated = listing("Z", "Barrie", 200_000, 1, 5);
        let mut unrelated = unrelated;
        unrelated.property_type = PropertyType::Condo;

        let ranked = rank(&reference, vec![self_copy, unrelated]);
        assert!(ranked.is_empty());
    }

    #[tokio::test]
    async fn test_recommend_clamps_limit() {
        let reference = listing("R", "Markham", 900_000, 3, 2);
        let candidates: Vec<Listing> = (0..10)
            .map(|i| listing(&format!("C{}", i), "Markham", 900_000 + i * 1000, 3, 2))
            .collect();
        let source = pool(candidates);

        let few = SimilarityEngine::recommend(&source, &reference, None, 1).await;
        assert_eq!(few.len(), 3);

        let many = SimilarityEngine::recommend(&source, &reference, None, 50).await;
        assert_eq!(many.len(), 5);
    }

    #[tokio::test]
    async fn test_recommend_all_same_hard_constraints() {
        let reference = listing("R", "Markham", 900_000, 3, 2);
        let source = pool(vec![
            listing("A", "Markham", 950_000, 3, 2),
            listing("B", "Markham", 880_000, 2, 2),
        ]);

        let results = SimilarityEngine::recommend(&source, &reference, None, 5).await;
        assert_eq!(results.len(), 2);
        for candidate in &results {
            assert_eq!(candidate.city, reference.city);
            assert_eq!(candidate.listing_type, reference.listing_type);
            assert_ne!(candidate.id, reference.id);
        }
    }

    #[tokio::test]
    async fn test_recommend_upstream_failure_yields_empty() {
        let reference = listing("R", "Markham", 900_000, 3, 2);
        let source = FixedSource {
            outcome: SearchOutcome::failed("feed unreachable"),
        };

        let results = SimilarityEngine::recommend(&source, &reference, None, 5).await;
        assert!(results.is_empty());
    }
}
