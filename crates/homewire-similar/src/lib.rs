//! Similar-listings relevance engine.
//!
//! Given one reference listing and optional visitor preferences, builds a
//! constrained candidate query, fetches a bounded pool, and scores/ranks
//! it into 3–5 recommendations. Pure and stateless per invocation.

pub mod engine;
pub mod prefs;
pub mod query;
pub mod score;

pub use engine::{SimilarityEngine, MAX_RESULTS, MIN_RESULTS};
pub use prefs::UserPreferences;
pub use query::{candidate_query, CANDIDATE_POOL_SIZE};
pub use score::{score_candidate, ScoredCandidate};
