//! Review matching policy
//!
//! A stored review matches a query landmark if its coordinate falls inside a
//! fixed-radius box around the query coordinate OR its landmark name is
//! fuzzy-similar to the query name. Broad recall is deliberate: false
//! positives across nearby landmarks are accepted in exchange for tolerance
//! to recognizer name variance ("Maiden Tower" vs "Maiden Tower, Baku").

use crate::types::{Coordinate, Review};
use serde::{Deserialize, Serialize};

fn default_radius_degrees() -> f64 {
    0.1
}

fn default_min_name_similarity() -> f64 {
    80.0
}

/// Name similarity on a 0-100 Levenshtein-ratio scale
pub fn name_similarity(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(a, b) * 100.0
}

/// Tunable parameters of the review matching policy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchPolicy {
    /// Half-width of the coordinate box, in degrees
    #[serde(default = "default_radius_degrees")]
    pub radius_degrees: f64,
    /// Minimum fuzzy name similarity (0-100) for a name match
    #[serde(default = "default_min_name_similarity")]
    pub min_name_similarity: f64,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self {
            radius_degrees: default_radius_degrees(),
            min_name_similarity: default_min_name_similarity(),
        }
    }
}

impl MatchPolicy {
    /// Does a stored review match the query landmark?
    pub fn matches(&self, review: &Review, coordinate: Coordinate, landmark: &str) -> bool {
        self.within_radius(review.coordinate, coordinate)
            || name_similarity(&review.landmark, landmark) >= self.min_name_similarity
    }

    fn within_radius(&self, stored: Coordinate, query: Coordinate) -> bool {
        (stored.longitude - query.longitude).abs() <= self.radius_degrees
            && (stored.latitude - query.latitude).abs() <= self.radius_degrees
    }
}
