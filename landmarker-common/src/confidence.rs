//! Confidence bucketing policy
//!
//! Maps a recognition confidence in [0, 1] to one of three buckets, and each
//! bucket to the marker glyph and color used on the map. The same thresholds
//! drive both the marker icon and the accuracy circle under it, so the two
//! can never drift apart.

use serde::{Deserialize, Serialize};

fn default_low_cutoff() -> f64 {
    0.35
}

fn default_high_cutoff() -> f64 {
    0.65
}

/// Bucket boundaries, exposed as configuration with a single default triple
///
/// Boundaries are inclusive on the upper side: a score equal to `low_cutoff`
/// is Medium, a score equal to `high_cutoff` is High.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    #[serde(default = "default_low_cutoff")]
    pub low_cutoff: f64,
    #[serde(default = "default_high_cutoff")]
    pub high_cutoff: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            low_cutoff: default_low_cutoff(),
            high_cutoff: default_high_cutoff(),
        }
    }
}

impl Thresholds {
    /// Assign a confidence score to its bucket
    pub fn bucket(&self, score: f64) -> Bucket {
        if score < self.low_cutoff {
            Bucket::Low
        } else if score < self.high_cutoff {
            Bucket::Medium
        } else {
            Bucket::High
        }
    }
}

/// Confidence bucket for a recognition candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Low,
    Medium,
    High,
}

impl Bucket {
    /// Marker glyph drawn for candidates in this bucket
    pub fn glyph(self) -> &'static str {
        match self {
            Bucket::Low => "x",
            Bucket::Medium => "pin",
            Bucket::High => "star",
        }
    }

    /// Marker and accuracy-circle color for this bucket
    pub fn color(self) -> &'static str {
        match self {
            Bucket::Low => "red",
            Bucket::Medium => "yellow",
            Bucket::High => "green",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_thresholds() {
        let t = Thresholds::default();
        assert_eq!(t.low_cutoff, 0.35);
        assert_eq!(t.high_cutoff, 0.65);
    }

    #[test]
    fn bucket_scenarios() {
        let t = Thresholds::default();
        assert_eq!(t.bucket(0.20), Bucket::Low);
        assert_eq!(t.bucket(0.50), Bucket::Medium);
        assert_eq!(t.bucket(0.90), Bucket::High);
    }

    #[test]
    fn boundaries_are_inclusive_on_the_upper_side() {
        let t = Thresholds::default();
        assert_eq!(t.bucket(0.35), Bucket::Medium);
        assert_eq!(t.bucket(0.65), Bucket::High);
    }

    #[test]
    fn extremes() {
        let t = Thresholds::default();
        assert_eq!(t.bucket(0.0), Bucket::Low);
        assert_eq!(t.bucket(1.0), Bucket::High);
    }

    #[test]
    fn glyph_and_color_per_bucket() {
        assert_eq!(Bucket::Low.glyph(), "x");
        assert_eq!(Bucket::Low.color(), "red");
        assert_eq!(Bucket::Medium.glyph(), "pin");
        assert_eq!(Bucket::Medium.color(), "yellow");
        assert_eq!(Bucket::High.glyph(), "star");
        assert_eq!(Bucket::High.color(), "green");
    }

    #[test]
    fn custom_thresholds_move_the_boundaries() {
        let t = Thresholds {
            low_cutoff: 0.50,
            high_cutoff: 0.80,
        };
        assert_eq!(t.bucket(0.45), Bucket::Low);
        assert_eq!(t.bucket(0.65), Bucket::Medium);
        assert_eq!(t.bucket(0.80), Bucket::High);
    }
}
