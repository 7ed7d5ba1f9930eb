//! Incremental map state for one recognition pass
//!
//! Collects markers in arrival order, tracks the best candidate seen so far
//! with a running max over confidence, and maintains the bounding box of all
//! marker positions. Each insertion is O(1).

use crate::confidence::{Bucket, Thresholds};
use crate::types::Candidate;

/// One placed marker: the candidate plus its assigned bucket
#[derive(Debug, Clone)]
pub struct Marker {
    pub candidate: Candidate,
    pub bucket: Bucket,
}

/// Bounding box over all marker positions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_latitude: f64,
    pub min_longitude: f64,
    pub max_latitude: f64,
    pub max_longitude: f64,
}

impl Bounds {
    fn for_point(lat: f64, lon: f64) -> Self {
        Self {
            min_latitude: lat,
            min_longitude: lon,
            max_latitude: lat,
            max_longitude: lon,
        }
    }

    fn extend(&mut self, lat: f64, lon: f64) {
        self.min_latitude = self.min_latitude.min(lat);
        self.min_longitude = self.min_longitude.min(lon);
        self.max_latitude = self.max_latitude.max(lat);
        self.max_longitude = self.max_longitude.max(lon);
    }
}

/// Map state mutated as candidates are added
///
/// Exactly one candidate is ever the "most matched" per pass: the one with
/// strictly greatest confidence observed so far. Ties keep the first seen.
#[derive(Debug, Clone)]
pub struct MapState {
    thresholds: Thresholds,
    markers: Vec<Marker>,
    best: Option<Candidate>,
    bounds: Option<Bounds>,
}

impl MapState {
    pub fn new(thresholds: Thresholds) -> Self {
        Self {
            thresholds,
            markers: Vec::new(),
            best: None,
            bounds: None,
        }
    }

    /// Place a candidate on the map, returning its bucket
    pub fn add_candidate(&mut self, candidate: Candidate) -> Bucket {
        let bucket = self.thresholds.bucket(candidate.confidence);

        match &mut self.bounds {
            Some(bounds) => bounds.extend(candidate.latitude, candidate.longitude),
            None => {
                self.bounds = Some(Bounds::for_point(candidate.latitude, candidate.longitude));
            }
        }

        // Strictly greater, so the first-seen candidate wins ties.
        let is_new_best = self
            .best
            .as_ref()
            .map_or(true, |best| candidate.confidence > best.confidence);
        if is_new_best {
            self.best = Some(candidate.clone());
        }

        self.markers.push(Marker { candidate, bucket });
        bucket
    }

    /// Markers in arrival order
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// The most-matched candidate so far, if any
    pub fn best(&self) -> Option<&Candidate> {
        self.best.as_ref()
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(name: &str, confidence: f64, lat: f64, lon: f64) -> Candidate {
        Candidate {
            name: name.into(),
            confidence,
            latitude: lat,
            longitude: lon,
        }
    }

    #[test]
    fn best_is_running_max_by_confidence() {
        let mut state = MapState::new(Thresholds::default());
        state.add_candidate(candidate("a", 0.4, 1.0, 1.0));
        state.add_candidate(candidate("b", 0.9, 2.0, 2.0));
        state.add_candidate(candidate("c", 0.7, 3.0, 3.0));
        assert_eq!(state.best().unwrap().name, "b");
    }

    #[test]
    fn ties_keep_the_first_seen() {
        let mut state = MapState::new(Thresholds::default());
        state.add_candidate(candidate("first", 0.6, 1.0, 1.0));
        state.add_candidate(candidate("second", 0.6, 2.0, 2.0));
        assert_eq!(state.best().unwrap().name, "first");
    }

    #[test]
    fn empty_state_has_no_best_or_bounds() {
        let state = MapState::new(Thresholds::default());
        assert!(state.is_empty());
        assert!(state.best().is_none());
        assert!(state.bounds().is_none());
    }

    #[test]
    fn bounds_cover_all_markers() {
        let mut state = MapState::new(Thresholds::default());
        state.add_candidate(candidate("a", 0.5, 40.0, 49.0));
        state.add_candidate(candidate("b", 0.5, 41.5, 47.0));
        state.add_candidate(candidate("c", 0.5, 39.0, 50.0));
        let bounds = state.bounds().unwrap();
        assert_eq!(bounds.min_latitude, 39.0);
        assert_eq!(bounds.max_latitude, 41.5);
        assert_eq!(bounds.min_longitude, 47.0);
        assert_eq!(bounds.max_longitude, 50.0);
    }

    #[test]
    fn markers_keep_arrival_order_and_buckets() {
        let mut state = MapState::new(Thresholds::default());
        assert_eq!(state.add_candidate(candidate("a", 0.2, 0.0, 0.0)), Bucket::Low);
        assert_eq!(state.add_candidate(candidate("b", 0.5, 0.0, 0.0)), Bucket::Medium);
        assert_eq!(state.add_candidate(candidate("c", 0.9, 0.0, 0.0)), Bucket::High);
        let names: Vec<_> = state.markers().iter().map(|m| m.candidate.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }
}
