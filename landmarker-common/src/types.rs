//! Core data types: recognition candidates, coordinates, and reviews

use crate::{Error, Result};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// One landmark candidate returned by a recognition call
///
/// Lifetime is a single request; candidates are never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Landmark name as reported by the recognizer
    pub name: String,
    /// Recognition confidence in [0, 1]
    pub confidence: f64,
    pub latitude: f64,
    pub longitude: f64,
}

impl Candidate {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate {
            longitude: self.longitude,
            latitude: self.latitude,
        }
    }
}

/// Geographic coordinate with the legacy `"lon/lat"` text encoding
///
/// The review store persists coordinates as `"{lon}/{lat}"` text; this type
/// parses and formats that encoding at the boundary so the rest of the code
/// works with numbers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub longitude: f64,
    pub latitude: f64,
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.longitude, self.latitude)
    }
}

impl FromStr for Coordinate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (lon, lat) = s
            .split_once('/')
            .ok_or_else(|| Error::InvalidInput(format!("malformed coordinate: {:?}", s)))?;
        let longitude: f64 = lon
            .trim()
            .parse()
            .map_err(|_| Error::InvalidInput(format!("malformed longitude: {:?}", lon)))?;
        let latitude: f64 = lat
            .trim()
            .parse()
            .map_err(|_| Error::InvalidInput(format!("malformed latitude: {:?}", lat)))?;
        Ok(Coordinate {
            longitude,
            latitude,
        })
    }
}

// Serialized as the wire text so JSON payloads and stored rows agree.
impl Serialize for Coordinate {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Coordinate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(|e: Error| D::Error::custom(e.to_string()))
    }
}

/// A user-submitted landmark review
///
/// Created once by submission and never mutated afterwards; there is no
/// edit or delete path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub username: String,
    /// Landmark the review was written against
    pub landmark: String,
    /// Stored as `"lon/lat"` text
    pub coordinate: Coordinate,
    /// Integer score, 1 through 10
    pub score: i64,
    /// Review body
    pub text: String,
}

impl Review {
    /// Write-path validation: presence of username/text and score range only
    pub fn validate(&self) -> Result<()> {
        if self.username.trim().is_empty() {
            return Err(Error::InvalidInput("username must not be empty".into()));
        }
        if self.text.trim().is_empty() {
            return Err(Error::InvalidInput("review text must not be empty".into()));
        }
        if !(1..=10).contains(&self.score) {
            return Err(Error::InvalidInput(format!(
                "score must be between 1 and 10, got {}",
                self.score
            )));
        }
        Ok(())
    }
}
