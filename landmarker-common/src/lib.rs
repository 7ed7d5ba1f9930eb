//! # Landmarker Common Library
//!
//! Shared domain logic for the Landmarker service:
//! - Candidate, coordinate, and review types
//! - Confidence bucketing policy (marker glyph/color selection)
//! - Incremental map state (best-candidate tracking, bounding box)
//! - Review matching policy (coordinate radius OR fuzzy name)
//! - Error taxonomy with stable numeric codes

pub mod confidence;
pub mod error;
pub mod map_state;
pub mod matching;
pub mod types;

pub use error::{Error, Result};
