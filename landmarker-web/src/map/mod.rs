//! Interactive map rendering

pub mod leaflet;
pub mod markers;

pub use leaflet::render;
