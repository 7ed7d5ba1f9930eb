//! Marker glyphs and popups
//!
//! One SVG div-icon per confidence bucket: an "x" for low, a map pin for
//! medium, a star for high. Stroke and fill take the bucket color, which is
//! the same color the accuracy circle uses.

use landmarker_common::confidence::Bucket;

/// Accuracy-circle radius in meters
pub const ACCURACY_CIRCLE_RADIUS_M: f64 = 180.0;
/// Accuracy-circle opacity
pub const ACCURACY_CIRCLE_OPACITY: f64 = 0.5;

/// SVG markup for a bucket's marker glyph
pub fn marker_svg(bucket: Bucket) -> String {
    let color = bucket.color();
    match bucket {
        Bucket::Medium => format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="30" height="30" viewBox="0 0 24 24" fill="none" stroke="{color}" stroke-width="2" stroke-linecap="round" stroke-linejoin="round"><path d="M21 10c0 7-9 13-9 13s-9-6-9-13a9 9 0 0 1 18 0z"></path><circle cx="12" cy="10" r="3" fill="{color}"></circle></svg>"#
        ),
        Bucket::High => format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="30" height="30" viewBox="0 0 24 24" fill="{color}" stroke="{color}" stroke-width="2" stroke-linecap="round" stroke-linejoin="round"><polygon points="12 2 15.09 8.5 22 9.27 17 14 18.18 21 12 17.77 5.82 21 7 14 2 9.27 8.91 8.5 12 2"></polygon></svg>"#
        ),
        Bucket::Low => format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="30" height="30" viewBox="0 0 24 24" fill="{color}" stroke="{color}" stroke-width="2" stroke-linecap="round" stroke-linejoin="round"><line x1="18" y1="6" x2="6" y2="18"></line><line x1="6" y1="6" x2="18" y2="18"></line></svg>"#
        ),
    }
}

/// Popup markup for a placed marker
pub fn popup_html(name: &str, confidence: f64) -> String {
    format!(
        "<strong>{}</strong><br><em>Matched: {:.2}%</em>",
        escape_html(name),
        confidence * 100.0
    )
}

/// Minimal HTML escaping for text interpolated into markup
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
