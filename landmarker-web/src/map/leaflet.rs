//! Self-contained Leaflet map document
//!
//! Renders a `MapState` into a standalone HTML page: one div-icon marker and
//! one accuracy circle per candidate, an OpenStreetMap base layer, an
//! optional Esri satellite layer behind a layer control, and a fit-to-bounds
//! call when at least one marker exists. The document has no server-side
//! state and is directly downloadable.

use super::markers::{
    marker_svg, popup_html, ACCURACY_CIRCLE_OPACITY, ACCURACY_CIRCLE_RADIUS_M,
};
use landmarker_common::map_state::MapState;

const OSM_TILE_URL: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";
const OSM_ATTRIBUTION: &str = "&copy; OpenStreetMap contributors";
const ESRI_TILE_URL: &str =
    "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}";
const ESRI_ATTRIBUTION: &str = "Esri";

const LEAFLET_CSS_URL: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS_URL: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";

const INITIAL_ZOOM: u32 = 2;
const FIT_BOUNDS_PADDING_PX: u32 = 40;
const FIT_BOUNDS_MAX_ZOOM: u32 = 17;

/// Render a map state into a self-contained HTML document
pub fn render(state: &MapState, satellite: bool) -> String {
    // Center on the most-matched candidate, or the null island default.
    let (center_lat, center_lon) = state
        .best()
        .map_or((0.0, 0.0), |best| (best.latitude, best.longitude));

    let mut script = String::new();
    script.push_str(&format!(
        "var map = L.map('map').setView([{}, {}], {});\n",
        center_lat, center_lon, INITIAL_ZOOM
    ));
    script.push_str(&format!(
        "var base = L.tileLayer('{}', {{attribution: '{}'}}).addTo(map);\n",
        OSM_TILE_URL, OSM_ATTRIBUTION
    ));
    if satellite {
        script.push_str(&format!(
            "var satellite = L.tileLayer('{}', {{attribution: '{}'}}).addTo(map);\n\
             L.control.layers({{'OpenStreetMap': base, 'Esri Satellite': satellite}}).addTo(map);\n",
            ESRI_TILE_URL, ESRI_ATTRIBUTION
        ));
    }

    for marker in state.markers() {
        let candidate = &marker.candidate;
        // Circle first so the glyph draws on top of it.
        script.push_str(&format!(
            "L.circle([{lat}, {lon}], {{radius: {radius}, color: '{color}', fillColor: '{color}', fill: true, opacity: {opacity}, fillOpacity: {opacity}}}).addTo(map).bindPopup('Accuracy');\n",
            lat = candidate.latitude,
            lon = candidate.longitude,
            radius = ACCURACY_CIRCLE_RADIUS_M,
            color = marker.bucket.color(),
            opacity = ACCURACY_CIRCLE_OPACITY,
        ));
        script.push_str(&format!(
            "L.marker([{lat}, {lon}], {{icon: L.divIcon({{html: '{icon}', className: '', iconSize: [30, 30], iconAnchor: [15, 15]}})}}).addTo(map).bindPopup('{popup}');\n",
            lat = candidate.latitude,
            lon = candidate.longitude,
            icon = escape_js(&marker_svg(marker.bucket)),
            popup = escape_js(&popup_html(&candidate.name, candidate.confidence)),
        ));
    }

    if let Some(bounds) = state.bounds() {
        script.push_str(&format!(
            "map.fitBounds([[{}, {}], [{}, {}]], {{padding: [{pad}, {pad}], maxZoom: {max}}});\n",
            bounds.min_latitude,
            bounds.min_longitude,
            bounds.max_latitude,
            bounds.max_longitude,
            pad = FIT_BOUNDS_PADDING_PX,
            max = FIT_BOUNDS_MAX_ZOOM,
        ));
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Landmarker Map</title>
<link rel="stylesheet" href="{css}">
<script src="{js}"></script>
<style>html, body, #map {{ height: 100%; margin: 0; }}</style>
</head>
<body>
<div id="map"></div>
<script>
{script}</script>
</body>
</html>
"#,
        css = LEAFLET_CSS_URL,
        js = LEAFLET_JS_URL,
        script = script,
    )
}

/// Escape text for inclusion in a single-quoted JS string literal
fn escape_js(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('\n', "\\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use landmarker_common::confidence::Thresholds;
    use landmarker_common::types::Candidate;

    fn state_with(candidates: &[(&str, f64, f64, f64)]) -> MapState {
        let mut state = MapState::new(Thresholds::default());
        for (name, confidence, lat, lon) in candidates {
            state.add_candidate(Candidate {
                name: (*name).into(),
                confidence: *confidence,
                latitude: *lat,
                longitude: *lon,
            });
        }
        state
    }

    #[test]
    fn empty_state_renders_a_world_map() {
        let html = render(&state_with(&[]), false);
        assert!(html.contains("L.map('map').setView([0, 0], 2)"));
        assert!(!html.contains("fitBounds"));
        assert!(!html.contains("L.marker"));
    }

    #[test]
    fn markers_and_circles_share_the_bucket_color() {
        let html = render(&state_with(&[("Maiden Tower", 0.9, 40.3664, 49.8371)]), false);
        assert!(html.contains("color: 'green'"));
        assert!(html.contains("stroke=\\\"green\\\"") || html.contains("stroke=\"green\""));
        assert!(html.contains("Matched: 90.00%"));
    }

    #[test]
    fn low_confidence_draws_red() {
        let html = render(&state_with(&[("Blur", 0.2, 1.0, 2.0)]), false);
        assert!(html.contains("color: 'red'"));
    }

    #[test]
    fn satellite_layer_is_opt_in() {
        let markers = &[("Maiden Tower", 0.9, 40.0, 49.0)];
        let plain = render(&state_with(markers), false);
        let sat = render(&state_with(markers), true);
        assert!(!plain.contains("Esri"));
        assert!(sat.contains(ESRI_TILE_URL));
        assert!(sat.contains("L.control.layers"));
    }

    #[test]
    fn bounds_cover_every_marker() {
        let html = render(
            &state_with(&[("a", 0.5, 40.0, 49.0), ("b", 0.5, 41.5, 47.0)]),
            false,
        );
        assert!(html.contains("map.fitBounds([[40, 47], [41.5, 49]]"));
    }

    #[test]
    fn document_is_self_contained_html() {
        let html = render(&state_with(&[("a", 0.5, 40.0, 49.0)]), false);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(LEAFLET_JS_URL));
        assert!(html.contains(OSM_TILE_URL));
    }

    #[test]
    fn names_with_quotes_do_not_break_the_script() {
        let html = render(&state_with(&[("L'Arc de Triomphe", 0.9, 48.87, 2.29)]), false);
        assert!(html.contains("L\\'Arc"));
    }
}
