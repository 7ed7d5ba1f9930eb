//! Built-in web UI
//!
//! A single inline-HTML page that drives the JSON API from the browser:
//! image upload (file picker or camera capture), satellite and stream-summary
//! toggles, the rendered map, deep links, map download, and the review form.

use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::Router;
use crate::AppState;

pub fn ui_routes() -> Router<AppState> {
    Router::new().route("/", get(root_page))
}

/// GET / - landing page
async fn root_page() -> impl IntoResponse {
    let html = PAGE_TEMPLATE.replace("__VERSION__", env!("CARGO_PKG_VERSION"));
    Html(html)
}

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Landmarker</title>
<style>
    * { margin: 0; padding: 0; box-sizing: border-box; }
    body {
        font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
        background-color: #1a1a1a;
        color: #e0e0e0;
        line-height: 1.6;
    }
    header {
        background-color: #2a2a2a;
        border-bottom: 1px solid #3a3a3a;
        padding: 20px;
        display: flex;
        justify-content: space-between;
        align-items: center;
    }
    h1 { font-size: 26px; color: #1c9e44; font-family: monospace; }
    .version { color: #888; font-family: monospace; font-size: 14px; }
    .container { max-width: 960px; margin: 0 auto; padding: 20px; }
    .panel {
        background-color: #2a2a2a;
        border: 1px solid #3a3a3a;
        border-radius: 6px;
        padding: 16px;
        margin-bottom: 20px;
    }
    .panel h2 { font-size: 18px; margin-bottom: 10px; color: #4a9eff; }
    label { margin-right: 14px; }
    button {
        background-color: #1c6f11;
        border: none;
        border-radius: 4px;
        color: #fff;
        padding: 8px 14px;
        cursor: pointer;
        margin: 4px 4px 4px 0;
    }
    button:disabled { background-color: #444; cursor: default; }
    input[type="text"], textarea, input[type="number"] {
        width: 100%;
        background: #1a1a1a;
        border: 1px solid #3a3a3a;
        color: #e0e0e0;
        border-radius: 4px;
        padding: 6px;
        margin-bottom: 8px;
    }
    iframe#map-frame {
        width: 100%;
        height: 480px;
        border: 1px solid #3a3a3a;
        border-radius: 6px;
        background: #fff;
    }
    .review { border-bottom: 1px solid #3a3a3a; padding: 8px 0; }
    .review .who { font-weight: 600; }
    blockquote { border-left: 3px solid #1c6f11; padding-left: 10px; color: #bbb; }
    .hint { color: #888; font-size: 14px; }
    .error { color: #ff6b6b; }
    a { color: #4a9eff; }
</style>
</head>
<body>
<header>
    <h1>LAND-MARKER</h1>
    <span class="version">v__VERSION__</span>
</header>
<div class="container">
    <div class="panel">
        <h2>Upload</h2>
        <p class="hint">Upload a photo of a landmark (png, jpg, jpeg, webp), or point your camera at one.</p>
        <input type="file" id="image" accept=".png,.jpg,.jpeg,.webp" capture="environment">
        <div>
            <label><input type="checkbox" id="satellite"> Satellite map</label>
            <label><input type="checkbox" id="stream"> Stream summary</label>
        </div>
        <button id="identify">Identify landmark</button>
        <p id="status" class="hint"></p>
    </div>

    <div class="panel" id="result-panel" style="display:none">
        <h2 id="best-name"></h2>
        <p id="best-place"></p>
        <p>
            <a id="maps-link" target="_blank">Show in Google Maps</a> &middot;
            <a id="wiki-link" target="_blank">Open Wikipedia Page</a> &middot;
            <a id="download-map" download="map.html">Download Map</a>
        </p>
        <iframe id="map-frame"></iframe>
        <p class="hint">Pin color guide: red = low confidence, yellow = medium, green = high.</p>
    </div>

    <div class="panel" id="summary-panel" style="display:none">
        <h2>LLM Based Summary</h2>
        <blockquote id="summary"></blockquote>
    </div>

    <div class="panel" id="reviews-panel" style="display:none">
        <h2>Reviews</h2>
        <div id="reviews"></div>
        <button id="digest">AI review summary</button>
        <blockquote id="review-digest"></blockquote>
        <h2>Write a review</h2>
        <input type="text" id="rev-username" placeholder="Username">
        <textarea id="rev-text" rows="3" placeholder="Your review"></textarea>
        <input type="number" id="rev-score" min="1" max="10" value="5">
        <button id="submit-review">Submit</button>
        <p id="review-status" class="hint"></p>
    </div>
</div>
<script>
var best = null;

function setStatus(text, isError) {
    var el = document.getElementById('status');
    el.textContent = text;
    el.className = isError ? 'error' : 'hint';
}

document.getElementById('identify').addEventListener('click', async function () {
    var input = document.getElementById('image');
    if (!input.files.length) { setStatus('Please choose an image first.', true); return; }
    var satellite = document.getElementById('satellite').checked;
    var form = new FormData();
    form.append('image', input.files[0]);
    setStatus('Identifying...');
    try {
        var resp = await fetch('/api/identify?satellite=' + satellite, { method: 'POST', body: form });
        var data = await resp.json();
        if (!resp.ok) { setStatus(data.error.message + ' (code ' + data.error.code + ')', true); return; }
        if (!data.detected) { setStatus(data.message, true); return; }
        best = data.best;
        setStatus('Found ' + data.candidates.length + ' candidate location(s).');
        showResult(data);
        loadSummary();
        renderReviews(data.reviews);
        document.getElementById('reviews-panel').style.display = '';
    } catch (e) {
        setStatus('Request failed: ' + e, true);
    }
});

function showResult(data) {
    document.getElementById('result-panel').style.display = '';
    document.getElementById('best-name').textContent = best.name;
    document.getElementById('best-place').textContent =
        (best.city || best.country) ? best.city + ', ' + best.country : 'Unknown Location';
    document.getElementById('maps-link').href = best.google_maps_url;
    document.getElementById('wiki-link').href = best.wikipedia_url;
    document.getElementById('map-frame').srcdoc = data.map_html;
    var blob = new Blob([data.map_html], { type: 'text/html' });
    document.getElementById('download-map').href = URL.createObjectURL(blob);
}

function loadSummary() {
    var panel = document.getElementById('summary-panel');
    var out = document.getElementById('summary');
    panel.style.display = '';
    out.textContent = '';
    var query = 'landmark=' + encodeURIComponent(best.name) +
        '&city=' + encodeURIComponent(best.city) +
        '&country=' + encodeURIComponent(best.country);
    if (document.getElementById('stream').checked) {
        var source = new EventSource('/api/summary/stream?' + query);
        source.addEventListener('delta', function (e) { out.textContent += e.data; });
        source.addEventListener('done', function () { source.close(); });
        source.addEventListener('error', function (e) {
            if (e.data) { out.textContent = 'Summary failed: ' + e.data; }
            source.close();
        });
    } else {
        out.textContent = 'Generating summary...';
        fetch('/api/summary', {
            method: 'POST',
            headers: { 'Content-Type': 'application/json' },
            body: JSON.stringify({ landmark: best.name, city: best.city, country: best.country })
        }).then(function (r) { return r.json(); }).then(function (data) {
            out.textContent = data.summary || ('Summary failed: ' + data.error.message);
        });
    }
}

function renderReviews(reviews) {
    var out = document.getElementById('reviews');
    if (!reviews.length) {
        out.innerHTML = '<p class="hint">No reviews yet. Be the first one to review this landmark!</p>';
        return;
    }
    out.innerHTML = reviews.map(function (r) {
        return '<div class="review"><span class="who"></span> ' +
            '<strong>' + r.rating + '</strong> (' + r.stars + ')' +
            '<blockquote></blockquote></div>';
    }).join('');
    var nodes = out.querySelectorAll('.review');
    reviews.forEach(function (r, i) {
        nodes[i].querySelector('.who').textContent = r.username;
        nodes[i].querySelector('blockquote').textContent = r.text;
    });
}

document.getElementById('submit-review').addEventListener('click', async function () {
    if (!best) { return; }
    var status = document.getElementById('review-status');
    var body = {
        username: document.getElementById('rev-username').value,
        landmark: best.name,
        coordinate: best.longitude + '/' + best.latitude,
        score: parseInt(document.getElementById('rev-score').value, 10),
        text: document.getElementById('rev-text').value
    };
    var resp = await fetch('/api/reviews', {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify(body)
    });
    if (resp.ok) {
        status.textContent = 'Review added successfully.';
        refreshReviews();
    } else {
        var data = await resp.json();
        status.textContent = data.error.message;
    }
});

async function refreshReviews() {
    if (!best) { return; }
    var resp = await fetch('/api/reviews?lat=' + best.latitude + '&lon=' + best.longitude +
        '&name=' + encodeURIComponent(best.name));
    var data = await resp.json();
    renderReviews(data.reviews);
}

document.getElementById('digest').addEventListener('click', async function () {
    if (!best) { return; }
    var out = document.getElementById('review-digest');
    out.textContent = 'Summarizing reviews...';
    var resp = await fetch('/api/reviews/summarize', {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify({
            landmark: best.name, city: best.city, country: best.country,
            lat: best.latitude, lon: best.longitude
        })
    });
    var data = await resp.json();
    if (data.review_count === 0) {
        out.textContent = data.message;
    } else if (data.summary) {
        out.textContent = 'Overall Score: ' + data.overall_score + ' - ' + data.summary;
    } else {
        out.textContent = 'Digest failed: ' + data.error.message;
    }
});
</script>
</body>
</html>
"#;
