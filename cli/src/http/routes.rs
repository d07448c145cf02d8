//! Route handlers.

use alumni_core::api::{Banner, WorkerMessage};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::http::{extract::RequestNonce, state::AppState};

const SERVICE_WORKER_JS: &str = r#"self.addEventListener('message', (event) => {
  if (event.data && event.data.type === 'SKIP_WAITING') {
    self.skipWaiting();
  }
});
self.addEventListener('activate', (event) => {
  event.waitUntil(self.clients.claim());
});
"#;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/sw.js", get(service_worker_handler))
        .route("/manifest.webmanifest", get(manifest_handler))
        .fallback(not_found_handler)
        .with_state(state)
}

/// GET / - document shell; the inline bootstrap carries the request nonce.
async fn index_handler(nonce: RequestNonce) -> Html<String> {
    Html(render_shell(&nonce))
}

fn render_shell(nonce: &RequestNonce) -> String {
    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Alumni Association</title>
<link rel="manifest" href="/manifest.webmanifest">
</head>
<body>
<main id="root"></main>
<div id="update-banner" role="{role}" aria-live="{live}" hidden>
<p>A new version of this site is available.</p>
<button type="button" data-action="refresh">Refresh</button>
<button type="button" data-action="dismiss">Dismiss</button>
</div>
<script{nonce}>
(() => {{
  if (!('serviceWorker' in navigator)) return;
  const banner = document.getElementById('update-banner');
  let waiting = null;
  let refreshing = false;
  const announce = (worker) => {{ waiting = worker; banner.hidden = false; }};
  banner.querySelector('[data-action=refresh]').onclick = () => {{
    if (waiting) waiting.postMessage({message});
  }};
  banner.querySelector('[data-action=dismiss]').onclick = () => {{ banner.hidden = true; }};
  navigator.serviceWorker.addEventListener('controllerchange', () => {{
    if (refreshing) return;
    refreshing = true;
    window.location.reload();
  }});
  navigator.serviceWorker.register('/sw.js').then((reg) => {{
    if (reg.waiting && navigator.serviceWorker.controller) announce(reg.waiting);
    reg.addEventListener('updatefound', () => {{
      const installing = reg.installing;
      if (!installing) return;
      installing.addEventListener('statechange', () => {{
        if (installing.state === 'installed' && navigator.serviceWorker.controller) announce(installing);
      }});
    }});
  }});
}})();
</script>
</body>
</html>
"#,
        role = Banner::ROLE,
        live = Banner::ARIA_LIVE,
        nonce = nonce.attr(),
        message = WorkerMessage::SkipWaiting.to_json(),
    )
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub instance_id: String,
    pub environment: String,
    pub csp_mode: String,
    pub started_at: String,
    pub uptime_seconds: f64,
}

async fn not_found_handler() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Html("<!doctype html><title>Not found</title><h1>Page not found</h1>"))
}

/// GET /health
async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let uptime = chrono::Local::now()
        .signed_duration_since(state.started_at)
        .num_milliseconds() as f64
        / 1000.0;

    Json(HealthResponse {
        status: "healthy".into(),
        instance_id: state.instance_id.clone(),
        environment: state.environment.as_str().into(),
        csp_mode: state.csp.mode().into(),
        started_at: state.started_at.to_rfc3339(),
        uptime_seconds: uptime.max(0.0),
    })
}

/// GET /sw.js - never cached so updates are detected promptly.
async fn service_worker_handler() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "application/javascript; charset=utf-8"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        SERVICE_WORKER_JS,
    )
}

/// GET /manifest.webmanifest
async fn manifest_handler() -> impl IntoResponse {
    let manifest = serde_json::json!({
        "name": "Alumni Association",
        "short_name": "Alumni",
        "start_url": "/",
        "display": "standalone",
        "background_color": "#ffffff",
        "theme_color": "#0b3d91",
        "icons": [
            { "src": "/icons/icon-192.png", "sizes": "192x192", "type": "image/png" },
            { "src": "/icons/icon-512.png", "sizes": "512x512", "type": "image/png" }
        ]
    });
    (
        [(header::CONTENT_TYPE, "application/manifest+json")],
        manifest.to_string(),
    )
}
