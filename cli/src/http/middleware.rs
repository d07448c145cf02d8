//! HTTP middleware: per-request CSP nonce, request logging, timeout, tracing.

use std::sync::Arc;
use std::time::{Duration, Instant};

use alumni_core::api::{
    build_csp_directive, AppConfig, CspConfig, CspOptions, Nonce, NonceError,
};
use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderName, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{debug, error, info, warn};

/// Request header carrying the nonce to downstream handlers. Never sent to
/// the client.
pub const NONCE_HEADER: HeaderName = HeaderName::from_static("x-nonce");

/// Diagnostic tag on partial-render (RSC) requests outside production-classified
/// environments.
pub const PARTIAL_RENDER_HEADER: HeaderName = HeaderName::from_static("x-partial-render");

const PARTIAL_RENDER_QUERY: &str = "_rsc";
const PARTIAL_RENDER_CONTENT_TYPE: &str = "text/x-component";

/// Where per-request nonces come from.
pub type NonceSource = fn() -> Result<Nonce, NonceError>;

/// Read-only CSP inputs shared by every request.
#[derive(Debug, Clone)]
pub struct CspLayerState {
    pub relax_csp: bool,
    /// Preview or production; same classification as the strict policy.
    pub production: bool,
    pub config: CspConfig,
    pub nonce_source: NonceSource,
}

impl Default for CspLayerState {
    fn default() -> Self {
        Self {
            relax_csp: false,
            production: false,
            config: CspConfig::default(),
            nonce_source: Nonce::generate,
        }
    }
}

impl CspLayerState {
    pub fn from_config(cfg: &AppConfig) -> Self {
        Self {
            relax_csp: cfg.relax_csp(),
            production: cfg.environment.is_production_classified(),
            config: cfg.csp.clone(),
            ..Self::default()
        }
    }

    pub fn mode(&self) -> &'static str {
        if self.relax_csp {
            "relaxed"
        } else {
            "strict"
        }
    }

    fn policy(&self, nonce: &Nonce) -> String {
        build_csp_directive(
            &CspOptions::new(nonce, self.relax_csp)
                .analytics_id(self.config.analytics_id.as_deref())
                .api_base(self.config.api_base.as_deref()),
        )
    }
}

/// Generates a nonce, forwards it as `x-nonce`, and sets
/// `Content-Security-Policy` on the response.
///
/// Requests are aborted with 500 when no nonce can be produced; they are
/// never served without a policy.
pub async fn csp_middleware(
    State(csp): State<Arc<CspLayerState>>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    // Static assets, icons, manifest and worker script skip the pipeline
    if csp.config.is_excluded(req.uri().path()) {
        return next.run(req).await;
    }

    // 1. Fresh nonce; no request is served without one
    let nonce = match (csp.nonce_source)() {
        Ok(nonce) => nonce,
        Err(e) => {
            error!(error = %e, uri = %req.uri(), "aborting request: nonce generation failed");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    // 2. Policy for this request
    let policy = csp.policy(&nonce);
    let (nonce_value, policy_value) = match (
        HeaderValue::from_str(nonce.as_str()),
        HeaderValue::from_str(&policy),
    ) {
        (Ok(n), Ok(p)) => (n, p),
        _ => {
            error!(uri = %req.uri(), "aborting request: CSP header value is not valid");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    // 3. Hand the same nonce to downstream rendering
    req.headers_mut().insert(NONCE_HEADER, nonce_value);

    // 4. Diagnostic tag, never in preview/production
    if !csp.production && is_partial_render(&req) {
        debug!(uri = %req.uri(), "partial render request");
        req.headers_mut()
            .insert(PARTIAL_RENDER_HEADER, HeaderValue::from_static("1"));
    }

    // 5. Run the handler, then attach the header
    let mut response = next.run(req).await;
    response
        .headers_mut()
        .insert(header::CONTENT_SECURITY_POLICY, policy_value);
    response
}

fn is_partial_render(req: &Request<Body>) -> bool {
    let by_query = req.uri().query().is_some_and(|query| {
        query
            .split('&')
            .any(|pair| pair.split('=').next() == Some(PARTIAL_RENDER_QUERY))
    });

    let by_accept = req
        .headers()
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains(PARTIAL_RENDER_CONTENT_TYPE));

    by_query || by_accept
}

/// Request timeout layer; slow handlers get 408 instead of holding the
/// connection.
pub fn create_timeout_layer(secs: u64) -> TimeoutLayer {
    TimeoutLayer::new(Duration::from_secs(secs))
}

/// HTTP trace layer (spans per request, 5xx classified as failures).
pub fn create_trace_layer(
) -> TraceLayer<tower_http::classify::SharedClassifier<tower_http::classify::ServerErrorsAsFailures>>
{
    TraceLayer::new_for_http()
}

/// Logs method, uri, status and duration of every request.
pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let start = Instant::now();

    // Run the request
    let response = next.run(req).await;

    let duration = start.elapsed();
    let status = response.status();

    // Level by status class: 4xx/5xx warn, everything else info
    if status.is_client_error() || status.is_server_error() {
        warn!(
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            duration_ms = %duration.as_millis(),
            "Request failed"
        );
    } else {
        info!(
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            duration_ms = %duration.as_millis(),
            "Request completed"
        );
    }

    response
}
