use url::Url;

use super::directives::{Directive, DirectiveSet};
use super::nonce::Nonce;

pub const ANALYTICS_SCRIPT_ORIGIN: &str = "https://www.googletagmanager.com";
pub const ANALYTICS_BEACON_ORIGIN: &str = "https://www.google-analytics.com";

/// Dev-server and live-reload origins allowed in relaxed mode.
pub const LOOPBACK_DEV_ORIGINS: [&str; 4] = [
    "http://localhost:3000",
    "http://127.0.0.1:3000",
    "http://localhost:8080",
    "http://127.0.0.1:8080",
];

const RELAXED_SCRIPT_TOKENS: [&str; 4] = [
    "'unsafe-inline'",
    "'unsafe-eval'",
    "'wasm-unsafe-eval'",
    "blob:",
];

/// Request-scoped inputs to the policy builder.
///
/// The nonce is a validated [`Nonce`], so it can never break out of its
/// `'nonce-…'` source expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CspOptions<'a> {
    pub nonce: &'a Nonce,
    pub relax_csp: bool,
    pub analytics_id: Option<&'a str>,
    pub api_base: Option<&'a str>,
}

impl<'a> CspOptions<'a> {
    pub fn new(nonce: &'a Nonce, relax_csp: bool) -> Self {
        Self {
            nonce,
            relax_csp,
            analytics_id: None,
            api_base: None,
        }
    }

    pub fn analytics_id(mut self, id: Option<&'a str>) -> Self {
        self.analytics_id = id;
        self
    }

    pub fn api_base(mut self, base: Option<&'a str>) -> Self {
        self.api_base = base;
        self
    }
}

/// `<scheme>://<host>[:port]` of an absolute URL, path dropped.
///
/// Anything that does not parse as an absolute URL with a host yields `None`.
pub fn api_origin(base: &str) -> Option<String> {
    let url = Url::parse(base.trim()).ok()?;
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{}://{}:{}", url.scheme(), host, port),
        None => format!("{}://{}", url.scheme(), host),
    })
}

pub fn build_directive_set(options: &CspOptions<'_>) -> DirectiveSet {
    let mut set = DirectiveSet::baseline();

    if options.analytics_id.is_some_and(|id| !id.trim().is_empty()) {
        set.add(Directive::ScriptSrc, ANALYTICS_SCRIPT_ORIGIN);
        set.add(Directive::ConnectSrc, ANALYTICS_BEACON_ORIGIN);
    }

    if let Some(origin) = options.api_base.and_then(api_origin) {
        set.add(Directive::ConnectSrc, origin);
    }

    if options.relax_csp {
        // Relaxed mode never carries the nonce: 'unsafe-inline' already admits
        // every inline script.
        set.extend(Directive::ScriptSrc, RELAXED_SCRIPT_TOKENS);
        set.add(Directive::ConnectSrc, "ws:");
        set.extend(Directive::ConnectSrc, LOOPBACK_DEV_ORIGINS);
        set.add(Directive::ImgSrc, "blob:");
        set.add(Directive::WorkerSrc, "blob:");
    } else {
        set.add(Directive::ScriptSrc, options.nonce.source_expression());
    }

    set
}

/// Serialized `Content-Security-Policy` header value.
pub fn build_csp_directive(options: &CspOptions<'_>) -> String {
    build_directive_set(options).serialize()
}
