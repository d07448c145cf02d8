//! Extractors for values the middleware forwards to handlers.

use std::convert::Infallible;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use super::middleware::NONCE_HEADER;

/// The nonce the CSP middleware generated for this request. `None` on paths
/// excluded from the CSP pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestNonce(pub Option<String>);

impl RequestNonce {
    /// ` nonce="…"` attribute for inline tags, or empty.
    pub fn attr(&self) -> String {
        match &self.0 {
            Some(nonce) => format!(" nonce=\"{}\"", nonce),
            None => String::new(),
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestNonce
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(
            parts
                .headers
                .get(NONCE_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned),
        ))
    }
}
