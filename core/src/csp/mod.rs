//! Content-Security-Policy construction.
//!
//! A fresh [`Nonce`] is drawn per request and fed, together with the
//! deployment flags, into [`build_csp_directive`]. The builder is pure and
//! reentrant; it never fails on malformed optional input, it only produces a
//! narrower policy.

mod builder;
mod directives;
mod nonce;

pub use builder::{
    api_origin, build_csp_directive, build_directive_set, CspOptions, ANALYTICS_BEACON_ORIGIN,
    ANALYTICS_SCRIPT_ORIGIN, LOOPBACK_DEV_ORIGINS,
};
pub use directives::{Directive, DirectiveSet};
pub use nonce::{Nonce, NONCE_BYTES};
