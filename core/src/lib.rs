//! Request-time security headers and service-worker update lifecycle for the
//! alumni association site.
//!
//! - [`csp`]: nonce generation and Content-Security-Policy directive building
//! - [`update`]: waiting-worker store, update context, registration contract
//! - [`config`]: `config.toml` + environment overrides
//!
//! Consumers should import from [`api`].

pub mod api;
pub mod config;
pub mod csp;
pub mod error;
pub mod update;
