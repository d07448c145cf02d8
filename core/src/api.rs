//! Stable re-exports for consumers (`cli` and external crates).
//!
//! Prefer importing from `alumni_core::api` instead of reaching into internal modules.

pub use crate::config::{
    apply_env_overrides, load_default, load_from, AppConfig, CspConfig, Environment,
    HttpServerConfig, LoggingConfig,
};
pub use crate::csp::{
    api_origin, build_csp_directive, build_directive_set, CspOptions, Directive, DirectiveSet,
    Nonce, NONCE_BYTES,
};
pub use crate::error::{ConfigError, NonceError, UpdateError};
pub use crate::update::{
    Banner, BannerAction, Registration, Reloader, UpdateContext, UpdateProvider, UpdateScope,
    UpdateSnapshot, UpdateStore, WorkerHandle, WorkerMessage,
};
