use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(String),

    #[error("config read error: {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("config parse error")]
    Parse(#[source] toml::de::Error),

    #[error("env var invalid: {key}={value}")]
    EnvInvalid { key: String, value: String },
}

/// The nonce is a security control; there is no weaker fallback.
#[derive(Debug, Error)]
pub enum NonceError {
    #[error("secure random source unavailable")]
    EntropyUnavailable(#[source] rand::Error),

    #[error("malformed nonce token: {0:?}")]
    Malformed(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UpdateError {
    #[error("update context accessed outside of a mounted UpdateProvider")]
    ProviderMissing,
}
