use alumni_core::api::{ConfigError, NonceError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("nonce error: {0}")]
    Nonce(#[from] NonceError),

    #[error("server error: {0:#}")]
    Server(#[source] anyhow::Error),
}
