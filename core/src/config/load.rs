use std::path::Path;

use super::types::{AppConfig, Environment};
use crate::csp::api_origin;
use crate::error::ConfigError;

pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Loads `config.toml` from the working directory when present, then applies
/// `ALUMNI_*` environment overrides.
pub fn load_default() -> Result<AppConfig, ConfigError> {
    let mut cfg = if Path::new(DEFAULT_CONFIG_FILE).exists() {
        read_file(Path::new(DEFAULT_CONFIG_FILE))?
    } else {
        AppConfig::default()
    };

    apply_env_overrides(&mut cfg, |key| std::env::var(key).ok())?;
    Ok(cfg)
}

/// Like [`load_default`] but the file must exist.
pub fn load_from(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.display().to_string()));
    }
    let mut cfg = read_file(path)?;
    apply_env_overrides(&mut cfg, |key| std::env::var(key).ok())?;
    Ok(cfg)
}

fn read_file(path: &Path) -> Result<AppConfig, ConfigError> {
    let s = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    toml::from_str::<AppConfig>(&s).map_err(ConfigError::Parse)
}

/// Applies overrides from `lookup` (normally the process environment).
/// Blank values are ignored.
pub fn apply_env_overrides<F>(cfg: &mut AppConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(v) = get("ALUMNI_ENV") {
        cfg.environment = Environment::parse(&v).ok_or_else(|| ConfigError::EnvInvalid {
            key: "ALUMNI_ENV".into(),
            value: v.clone(),
        })?;
    }

    if let Some(v) = get("ALUMNI_RELAX_CSP") {
        cfg.csp.relax_override = parse_flag(&v).ok_or_else(|| ConfigError::EnvInvalid {
            key: "ALUMNI_RELAX_CSP".into(),
            value: v.clone(),
        })?;
    }

    if let Some(v) = get("ALUMNI_ANALYTICS_ID") {
        cfg.csp.analytics_id = Some(v.trim().to_string());
    }

    if let Some(v) = get("ALUMNI_API_BASE") {
        cfg.csp.api_base = Some(v.trim().to_string());
    }

    if let Some(v) = get("ALUMNI_HTTP_HOST") {
        cfg.http_server.host = v.trim().to_string();
    }

    if let Some(v) = get("ALUMNI_HTTP_PORT") {
        cfg.http_server.port = v.trim().parse().map_err(|_| ConfigError::EnvInvalid {
            key: "ALUMNI_HTTP_PORT".into(),
            value: v.clone(),
        })?;
    }

    if let Some(base) = cfg.csp.api_base.as_deref() {
        if api_origin(base).is_none() {
            tracing::debug!(api_base = %base, "api_base is not an absolute URL; backend origin will not be allowed");
        }
    }

    Ok(())
}

fn parse_flag(v: &str) -> Option<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
