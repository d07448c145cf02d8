use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub environment: Environment,

    #[serde(default)]
    pub csp: CspConfig,

    #[serde(default)]
    pub http_server: HttpServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Effective relaxed-CSP flag for this deployment.
    pub fn relax_csp(&self) -> bool {
        self.csp.relax_csp(self.environment)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    /// Production build served from a preview deployment.
    Preview,
    Production,
}

impl Environment {
    pub fn is_production(self) -> bool {
        matches!(self, Environment::Production)
    }

    /// Preview deployments run production builds and get the strict policy
    /// unless the relax override is set.
    pub fn is_production_classified(self) -> bool {
        matches!(self, Environment::Preview | Environment::Production)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Preview => "preview",
            Environment::Production => "production",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Some(Environment::Development),
            "preview" => Some(Environment::Preview),
            "production" | "prod" => Some(Environment::Production),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CspConfig {
    /// Forces the relaxed policy even in production-classified environments.
    #[serde(default)]
    pub relax_override: bool,

    #[serde(default)]
    pub analytics_id: Option<String>,

    #[serde(default)]
    pub api_base: Option<String>,

    /// Path prefixes that bypass nonce/CSP computation entirely.
    #[serde(default = "default_excluded_prefixes")]
    pub excluded_prefixes: Vec<String>,
}

fn default_excluded_prefixes() -> Vec<String> {
    [
        "/_next/static",
        "/_next/image",
        "/static/",
        "/icons/",
        "/favicon.ico",
        "/manifest.webmanifest",
        "/sw.js",
        "/workbox-",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Default for CspConfig {
    fn default() -> Self {
        Self {
            relax_override: false,
            analytics_id: None,
            api_base: None,
            excluded_prefixes: default_excluded_prefixes(),
        }
    }
}

impl CspConfig {
    pub fn relax_csp(&self, environment: Environment) -> bool {
        !environment.is_production_classified() || self.relax_override
    }

    pub fn is_excluded(&self, path: &str) -> bool {
        self.excluded_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "default_http_host")]
    pub host: String,

    #[serde(default = "default_http_port")]
    pub port: u16,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_http_host() -> String {
    "127.0.0.1".to_string()
}

fn default_http_port() -> u16 {
    3000
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: default_http_host(),
            port: default_http_port(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// When set, logs are also written to daily rolling files here.
    #[serde(default)]
    pub directory: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relax_follows_environment() {
        let csp = CspConfig::default();
        assert!(csp.relax_csp(Environment::Development));
        assert!(!csp.relax_csp(Environment::Preview));
        assert!(!csp.relax_csp(Environment::Production));
    }

    #[test]
    fn test_relax_override_wins_in_production() {
        let csp = CspConfig {
            relax_override: true,
            ..CspConfig::default()
        };
        assert!(csp.relax_csp(Environment::Production));
        assert!(csp.relax_csp(Environment::Preview));
    }

    #[test]
    fn test_default_exclusions() {
        let csp = CspConfig::default();
        assert!(csp.is_excluded("/_next/static/chunks/main.js"));
        assert!(csp.is_excluded("/icons/icon-192.png"));
        assert!(csp.is_excluded("/sw.js"));
        assert!(csp.is_excluded("/manifest.webmanifest"));
        assert!(!csp.is_excluded("/"));
        assert!(!csp.is_excluded("/events/reunion-2024"));
    }

    #[test]
    fn test_environment_parse() {
        assert_eq!(Environment::parse("Production"), Some(Environment::Production));
        assert_eq!(Environment::parse(" preview "), Some(Environment::Preview));
        assert_eq!(Environment::parse("dev"), Some(Environment::Development));
        assert_eq!(Environment::parse("staging"), None);
    }

    #[test]
    fn test_parse_partial_toml() {
        let cfg: AppConfig = toml::from_str(
            r#"
environment = "production"

[csp]
analytics_id = "G-123456"
"#,
        )
        .unwrap();
        assert_eq!(cfg.environment, Environment::Production);
        assert_eq!(cfg.csp.analytics_id.as_deref(), Some("G-123456"));
        assert!(!cfg.csp.excluded_prefixes.is_empty());
        assert_eq!(cfg.http_server.port, 3000);
        assert!(!cfg.relax_csp());
    }
}
