//! `serve` command.

use alumni_core::api::AppConfig;
use tokio::sync::broadcast;

use crate::commands::cli::ServeArgs;
use crate::error::CliError;
use crate::http::{server, AppState};

pub async fn handle_serve(args: ServeArgs, mut cfg: AppConfig) -> Result<(), CliError> {
    // CLI flags win over config file and environment.
    if let Some(host) = args.host {
        cfg.http_server.host = host;
    }
    if let Some(port) = args.port {
        cfg.http_server.port = port;
    }

    log_csp_mode(&cfg);

    let (shutdown_tx, _) = broadcast::channel(1);
    let state = AppState::new(&cfg, shutdown_tx);

    tracing::info!(
        "Starting HTTP server on {}:{} (instance: {})",
        cfg.http_server.host,
        cfg.http_server.port,
        state.instance_id
    );

    server::start_server(&cfg.http_server, state)
        .await
        .map_err(CliError::Server)
}

fn log_csp_mode(cfg: &AppConfig) {
    let relax = cfg.relax_csp();
    if relax && cfg.environment.is_production_classified() {
        tracing::warn!(
            environment = cfg.environment.as_str(),
            "relaxed CSP forced by override in a production-classified environment"
        );
    }
    tracing::info!(
        environment = cfg.environment.as_str(),
        csp_mode = if relax { "relaxed" } else { "strict" },
        analytics = cfg.csp.analytics_id.is_some(),
        api_base = cfg.csp.api_base.as_deref().unwrap_or("-"),
        "CSP configured"
    );
}
