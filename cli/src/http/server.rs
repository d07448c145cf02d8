//! HTTP server lifecycle.

use std::net::SocketAddr;

use alumni_core::api::HttpServerConfig;
use anyhow::Context;
use axum::{middleware, Router};
use tokio::signal;
use tracing::{info, warn};

use crate::http::{
    middleware::{create_timeout_layer, create_trace_layer, csp_middleware, request_logger},
    routes::create_router,
    AppState,
};

/// Router with the full middleware stack. The CSP layer runs innermost so the
/// header lands on every handler response.
pub fn build_app(state: AppState, request_timeout_secs: u64) -> Router {
    let csp = state.csp.clone();
    create_router(state)
        .layer(middleware::from_fn_with_state(csp, csp_middleware))
        .layer(middleware::from_fn(request_logger))
        .layer(create_trace_layer())
        .layer(create_timeout_layer(request_timeout_secs))
}

/// Binds and serves until Ctrl+C, SIGTERM, or a message on `state.shutdown_tx`.
pub async fn start_server(config: &HttpServerConfig, state: AppState) -> anyhow::Result<()> {
    // Resolve listen address
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", config.host, config.port))?;

    // Subscribe before the state moves into the router
    let mut shutdown_rx = state.shutdown_tx.subscribe();
    let app = build_app(state, config.request_timeout_secs);

    // Bind
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("HTTP server listening on http://{}", listener.local_addr()?);

    // Serve until any shutdown source fires
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::select! {
                _ = signal::ctrl_c() => {
                    info!("Received Ctrl+C signal");
                }
                _ = shutdown_rx.recv() => {
                    info!("Received shutdown signal");
                }
                _ = wait_for_sigterm() => {
                    info!("Received SIGTERM signal");
                }
            }

            info!("Starting graceful shutdown...");
        })
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

#[cfg(unix)]
async fn wait_for_sigterm() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            sigterm.recv().await;
        }
        Err(e) => {
            warn!("Failed to install SIGTERM handler: {}", e);
            std::future::pending::<()>().await
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_sigterm() {
    std::future::pending::<()>().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use alumni_core::api::{AppConfig, Environment};
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use std::time::Duration;
    use tokio::sync::broadcast;
    use tower::ServiceExt;

    fn production_app() -> Router {
        let cfg = AppConfig {
            environment: Environment::Production,
            ..AppConfig::default()
        };
        let (shutdown_tx, _) = broadcast::channel(1);
        build_app(AppState::new(&cfg, shutdown_tx), 30)
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_index_nonce_matches_header() {
        let response = production_app().oneshot(get_req("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let policy = response
            .headers()
            .get(header::CONTENT_SECURITY_POLICY)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        let nonce = policy
            .split("'nonce-")
            .nth(1)
            .and_then(|rest| rest.split('\'').next())
            .unwrap()
            .to_string();

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains(&format!("<script nonce=\"{}\">", nonce)));
    }

    #[tokio::test]
    async fn test_static_routes_skip_csp() {
        let app = production_app();
        for uri in ["/sw.js", "/manifest.webmanifest"] {
            let response = app.clone().oneshot(get_req(uri)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{}", uri);
            assert!(response
                .headers()
                .get(header::CONTENT_SECURITY_POLICY)
                .is_none());
        }
    }

    #[tokio::test]
    async fn test_unknown_route_still_gets_policy() {
        let response = production_app()
            .oneshot(get_req("/no-such-page"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response
            .headers()
            .get(header::CONTENT_SECURITY_POLICY)
            .is_some());
    }

    #[tokio::test]
    async fn test_server_lifecycle() {
        let (shutdown_tx, _) = broadcast::channel(1);
        let state = AppState::new(&AppConfig::default(), shutdown_tx.clone());
        let config = HttpServerConfig {
            host: "127.0.0.1".into(),
            port: 0,
            request_timeout_secs: 5,
        };

        let server_handle = tokio::spawn(async move { start_server(&config, state).await });

        tokio::time::sleep(Duration::from_millis(200)).await;
        let _ = shutdown_tx.send(());

        let result = tokio::time::timeout(Duration::from_secs(5), server_handle).await;
        assert!(result.is_ok(), "Server should shutdown gracefully");
        assert!(result.unwrap().unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_invalid_listen_address() {
        let (shutdown_tx, _) = broadcast::channel(1);
        let state = AppState::new(&AppConfig::default(), shutdown_tx);
        let config = HttpServerConfig {
            host: "not an address".into(),
            port: 3000,
            request_timeout_secs: 5,
        };
        assert!(start_server(&config, state).await.is_err());
    }
}
