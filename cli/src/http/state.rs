use std::sync::Arc;

use alumni_core::api::{AppConfig, Environment};
use chrono::{DateTime, Local};
use tokio::sync::broadcast;
use uuid::Uuid;

use super::middleware::CspLayerState;

/// Shared state for handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub instance_id: String,
    pub started_at: DateTime<Local>,
    pub environment: Environment,
    pub csp: Arc<CspLayerState>,
    pub shutdown_tx: broadcast::Sender<()>,
}

impl AppState {
    pub fn new(cfg: &AppConfig, shutdown_tx: broadcast::Sender<()>) -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
            started_at: Local::now(),
            environment: cfg.environment,
            csp: Arc::new(CspLayerState::from_config(cfg)),
            shutdown_tx,
        }
    }
}
