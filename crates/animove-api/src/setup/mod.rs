//! Application setup and initialization

pub mod routes;
pub mod server;
pub mod storage;

use crate::registry::TaskRegistry;
use crate::services::CleanupService;
use crate::state::AppState;
use animove_core::Config;
use animove_synthesis::DashScopeClient;
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config
        .validate()
        .context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(config.environment())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!("Configuration loaded and validated successfully");

    let state = build_state(config).await?;
    start_background_services(&state);

    let router = routes::setup_routes(&state.config, state.clone())?;

    Ok((state, router))
}

/// Build the shared state: local directories, object storage, synthesis client, registry.
pub async fn build_state(config: Config) -> Result<Arc<AppState>> {
    let (uploads, downloads) = storage::setup_local_storage(&config).await?;
    let public_storage = storage::setup_public_storage(&config)?;

    let synthesis = DashScopeClient::new(
        config.dashscope_api_key().map(String::from),
        config.dashscope_base_url(),
        config.synthesis_model(),
    )
    .context("Failed to create synthesis client")?;
    if !config.api_key_configured() {
        tracing::warn!("DASHSCOPE_API_KEY is not set; generation and status requests will fail");
    }

    let retention_secs = config.task_retention_secs();
    let capacity = config.task_registry_capacity();
    if retention_secs == 0 && capacity == 0 {
        tracing::warn!("Task registry is unbounded; set TASK_RETENTION_SECS or TASK_REGISTRY_CAPACITY to cap memory");
    }
    let registry = TaskRegistry::with_policy(
        Some(Duration::from_secs(retention_secs)),
        Some(capacity),
    );

    Ok(Arc::new(AppState {
        config,
        registry,
        uploads,
        downloads,
        public_storage,
        synthesis: Arc::new(synthesis),
    }))
}

/// Start the local file retention sweep when enabled.
fn start_background_services(state: &Arc<AppState>) {
    let hours = state.config.file_retention_hours();
    if hours == 0 {
        return;
    }

    let every = Duration::from_secs(state.config.file_cleanup_interval_secs());
    let cleanup = Arc::new(CleanupService::new(
        vec![state.uploads.clone(), state.downloads.clone()],
        Duration::from_secs(hours * 3600),
        every,
    ));
    let _handle = cleanup.start();

    tracing::info!(
        retention_hours = hours,
        interval_secs = every.as_secs(),
        "File cleanup service started"
    );
}
