//! Health check handler.

use crate::state::AppState;
use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "healthy")]
    pub status: String,
    pub api_key_configured: bool,
    /// Whether object storage is configured
    pub storage_configured: bool,
}

/// Liveness plus configuration presence. Never calls out to dependencies.
#[utoipa::path(
    get,
    path = "/health",
    tag = "config",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        api_key_configured: state.synthesis.is_configured(),
        storage_configured: state.public_storage.is_some(),
    })
}
