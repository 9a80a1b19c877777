use crate::state::AppState;
use animove_core::models::{MediaKind, SynthesisMode};
use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

/// Client-facing configuration. Booleans and limits only, never credentials.
#[derive(Debug, Serialize, ToSchema)]
pub struct ConfigResponse {
    pub success: bool,
    pub api_key_configured: bool,
    pub oss_configured: bool,
    /// `oss` or `local`
    pub storage_backend: String,
    pub default_mode: SynthesisMode,
    pub modes: Vec<SynthesisMode>,
    /// Bytes
    pub max_image_size: usize,
    /// Bytes
    pub max_video_size: usize,
    pub image_extensions: Vec<String>,
    pub video_extensions: Vec<String>,
}

fn extensions(kind: MediaKind) -> Vec<String> {
    kind.allowed_extensions()
        .iter()
        .map(|e| e.to_string())
        .collect()
}

#[utoipa::path(
    get,
    path = "/api/config",
    tag = "config",
    responses((status = 200, description = "Upload limits and feature flags", body = ConfigResponse))
)]
pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<ConfigResponse> {
    let config = &state.config;
    let storage_backend = state
        .public_storage
        .as_ref()
        .map(|s| s.backend_type())
        .unwrap_or(animove_core::StorageBackend::Local);

    Json(ConfigResponse {
        success: true,
        api_key_configured: state.synthesis.is_configured(),
        oss_configured: state.public_storage.is_some(),
        storage_backend: storage_backend.to_string(),
        default_mode: config.default_mode(),
        modes: SynthesisMode::ALL.to_vec(),
        max_image_size: config.max_image_size_bytes(),
        max_video_size: config.max_video_size_bytes(),
        image_extensions: extensions(MediaKind::Image),
        video_extensions: extensions(MediaKind::Video),
    })
}
