use crate::error::{ErrorResponse, HttpAppError};
use crate::services::UploadService;
use crate::state::AppState;
use animove_core::models::{MediaKind, UploadedAsset};
use animove_core::StorageBackend;
use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

const LOCAL_ONLY_WARNING: &str = "Object storage is not configured: the file is only served by this relay and its URL is not publicly reachable, so the synthesis service cannot fetch it";

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    pub success: bool,
    pub filename: String,
    /// Public object-storage URL, or the relay URL when running local-only
    pub url: String,
    pub size: u64,
    /// `oss` or `local`
    pub storage: String,
    pub content_type: String,
    /// Relay URL of the local copy, when `url` is the public one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl From<UploadedAsset> for UploadResponse {
    fn from(asset: UploadedAsset) -> Self {
        let url = asset.primary_url().to_string();
        let (local_url, warning) = match asset.storage {
            StorageBackend::Oss => (Some(asset.local_url), None),
            StorageBackend::Local => (None, Some(LOCAL_ONLY_WARNING.to_string())),
        };
        UploadResponse {
            success: true,
            filename: asset.filename,
            url,
            size: asset.size,
            storage: asset.storage.to_string(),
            content_type: asset.content_type.to_string(),
            local_url,
            warning,
        }
    }
}

async fn upload(
    state: &AppState,
    kind: MediaKind,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, HttpAppError> {
    let asset = UploadService::new(state).upload(kind, multipart).await?;
    Ok(Json(UploadResponse::from(asset)))
}

#[utoipa::path(
    post,
    path = "/api/upload/image",
    tag = "uploads",
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "Field `image` (or `file`): jpg, jpeg, png, bmp or webp"),
    responses(
        (status = 200, description = "Image uploaded", body = UploadResponse),
        (status = 400, description = "Missing file or unsupported format", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 502, description = "Object storage upload failed", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_image"))]
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, HttpAppError> {
    upload(&state, MediaKind::Image, multipart).await
}

#[utoipa::path(
    post,
    path = "/api/upload/video",
    tag = "uploads",
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "Field `video` (or `file`): mp4, avi or mov"),
    responses(
        (status = 200, description = "Video uploaded", body = UploadResponse),
        (status = 400, description = "Missing file or unsupported format", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 502, description = "Object storage upload failed", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_video"))]
pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, HttpAppError> {
    upload(&state, MediaKind::Video, multipart).await
}
