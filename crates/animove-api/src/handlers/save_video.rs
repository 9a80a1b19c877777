use crate::error::{EnvelopeError, ValidatedJson};
use crate::services::ResultFetcher;
use crate::state::AppState;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SaveVideoRequest {
    /// Result URL reported by `/api/task/{task_id}`
    #[serde(default)]
    pub video_url: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SaveVideoResponse {
    pub success: bool,
    /// `result_<8 hex>.mp4`
    pub filename: String,
    /// Relay download URL
    pub url: String,
    pub size: u64,
}

/// Copy a finished result video to the relay so it can be downloaded later.
#[utoipa::path(
    post,
    path = "/api/save-video",
    tag = "tasks",
    request_body = SaveVideoRequest,
    responses(
        (status = 200, description = "Video saved; failures carry `success: false` and an ErrorResponse body", body = SaveVideoResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(operation = "save_video"))]
pub async fn save_video(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<SaveVideoRequest>,
) -> Result<Json<SaveVideoResponse>, EnvelopeError> {
    let video_url = request.video_url.unwrap_or_default();
    let artifact = ResultFetcher::new(&state).fetch(&video_url).await?;

    Ok(Json(SaveVideoResponse {
        success: true,
        filename: artifact.filename,
        url: artifact.url,
        size: artifact.size,
    }))
}
