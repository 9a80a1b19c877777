use crate::error::{EnvelopeError, ValidatedJson};
use crate::services::{GenerateParams, GenerationService};
use crate::state::AppState;
use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct GenerateResponse {
    pub success: bool,
    pub task_id: String,
    #[schema(example = "PENDING")]
    pub task_status: String,
}

/// Submit an image + driving video pair for synthesis.
///
/// Failures are reported with `success: false` in a `200` response.
#[utoipa::path(
    post,
    path = "/api/generate",
    tag = "tasks",
    request_body = GenerateParams,
    responses(
        (status = 200, description = "Task created; failures carry `success: false` and an ErrorResponse body", body = GenerateResponse)
    )
)]
#[tracing::instrument(skip(state, params), fields(operation = "generate"))]
pub async fn generate(
    State(state): State<Arc<AppState>>,
    ValidatedJson(params): ValidatedJson<GenerateParams>,
) -> Result<Json<GenerateResponse>, EnvelopeError> {
    let outcome = GenerationService::new(&state).submit(params).await?;

    Ok(Json(GenerateResponse {
        success: true,
        task_id: outcome.task_id,
        task_status: outcome.task_status.into(),
    }))
}
