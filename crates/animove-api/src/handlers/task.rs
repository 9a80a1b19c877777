use crate::error::EnvelopeError;
use crate::services::StatusPoller;
use crate::state::AppState;
use animove_core::models::TaskStatus;
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct TaskStatusResponse {
    pub success: bool,
    pub task_id: String,
    #[schema(example = "RUNNING")]
    pub task_status: String,
    /// Result URL, only once the task has SUCCEEDED
    pub video_url: Option<String>,
    #[schema(value_type = Option<f64>)]
    pub video_duration: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub video_ratio: Option<Value>,
    /// Remote message, e.g. the failure reason
    pub message: Option<String>,
    /// Remote error code
    pub code: Option<String>,
}

/// Read the current status of a synthesis task from the remote API.
#[utoipa::path(
    get,
    path = "/api/task/{task_id}",
    tag = "tasks",
    params(("task_id" = String, Path, description = "Remote task id")),
    responses(
        (status = 200, description = "Task status; failures carry `success: false`, `task_status: UNKNOWN` and an ErrorResponse body", body = TaskStatusResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "task_status"))]
pub async fn get_task_status(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<String>,
) -> Result<Json<TaskStatusResponse>, EnvelopeError> {
    let snapshot = StatusPoller::new(&state)
        .poll(&task_id)
        .await
        .map_err(|e| EnvelopeError::new(e).with_task_status(TaskStatus::Unknown))?;

    Ok(Json(TaskStatusResponse {
        success: true,
        task_id: snapshot.task_id,
        task_status: snapshot.status.into(),
        video_url: snapshot.video_url,
        video_duration: snapshot.video_duration,
        video_ratio: snapshot.video_ratio,
        message: snapshot.message,
        code: snapshot.code,
    }))
}
