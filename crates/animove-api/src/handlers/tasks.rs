use crate::state::AppState;
use animove_core::models::GenerationTask;
use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct TaskListResponse {
    pub success: bool,
    pub tasks: Vec<GenerationTask>,
}

/// Every task created through this process, oldest first.
#[utoipa::path(
    get,
    path = "/api/tasks",
    tag = "tasks",
    responses((status = 200, description = "Known tasks", body = TaskListResponse))
)]
pub async fn list_tasks(State(state): State<Arc<AppState>>) -> Json<TaskListResponse> {
    Json(TaskListResponse {
        success: true,
        tasks: state.registry.list(),
    })
}
