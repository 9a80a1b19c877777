//! OpenAPI documentation, served at `/api/openapi.json` and browsable at `/docs`.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use crate::services;
use animove_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Animove API",
        version = "0.1.0",
        description = "Relay for image + driving-video animation: upload media, submit synthesis tasks, poll their status and save the resulting video."
    ),
    paths(
        // Uploads
        handlers::upload::upload_image,
        handlers::upload::upload_video,
        // Tasks
        handlers::generate::generate,
        handlers::task::get_task_status,
        handlers::save_video::save_video,
        handlers::tasks::list_tasks,
        // Files
        handlers::files::serve_upload,
        handlers::files::serve_download,
        // Config
        handlers::health::health_check,
        handlers::config::get_config,
    ),
    components(
        schemas(
            handlers::upload::UploadResponse,
            handlers::generate::GenerateResponse,
            services::GenerateParams,
            handlers::task::TaskStatusResponse,
            handlers::save_video::SaveVideoRequest,
            handlers::save_video::SaveVideoResponse,
            handlers::tasks::TaskListResponse,
            handlers::health::HealthResponse,
            handlers::config::ConfigResponse,
            models::GenerationTask,
            models::TaskResult,
            models::SynthesisMode,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "uploads", description = "Image and video uploads"),
        (name = "tasks", description = "Synthesis task lifecycle"),
        (name = "files", description = "Relay-served uploads and saved results"),
        (name = "config", description = "Service configuration and health checks"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_route_is_documented() {
        let spec = ApiDoc::openapi();
        for path in [
            "/api/upload/image",
            "/api/upload/video",
            "/api/generate",
            "/api/task/{task_id}",
            "/api/save-video",
            "/api/tasks",
            "/uploads/{filename}",
            "/downloads/{filename}",
            "/health",
            "/api/config",
        ] {
            assert!(spec.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
