//! HTTP error response conversion
//!
//! Two renderings of the same `AppError`:
//! - `HttpAppError`: status code from the error's metadata (uploads, static files).
//! - `EnvelopeError`: always `200 OK` with `success: false` (task lifecycle endpoints).
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>` or
//! `Result<impl IntoResponse, EnvelopeError>` and convert with `?`.

use animove_core::models::TaskStatus;
use animove_core::{AppError, ErrorMetadata, LogLevel};
use animove_storage::StorageError;
use animove_synthesis::SynthesisError;
use axum::{
    extract::rejection::JsonRejection,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Always `false`
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Error code reported by the synthesis API (e.g. `InvalidParameter`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream_code: Option<String>,
    /// Whether this error is recoverable (can be retried)
    pub recoverable: bool,
    /// Suggested action for the client (e.g., "Retry after a short delay")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
    /// Set on status-poll failures, where it is always `UNKNOWN`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_status: Option<String>,
}

impl ErrorResponse {
    fn from_app_error(app_error: &AppError) -> Self {
        let show_details = !app_error.is_sensitive();
        Self {
            success: false,
            error: app_error.client_message(),
            details: show_details.then(|| app_error.detailed_message()),
            error_type: show_details.then(|| app_error.error_type().to_string()),
            code: app_error.error_code().to_string(),
            upstream_code: app_error.upstream_code().map(String::from),
            recoverable: app_error.is_recoverable(),
            suggested_action: app_error.suggested_action().map(String::from),
            task_status: None,
        }
    }

    /// Drop the internal error text and variant name.
    pub fn redact(&mut self) {
        self.details = None;
        self.error_type = None;
    }
}

/// Wrapper type for AppError to implement IntoResponse
/// This is necessary because of Rust's orphan rules - we can't implement
/// IntoResponse (external trait) for AppError (external type from animove-core)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

/// Failure reported inside a `200 OK` body.
#[derive(Debug)]
pub struct EnvelopeError {
    pub error: AppError,
    pub task_status: Option<TaskStatus>,
}

impl EnvelopeError {
    pub fn new(error: AppError) -> Self {
        Self {
            error,
            task_status: None,
        }
    }

    pub fn with_task_status(mut self, status: TaskStatus) -> Self {
        self.task_status = Some(status);
        self
    }
}

impl From<AppError> for EnvelopeError {
    fn from(err: AppError) -> Self {
        EnvelopeError::new(err)
    }
}

impl From<SynthesisError> for EnvelopeError {
    fn from(err: SynthesisError) -> Self {
        EnvelopeError::new(synthesis_app_error(err))
    }
}

/// Convert JSON body deserialization failures into our error format.
impl From<JsonRejection> for EnvelopeError {
    fn from(rejection: JsonRejection) -> Self {
        EnvelopeError::new(AppError::InvalidInput(format!(
            "Invalid request body: {}",
            rejection.body_text()
        )))
    }
}

/// JSON body extractor that reports deserialization failures in the lifecycle
/// envelope (`200`, `success: false`) instead of axum's plain-text rejection.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = EnvelopeError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(inner) = Json::<T>::from_request(req, state)
            .await
            .map_err(EnvelopeError::from)?;
        Ok(ValidatedJson(inner))
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, "Error occurred");
        }
    }
}

/// Copy of a rendered error body, kept on the response so outer layers can
/// rewrite it (see `middleware::redact_error_details`).
#[derive(Debug, Clone)]
pub struct RenderedError(pub ErrorResponse);

fn error_response(status: StatusCode, body: ErrorResponse) -> Response {
    let mut response = (status, Json(body.clone())).into_response();
    response.extensions_mut().insert(RenderedError(body));
    response
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        error_response(status, ErrorResponse::from_app_error(app_error))
    }
}

impl IntoResponse for EnvelopeError {
    fn into_response(self) -> Response {
        log_error(&self.error);

        let mut body = ErrorResponse::from_app_error(&self.error);
        body.task_status = self.task_status.map(String::from);

        error_response(StatusCode::OK, body)
    }
}

// Convert domain errors (avoids orphan rule: we impl for local wrapper types)

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        let app = match err {
            StorageError::NotFound(msg) => AppError::NotFound(msg),
            StorageError::UploadFailed(msg) => AppError::Storage(msg),
            StorageError::DownloadFailed(msg) => AppError::Storage(msg),
            StorageError::DeleteFailed(msg) => AppError::Storage(msg),
            StorageError::InvalidKey(msg) => AppError::InvalidInput(msg),
            StorageError::BackendError(msg) => AppError::Storage(msg),
            StorageError::IoError(err) => AppError::Internal(format!("IO error: {}", err)),
            StorageError::ConfigError(msg) => AppError::Internal(msg),
        };
        HttpAppError(app)
    }
}

/// Classify a synthesis client failure.
pub fn synthesis_app_error(err: SynthesisError) -> AppError {
    let upstream_code = err.remote_code().map(String::from);
    match err {
        SynthesisError::NotConfigured => {
            AppError::NotConfigured("DASHSCOPE_API_KEY is not configured".to_string())
        }
        SynthesisError::InvalidRequest(msg) => AppError::InvalidInput(msg),
        SynthesisError::Transport(msg) => AppError::Upstream(msg),
        SynthesisError::Rejected { message, .. } => AppError::UpstreamRejected {
            message,
            code: upstream_code,
        },
        SynthesisError::InvalidResponse(message) => AppError::UpstreamRejected {
            message,
            code: None,
        },
        SynthesisError::DownloadStatus(status) => {
            AppError::Upstream(format!("Download failed: {}", status))
        }
        SynthesisError::Write(e) => AppError::Internal(format!("IO error: {}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_storage_error_not_found() {
        let storage_err = StorageError::NotFound("File not found".to_string());
        let HttpAppError(app_err) = storage_err.into();
        match app_err {
            AppError::NotFound(msg) => assert_eq!(msg, "File not found"),
            _ => panic!("Expected NotFound variant"),
        }
    }

    #[test]
    fn test_from_storage_error_upload_failed() {
        let storage_err = StorageError::UploadFailed("Upload failed".to_string());
        let HttpAppError(app_err) = storage_err.into();
        assert_eq!(app_err.http_status_code(), 502);
        match app_err {
            AppError::Storage(msg) => assert_eq!(msg, "Upload failed"),
            _ => panic!("Expected Storage variant"),
        }
    }

    #[test]
    fn test_from_storage_error_invalid_key() {
        let storage_err = StorageError::InvalidKey("Invalid key".to_string());
        let HttpAppError(app_err) = storage_err.into();
        match app_err {
            AppError::InvalidInput(msg) => assert_eq!(msg, "Invalid key"),
            _ => panic!("Expected InvalidInput variant"),
        }
    }

    #[test]
    fn synthesis_errors_are_classified() {
        let rejected = synthesis_app_error(SynthesisError::Rejected {
            status: 400,
            code: Some("InvalidParameter".to_string()),
            message: "bad url".to_string(),
        });
        assert_eq!(rejected.error_code(), "UPSTREAM_REJECTED");
        assert_eq!(rejected.client_message(), "bad url");
        assert_eq!(rejected.upstream_code(), Some("InvalidParameter"));

        let transport = synthesis_app_error(SynthesisError::Transport("timed out".to_string()));
        assert_eq!(transport.error_code(), "UPSTREAM_ERROR");
        assert!(transport.is_recoverable());

        let download = synthesis_app_error(SynthesisError::DownloadStatus(404));
        assert!(download.client_message().contains("404"));

        let missing_key = synthesis_app_error(SynthesisError::NotConfigured);
        assert_eq!(missing_key.error_code(), "NOT_CONFIGURED");
    }

    #[test]
    fn envelope_is_ok_status_with_unknown_task_status() {
        let response = EnvelopeError::new(AppError::Upstream("timed out".to_string()))
            .with_task_status(TaskStatus::Unknown)
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    /// Verifies the public error response contract.
    #[test]
    fn test_error_response_shape() {
        let mut response =
            ErrorResponse::from_app_error(&AppError::InvalidInput("Missing file".to_string()));
        response.task_status = Some("UNKNOWN".to_string());
        let json = serde_json::to_value(&response).expect("serialize");
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Missing file");
        assert_eq!(json["code"], "INVALID_INPUT");
        assert_eq!(json["task_status"], "UNKNOWN");
        assert!(json.get("recoverable").and_then(|v| v.as_bool()).is_some());
    }

    #[test]
    fn internal_errors_hide_details() {
        let response = ErrorResponse::from_app_error(&AppError::Internal(
            "disk /var/data is full".to_string(),
        ));
        assert_eq!(response.error, "Internal server error");
        assert!(response.details.is_none());
    }
}
