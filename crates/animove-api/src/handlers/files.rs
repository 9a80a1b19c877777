//! Static serving of uploaded files and saved results by generated file name.

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use animove_core::models::MediaKind;
use animove_core::AppError;
use animove_storage::{LocalStorage, Storage, StorageError};
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderValue, StatusCode},
    response::Response,
};
use std::sync::Arc;

#[derive(Debug, Clone, Copy)]
enum Disposition {
    Inline,
    Attachment,
}

fn not_found(filename: &str) -> HttpAppError {
    HttpAppError(AppError::NotFound(format!("File not found: {}", filename)))
}

async fn serve(
    dir: &LocalStorage,
    filename: &str,
    disposition: Disposition,
) -> Result<Response, HttpAppError> {
    let size = match dir.content_length(filename).await {
        Ok(size) => size,
        Err(StorageError::NotFound(_) | StorageError::InvalidKey(_)) => {
            return Err(not_found(filename))
        }
        Err(e) => return Err(e.into()),
    };
    let stream = dir.download_stream(filename).await.map_err(|e| match e {
        StorageError::NotFound(_) => not_found(filename),
        other => other.into(),
    })?;

    let extension = filename.rsplit_once('.').map(|(_, ext)| ext).unwrap_or_default();
    let content_type = MediaKind::content_type_for(extension);
    let disposition = match disposition {
        Disposition::Inline => format!("inline; filename=\"{}\"", filename),
        Disposition::Attachment => format!("attachment; filename=\"{}\"", filename),
    };

    let mut response = Response::new(Body::from_stream(stream));
    *response.status_mut() = StatusCode::OK;
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(size));
    if let Ok(value) = HeaderValue::from_str(&disposition) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }

    Ok(response)
}

#[utoipa::path(
    get,
    path = "/uploads/{filename}",
    tag = "files",
    params(("filename" = String, Path, description = "Generated upload file name")),
    responses(
        (status = 200, description = "File content"),
        (status = 404, description = "No such file", body = ErrorResponse)
    )
)]
pub async fn serve_upload(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Result<Response, HttpAppError> {
    serve(&state.uploads, &filename, Disposition::Inline).await
}

#[utoipa::path(
    get,
    path = "/downloads/{filename}",
    tag = "files",
    params(("filename" = String, Path, description = "Saved result file name")),
    responses(
        (status = 200, description = "File content as attachment"),
        (status = 404, description = "No such file", body = ErrorResponse)
    )
)]
pub async fn serve_download(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Result<Response, HttpAppError> {
    serve(&state.downloads, &filename, Disposition::Attachment).await
}
