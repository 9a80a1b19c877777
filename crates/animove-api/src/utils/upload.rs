//! Common utilities for file upload handlers

use animove_core::models::MediaKind;
use animove_core::AppError;
use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;
use bytes::{Bytes, BytesMut};

const MAX_FILENAME_LENGTH: usize = 255;

/// A file received from a multipart form, already checked against its kind.
#[derive(Debug)]
pub struct IncomingFile {
    pub original_name: String,
    /// Lowercase extension from the allowlist.
    pub extension: String,
    pub data: Bytes,
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!("Request body too large: {}", e.body_text()))
    } else {
        AppError::InvalidInput(format!("Failed to read multipart: {}", e.body_text()))
    }
}

/// Extract the single file field of an upload form.
///
/// The field is named after the kind (`image` / `video`) or `file`. Name and
/// extension are checked before the body is read, and the body is buffered with
/// a running size check so an oversized file is rejected without being stored.
pub async fn extract_multipart_file(
    mut multipart: Multipart,
    kind: MediaKind,
    max_size: usize,
) -> Result<IncomingFile, AppError> {
    let mut incoming: Option<IncomingFile> = None;

    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        let field_name = field.name().unwrap_or_default();
        if field_name != kind.as_str() && field_name != "file" {
            continue;
        }

        if incoming.is_some() {
            return Err(AppError::InvalidInput(format!(
                "Multiple file fields are not allowed; send exactly one '{}' field",
                kind
            )));
        }

        let original_name = field.file_name().unwrap_or_default().trim().to_string();
        if original_name.is_empty() {
            return Err(AppError::InvalidInput("No file selected".to_string()));
        }
        let extension = validate_file_extension(&original_name, kind)?;

        let mut buffer = BytesMut::new();
        while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
            if buffer.len() + chunk.len() > max_size {
                return Err(size_error(kind, max_size));
            }
            buffer.extend_from_slice(&chunk);
        }

        if buffer.is_empty() {
            return Err(AppError::InvalidInput("File is empty".to_string()));
        }

        incoming = Some(IncomingFile {
            original_name,
            extension,
            data: buffer.freeze(),
        });
    }

    incoming.ok_or_else(|| AppError::InvalidInput(format!("No {} file provided", kind)))
}

fn size_error(kind: MediaKind, max_size: usize) -> AppError {
    let label = match kind {
        MediaKind::Image => "Image",
        MediaKind::Video => "Video",
    };
    AppError::PayloadTooLarge(format!(
        "{} must not exceed {} MB",
        label,
        max_size / 1024 / 1024
    ))
}

/// Validate file extension against the kind's allowlist. Returns it lowercased.
pub fn validate_file_extension(filename: &str, kind: MediaKind) -> Result<String, AppError> {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();

    if extension.is_empty() || !kind.allows_extension(&extension) {
        return Err(AppError::InvalidInput(format!(
            "Unsupported {} format. Allowed extensions: {}",
            kind,
            kind.allowed_extensions().join(", ")
        )));
    }

    Ok(extension)
}

/// Sanitize filename to prevent path traversal and invalid characters.
///
/// Keeps the final path component, replaces anything but ASCII alphanumerics,
/// `.`, `-` and `_` with `_`, squeezes runs of dots into one, and falls back to
/// `file.<extension>` when nothing meaningful is left.
pub fn sanitize_filename(filename: &str, extension: &str) -> String {
    let filename_only = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename);

    let mut sanitized = String::with_capacity(filename_only.len());
    for c in filename_only.chars() {
        let c = if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
            c
        } else {
            '_'
        };
        if c == '.' && sanitized.ends_with('.') {
            continue;
        }
        sanitized.push(c);
    }

    let (stem, original_ext) = match sanitized.rsplit_once('.') {
        Some((stem, ext)) if !ext.is_empty() => (stem.trim_start_matches('.'), ext),
        _ => (sanitized.trim_end_matches('.'), extension),
    };

    if !stem.chars().any(|c| c.is_ascii_alphanumeric()) {
        return format!("file.{}", extension);
    }

    let max_stem = MAX_FILENAME_LENGTH.saturating_sub(original_ext.len() + 1);
    let stem: String = stem.chars().take(max_stem).collect();

    format!("{}.{}", stem, original_ext)
}
