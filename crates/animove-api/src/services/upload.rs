use crate::state::AppState;
use crate::utils::upload::{extract_multipart_file, sanitize_filename};
use animove_core::models::{MediaKind, UploadedAsset};
use animove_core::{AppError, StorageBackend};
use animove_storage::Storage;
use axum::extract::Multipart;
use std::time::Instant;
use uuid::Uuid;

/// Validates an uploaded file, stores it locally and publishes it to object storage.
pub struct UploadService<'a> {
    state: &'a AppState,
}

impl<'a> UploadService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    fn max_size(&self, kind: MediaKind) -> usize {
        match kind {
            MediaKind::Image => self.state.config.max_image_size_bytes(),
            MediaKind::Video => self.state.config.max_video_size_bytes(),
        }
    }

    #[tracing::instrument(skip(self, multipart), fields(kind = %kind))]
    pub async fn upload(
        &self,
        kind: MediaKind,
        multipart: Multipart,
    ) -> Result<UploadedAsset, AppError> {
        let start = Instant::now();
        let incoming = extract_multipart_file(multipart, kind, self.max_size(kind)).await?;

        let safe_name = sanitize_filename(&incoming.original_name, &incoming.extension);
        let filename = format!("{}_{}", Uuid::new_v4().simple(), safe_name);
        let content_type = MediaKind::content_type_for(&incoming.extension);
        let size = incoming.data.len() as u64;

        let uploads = &self.state.uploads;
        let (_, local_url) = uploads
            .upload(&filename, content_type, incoming.data.clone())
            .await
            .map_err(|e| AppError::Internal(format!("Failed to save upload: {}", e)))?;
        let local_path = uploads.base_path().join(&filename);

        let (public_url, storage) = match &self.state.public_storage {
            Some(public) => match public.upload(&filename, content_type, incoming.data).await {
                Ok((_, url)) => (Some(url), StorageBackend::Oss),
                Err(e) => {
                    // No local-only fallback once object storage is configured.
                    if let Err(cleanup) = uploads.delete(&filename).await {
                        tracing::warn!(error = %cleanup, filename = %filename, "Failed to remove local copy");
                    }
                    return Err(AppError::Storage(e.to_string()));
                }
            },
            None => (None, StorageBackend::Local),
        };

        tracing::info!(
            filename = %filename,
            size_bytes = size,
            storage = %storage,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Upload stored"
        );

        Ok(UploadedAsset {
            kind,
            filename,
            extension: incoming.extension,
            size,
            content_type,
            local_path,
            local_url,
            public_url,
            storage,
        })
    }
}
