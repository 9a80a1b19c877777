//! Storage setup and initialization

use crate::constants::{DOWNLOADS_ROUTE, UPLOADS_ROUTE};
use animove_core::Config;
use animove_storage::{create_public_storage, LocalStorage, Storage};
use anyhow::{Context, Result};
use std::sync::Arc;

/// Create the upload and download directories.
pub async fn setup_local_storage(
    config: &Config,
) -> Result<(Arc<LocalStorage>, Arc<LocalStorage>)> {
    let uploads = LocalStorage::new(config.upload_dir(), UPLOADS_ROUTE)
        .await
        .context("Failed to initialize upload directory")?;
    let downloads = LocalStorage::new(config.download_dir(), DOWNLOADS_ROUTE)
        .await
        .context("Failed to initialize download directory")?;

    tracing::info!(
        upload_dir = %uploads.base_path().display(),
        download_dir = %downloads.base_path().display(),
        "Local storage initialized"
    );

    Ok((Arc::new(uploads), Arc::new(downloads)))
}

/// Create the object storage adapter, when configured.
pub fn setup_public_storage(config: &Config) -> Result<Option<Arc<dyn Storage>>> {
    let storage = create_public_storage(config).context("Failed to initialize object storage")?;

    match &storage {
        Some(storage) => tracing::info!(
            backend = %storage.backend_type(),
            "Object storage initialized"
        ),
        None => tracing::warn!(
            "Object storage not configured; uploads get relay-local URLs the synthesis service cannot reach"
        ),
    }

    Ok(storage)
}
