//! Storage abstraction trait

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::pin::Pin;
use std::time::Duration;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Chunked file body.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, StorageError>> + Send>>;

/// Storage abstraction trait
///
/// Implemented by the object store adapter and by local directories, so the
/// upload path can publish to either without knowing which one it holds.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Store `data` under `filename` and return `(storage_key, url)`.
    ///
    /// For the object store the URL is publicly reachable (or presigned, when
    /// configured); for local storage it is relative to the relay.
    async fn upload(
        &self,
        filename: &str,
        content_type: &str,
        data: Bytes,
    ) -> StorageResult<(String, String)>;

    /// Delete a file by its storage key. Missing files are not an error.
    async fn delete(&self, storage_key: &str) -> StorageResult<()>;

    /// Generate a temporary URL for direct GET access.
    async fn get_presigned_url(
        &self,
        storage_key: &str,
        expires_in: Duration,
    ) -> StorageResult<String>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;

    /// Download a file as a stream of chunks.
    async fn download_stream(&self, storage_key: &str) -> StorageResult<ByteStream>;
}

/// Reject keys that could escape the storage root.
pub(crate) fn validate_key(storage_key: &str) -> StorageResult<()> {
    if storage_key.is_empty() {
        return Err(StorageError::InvalidKey("Storage key is empty".to_string()));
    }
    if storage_key.contains("..") || storage_key.starts_with('/') || storage_key.contains('\\') {
        return Err(StorageError::InvalidKey(
            "Storage key contains invalid characters".to_string(),
        ));
    }
    Ok(())
}
