use crate::traits::{validate_key, ByteStream, Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local directory storage.
///
/// One instance owns one flat directory (the upload or the download directory)
/// and maps each file name to `{url_prefix}/{file name}`.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    url_prefix: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance, creating the directory if needed.
    ///
    /// # Arguments
    /// * `base_path` - Directory holding the files (e.g., "./uploads")
    /// * `url_prefix` - URL prefix the relay serves them under (e.g., "/uploads")
    pub async fn new(base_path: impl Into<PathBuf>, url_prefix: impl Into<String>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            url_prefix: url_prefix.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// URL the relay serves `key` under.
    pub fn url_for(&self, key: &str) -> String {
        format!("{}/{}", self.url_prefix, key)
    }

    /// Convert storage key to filesystem path with security validation.
    ///
    /// Keys are plain file names; separators and parent references are rejected
    /// so a key can never resolve outside the base directory.
    pub fn key_to_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        validate_key(storage_key)?;
        if storage_key.contains('/') {
            return Err(StorageError::InvalidKey(
                "Storage key must be a plain file name".to_string(),
            ));
        }
        Ok(self.base_path.join(storage_key))
    }

    /// Create a new, empty file for `key`. Fails if it already exists.
    pub async fn create_file(&self, storage_key: &str) -> StorageResult<(PathBuf, fs::File)> {
        let path = self.key_to_path(storage_key)?;
        let file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| {
                StorageError::UploadFailed(format!(
                    "Failed to create file {}: {}",
                    path.display(),
                    e
                ))
            })?;
        Ok((path, file))
    }

    /// Size in bytes of an existing file.
    pub async fn content_length(&self, storage_key: &str) -> StorageResult<u64> {
        let path = self.key_to_path(storage_key)?;
        match fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Ok(meta.len()),
            Ok(_) => Err(StorageError::NotFound(storage_key.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(storage_key.to_string()))
            }
            Err(e) => Err(StorageError::IoError(e)),
        }
    }

    /// Delete regular files last modified more than `max_age` ago. Returns how many were removed.
    pub async fn remove_older_than(&self, max_age: Duration) -> StorageResult<usize> {
        let cutoff = SystemTime::now()
            .checked_sub(max_age)
            .unwrap_or(SystemTime::UNIX_EPOCH);

        let mut entries = fs::read_dir(&self.base_path).await?;
        let mut removed = 0;

        while let Some(entry) = entries.next_entry().await? {
            let meta = match entry.metadata().await {
                Ok(meta) => meta,
                Err(e) => {
                    tracing::warn!(error = %e, path = %entry.path().display(), "Failed to stat file");
                    continue;
                }
            };
            if !meta.is_file() {
                continue;
            }
            let modified = meta.modified().unwrap_or_else(|_| SystemTime::now());
            if modified > cutoff {
                continue;
            }

            match fs::remove_file(entry.path()).await {
                Ok(()) => removed += 1,
                Err(e) => {
                    tracing::warn!(error = %e, path = %entry.path().display(), "Failed to remove expired file");
                }
            }
        }

        Ok(removed)
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn upload(
        &self,
        filename: &str,
        _content_type: &str,
        data: Bytes,
    ) -> StorageResult<(String, String)> {
        let key = filename.to_string();
        let size = data.len();
        let start = std::time::Instant::now();

        let (path, mut file) = self.create_file(&key).await?;

        let write_result = async {
            file.write_all(&data).await?;
            file.sync_all().await
        }
        .await;

        if let Err(e) = write_result {
            drop(file);
            let _ = fs::remove_file(&path).await;
            return Err(StorageError::UploadFailed(format!(
                "Failed to write file {}: {}",
                path.display(),
                e
            )));
        }

        let url = self.url_for(&key);

        tracing::info!(
            path = %path.display(),
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage upload successful"
        );

        Ok((key, url))
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        let path = self.key_to_path(storage_key)?;

        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(path = %path.display(), key = %storage_key, "Local storage delete successful");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::DeleteFailed(format!(
                "Failed to delete file {}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn get_presigned_url(
        &self,
        storage_key: &str,
        _expires_in: Duration,
    ) -> StorageResult<String> {
        self.key_to_path(storage_key)?;
        Ok(self.url_for(storage_key))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }

    async fn download_stream(&self, storage_key: &str) -> StorageResult<ByteStream> {
        let path = self.key_to_path(storage_key)?;

        let file = match fs::File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(storage_key.to_string()));
            }
            Err(e) => {
                return Err(StorageError::DownloadFailed(format!(
                    "Failed to open file {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        let key = storage_key.to_string();
        let stream = tokio_util::io::ReaderStream::new(file).map(move |result| {
            result.map_err(|e| {
                tracing::error!(key = %key, error = %e, "Local storage stream download error");
                StorageError::DownloadFailed(format!("Failed to read chunk: {}", e))
            })
        });

        Ok(Box::pin(stream))
    }
}
