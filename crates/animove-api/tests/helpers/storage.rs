use animove_storage::{ByteStream, Storage, StorageBackend, StorageError, StorageResult};
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

pub const PUBLIC_BASE: &str = "https://animove-test.oss-cn-beijing.aliyuncs.com";

/// In-memory stand-in for the object store.
#[derive(Default)]
pub struct MemoryStorage {
    files: Mutex<HashMap<String, Bytes>>,
    fail_uploads: bool,
}

impl MemoryStorage {
    pub fn failing() -> Self {
        Self {
            files: Mutex::new(HashMap::new()),
            fail_uploads: true,
        }
    }

    pub fn get(&self, key: &str) -> Option<Bytes> {
        self.files.lock().unwrap().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.files.lock().unwrap().len()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn upload(
        &self,
        filename: &str,
        _content_type: &str,
        data: Bytes,
    ) -> StorageResult<(String, String)> {
        if self.fail_uploads {
            return Err(StorageError::UploadFailed(
                "AccessDenied: bucket policy".to_string(),
            ));
        }
        self.files
            .lock()
            .unwrap()
            .insert(filename.to_string(), data);
        Ok((filename.to_string(), format!("{}/{}", PUBLIC_BASE, filename)))
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        self.files.lock().unwrap().remove(storage_key);
        Ok(())
    }

    async fn get_presigned_url(
        &self,
        storage_key: &str,
        _expires_in: Duration,
    ) -> StorageResult<String> {
        Ok(format!("{}/{}?signed", PUBLIC_BASE, storage_key))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Oss
    }

    async fn download_stream(&self, storage_key: &str) -> StorageResult<ByteStream> {
        let data = self
            .get(storage_key)
            .ok_or_else(|| StorageError::NotFound(storage_key.to_string()))?;
        Ok(Box::pin(futures::stream::once(async move { Ok(data) })))
    }
}
