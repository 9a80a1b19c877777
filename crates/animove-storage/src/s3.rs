use crate::traits::{validate_key, ByteStream, Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use http::Method;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path;
use object_store::signer::Signer;
use object_store::Error as ObjectStoreError;
use object_store::{
    Attribute, Attributes, ObjectStore, ObjectStoreExt, PutOptions, PutPayload,
    Result as ObjectResult,
};
use std::time::Duration;

/// Connection settings for an S3-compatible bucket.
#[derive(Clone)]
pub struct S3Settings {
    pub bucket: String,
    pub region: String,
    /// Service endpoint without the bucket, e.g. `https://oss-cn-beijing.aliyuncs.com`
    pub endpoint: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    /// Prefix prepended to every object key. Empty for the bucket root.
    pub key_prefix: String,
    /// Base for public object URLs. Defaults to the virtual-hosted bucket endpoint.
    pub public_base_url: Option<String>,
    /// When set, `upload` returns a presigned GET URL instead of the public one.
    pub signed_url_ttl: Option<Duration>,
}

/// S3-compatible object storage (Aliyun OSS and friends).
///
/// Requests use virtual-hosted style (`https://{bucket}.{endpoint host}/{key}`),
/// which is the only addressing OSS accepts.
#[derive(Clone)]
pub struct S3Storage {
    store: AmazonS3,
    bucket: String,
    key_prefix: String,
    public_base_url: String,
    signed_url_ttl: Option<Duration>,
}

impl std::fmt::Debug for S3Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Storage")
            .field("bucket", &self.bucket)
            .field("key_prefix", &self.key_prefix)
            .field("public_base_url", &self.public_base_url)
            .finish()
    }
}

impl S3Storage {
    pub fn new(settings: S3Settings) -> StorageResult<Self> {
        let bucket_endpoint = bucket_endpoint(&settings.endpoint, &settings.bucket)?;
        let allow_http = bucket_endpoint.starts_with("http://");

        let store = AmazonS3Builder::new()
            .with_region(settings.region.clone())
            .with_bucket_name(settings.bucket.clone())
            .with_access_key_id(settings.access_key_id)
            .with_secret_access_key(settings.secret_access_key)
            .with_endpoint(bucket_endpoint.clone())
            .with_virtual_hosted_style_request(true)
            .with_allow_http(allow_http)
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        let public_base_url = settings
            .public_base_url
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or(bucket_endpoint);

        Ok(S3Storage {
            store,
            bucket: settings.bucket,
            key_prefix: settings.key_prefix.trim_matches('/').to_string(),
            public_base_url,
            signed_url_ttl: settings.signed_url_ttl,
        })
    }

    /// Object key for a generated file name.
    fn generate_key(&self, filename: &str) -> String {
        if self.key_prefix.is_empty() {
            filename.to_string()
        } else {
            format!("{}/{}", self.key_prefix, filename)
        }
    }

    /// Public URL of an object; only meaningful when the bucket allows anonymous reads.
    fn generate_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url, key)
    }
}

/// `https://oss-cn-beijing.aliyuncs.com` + `media` -> `https://media.oss-cn-beijing.aliyuncs.com`
fn bucket_endpoint(endpoint: &str, bucket: &str) -> StorageResult<String> {
    let endpoint = endpoint.trim_end_matches('/');
    let (scheme, host) = endpoint.split_once("://").ok_or_else(|| {
        StorageError::ConfigError(format!("Endpoint must include a scheme: {}", endpoint))
    })?;
    if host.is_empty() || host.contains('/') {
        return Err(StorageError::ConfigError(format!(
            "Endpoint must be a bare host: {}",
            endpoint
        )));
    }

    let bucket_prefix = format!("{}.", bucket);
    if host.starts_with(&bucket_prefix) {
        Ok(format!("{}://{}", scheme, host))
    } else {
        Ok(format!("{}://{}{}", scheme, bucket_prefix, host))
    }
}

/// Objects keep their MIME type so public URLs serve with the right header.
fn put_options(content_type: &str) -> PutOptions {
    PutOptions::from(Attributes::from_iter([(
        Attribute::ContentType,
        content_type.to_string(),
    )]))
}

#[async_trait]
impl Storage for S3Storage {
    async fn upload(
        &self,
        filename: &str,
        content_type: &str,
        data: Bytes,
    ) -> StorageResult<(String, String)> {
        validate_key(filename)?;
        let key = self.generate_key(filename);
        let size = data.len() as u64;
        let location = Path::from(key.clone());

        let start = std::time::Instant::now();

        let result: ObjectResult<_> = self
            .store
            .put_opts(&location, PutPayload::from(data), put_options(content_type))
            .await;

        result.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %key,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Object storage upload failed"
            );
            StorageError::UploadFailed(e.to_string())
        })?;

        let url = match self.signed_url_ttl {
            Some(ttl) => self.get_presigned_url(&key, ttl).await?,
            None => self.generate_url(&key),
        };

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            size_bytes = size,
            presigned = self.signed_url_ttl.is_some(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Object storage upload successful"
        );

        Ok((key, url))
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        let start = std::time::Instant::now();
        let location = Path::from(storage_key.to_string());

        let result: ObjectResult<_> = self.store.delete(&location).await;

        match result {
            Ok(()) | Err(ObjectStoreError::NotFound { .. }) => {}
            Err(e) => {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %storage_key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Object storage delete failed"
                );
                return Err(StorageError::DeleteFailed(e.to_string()));
            }
        }

        tracing::info!(
            bucket = %self.bucket,
            key = %storage_key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Object storage delete successful"
        );

        Ok(())
    }

    async fn get_presigned_url(
        &self,
        storage_key: &str,
        expires_in: Duration,
    ) -> StorageResult<String> {
        let location = Path::from(storage_key.to_string());
        let url_result: ObjectResult<_> = self
            .store
            .signed_url(Method::GET, &location, expires_in)
            .await;

        let url = url_result
            .map_err(|e| StorageError::BackendError(e.to_string()))?
            .to_string();

        Ok(url)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Oss
    }

    async fn download_stream(&self, storage_key: &str) -> StorageResult<ByteStream> {
        let location = Path::from(storage_key.to_string());

        let result: ObjectResult<_> = self.store.get(&location).await;

        let result = result.map_err(|e| match e {
            ObjectStoreError::NotFound { .. } => StorageError::NotFound(storage_key.to_string()),
            other => StorageError::DownloadFailed(other.to_string()),
        })?;

        let bucket = self.bucket.clone();
        let key = storage_key.to_string();

        let stream = result.into_stream().map(move |res| {
            res.map_err(|e| {
                tracing::error!(bucket = %bucket, key = %key, error = %e, "Object storage stream error");
                StorageError::DownloadFailed(e.to_string())
            })
        });

        Ok(Box::pin(stream))
    }
}
