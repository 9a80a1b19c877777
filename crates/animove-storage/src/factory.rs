use crate::{S3Settings, S3Storage, Storage, StorageResult};
use animove_core::Config;
use std::sync::Arc;
use std::time::Duration;

/// Create the public object storage adapter, if object storage is configured.
///
/// Returns `Ok(None)` when the relay runs without object storage; uploads then
/// only get relay-local URLs.
pub fn create_public_storage(config: &Config) -> StorageResult<Option<Arc<dyn Storage>>> {
    let Some(oss) = config.oss() else {
        return Ok(None);
    };

    let signed_url_ttl =
        (oss.signed_url_ttl_secs > 0).then(|| Duration::from_secs(oss.signed_url_ttl_secs));

    let storage = S3Storage::new(S3Settings {
        bucket: oss.bucket.clone(),
        region: oss.region.clone(),
        endpoint: oss.endpoint.clone(),
        access_key_id: oss.access_key_id.clone(),
        secret_access_key: oss.access_key_secret.clone(),
        key_prefix: oss.key_prefix.clone(),
        public_base_url: oss.public_base_url.clone(),
        signed_url_ttl,
    })?;

    Ok(Some(Arc::new(storage)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StorageBackend;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Config {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned()).unwrap()
    }

    #[test]
    fn no_oss_settings_means_no_public_storage() {
        let storage = create_public_storage(&config(&[])).unwrap();
        assert!(storage.is_none());
    }

    #[test]
    fn oss_settings_build_object_storage() {
        let storage = create_public_storage(&config(&[
            ("OSS_ACCESS_KEY_ID", "id"),
            ("OSS_ACCESS_KEY_SECRET", "secret"),
            ("OSS_BUCKET_NAME", "media"),
            ("OSS_ENDPOINT", "oss-cn-shanghai.aliyuncs.com"),
            ("OSS_REGION", "oss-cn-shanghai"),
        ]))
        .unwrap()
        .unwrap();
        assert_eq!(storage.backend_type(), StorageBackend::Oss);
    }
}
