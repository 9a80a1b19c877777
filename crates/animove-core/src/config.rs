//! Configuration module
//!
//! Configuration is read once at startup from the environment (optionally
//! seeded from a `.env` file) and is immutable afterwards. `Config` is cheap to
//! clone and is handed to every component that needs it.

use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::models::SynthesisMode;
use crate::storage_types::StorageBackend;

// Common constants
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_DASHSCOPE_BASE_URL: &str = "https://dashscope.aliyuncs.com/api/v1";
const DEFAULT_SYNTHESIS_MODEL: &str = "wan2.2-animate-move";
const MAX_IMAGE_SIZE_MB: usize = 5;
const MAX_VIDEO_SIZE_MB: usize = 200;
const DEFAULT_OSS_REGION: &str = "oss-cn-beijing";
const DEFAULT_OSS_KEY_PREFIX: &str = "animove";
const HTTP_CONCURRENCY_LIMIT: usize = 1024;
const FILE_CLEANUP_INTERVAL_SECS: u64 = 3600;

/// Server-level settings.
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub host: String,
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub http_concurrency_limit: usize,
}

/// Credentials and addressing for the S3-compatible object store (Aliyun OSS).
#[derive(Clone)]
pub struct OssConfig {
    pub access_key_id: String,
    pub access_key_secret: String,
    pub bucket: String,
    /// Service endpoint, e.g. `https://oss-cn-beijing.aliyuncs.com`
    pub endpoint: String,
    pub region: String,
    pub key_prefix: String,
    /// Overrides the derived `https://{bucket}.{endpoint host}` base for public URLs.
    pub public_base_url: Option<String>,
    /// When non-zero, uploads hand out presigned GET URLs valid for this many seconds.
    pub signed_url_ttl_secs: u64,
}

impl std::fmt::Debug for OssConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OssConfig")
            .field("bucket", &self.bucket)
            .field("endpoint", &self.endpoint)
            .field("region", &self.region)
            .field("key_prefix", &self.key_prefix)
            .field("public_base_url", &self.public_base_url)
            .field("signed_url_ttl_secs", &self.signed_url_ttl_secs)
            .finish_non_exhaustive()
    }
}

/// Relay configuration.
#[derive(Clone)]
pub struct RelayConfig {
    pub base: BaseConfig,
    pub dashscope_api_key: Option<String>,
    pub dashscope_base_url: String,
    pub synthesis_model: String,
    pub default_mode: SynthesisMode,
    pub upload_dir: PathBuf,
    pub download_dir: PathBuf,
    pub max_image_size_bytes: usize,
    pub max_video_size_bytes: usize,
    pub oss: Option<OssConfig>,
    /// Registry entries older than this are purged. 0 = keep for the process lifetime.
    pub task_retention_secs: u64,
    /// Maximum number of tracked tasks; the oldest is evicted first. 0 = unbounded.
    pub task_registry_capacity: usize,
    /// Local uploads/downloads older than this are deleted. 0 = never.
    pub file_retention_hours: u64,
    pub file_cleanup_interval_secs: u64,
}

impl std::fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayConfig")
            .field("base", &self.base)
            .field("api_key_configured", &self.dashscope_api_key.is_some())
            .field("dashscope_base_url", &self.dashscope_base_url)
            .field("synthesis_model", &self.synthesis_model)
            .field("default_mode", &self.default_mode)
            .field("upload_dir", &self.upload_dir)
            .field("download_dir", &self.download_dir)
            .field("max_image_size_bytes", &self.max_image_size_bytes)
            .field("max_video_size_bytes", &self.max_video_size_bytes)
            .field("oss", &self.oss)
            .field("task_retention_secs", &self.task_retention_secs)
            .field("task_registry_capacity", &self.task_registry_capacity)
            .field("file_retention_hours", &self.file_retention_hours)
            .field("file_cleanup_interval_secs", &self.file_cleanup_interval_secs)
            .finish()
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<RelayConfig>);

impl Config {
    fn as_relay(&self) -> &RelayConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_name(&self.as_relay().base.environment)
    }

    /// Load from the process environment, reading `.env` first when present.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load from an arbitrary key lookup. Used by `from_env` and by tests.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = RelayConfig::from_lookup(lookup)?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.as_relay().validate()
    }

    // Convenience getters for common fields
    pub fn host(&self) -> &str {
        &self.as_relay().base.host
    }

    pub fn server_port(&self) -> u16 {
        self.as_relay().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.as_relay().base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.as_relay().base.environment
    }

    pub fn http_concurrency_limit(&self) -> usize {
        self.as_relay().base.http_concurrency_limit
    }

    pub fn dashscope_api_key(&self) -> Option<&str> {
        self.as_relay().dashscope_api_key.as_deref()
    }

    pub fn api_key_configured(&self) -> bool {
        self.as_relay().dashscope_api_key.is_some()
    }

    pub fn dashscope_base_url(&self) -> &str {
        &self.as_relay().dashscope_base_url
    }

    pub fn synthesis_model(&self) -> &str {
        &self.as_relay().synthesis_model
    }

    pub fn default_mode(&self) -> SynthesisMode {
        self.as_relay().default_mode
    }

    pub fn upload_dir(&self) -> &Path {
        &self.as_relay().upload_dir
    }

    pub fn download_dir(&self) -> &Path {
        &self.as_relay().download_dir
    }

    pub fn max_image_size_bytes(&self) -> usize {
        self.as_relay().max_image_size_bytes
    }

    pub fn max_video_size_bytes(&self) -> usize {
        self.as_relay().max_video_size_bytes
    }

    pub fn oss(&self) -> Option<&OssConfig> {
        self.as_relay().oss.as_ref()
    }

    /// Backend that successful uploads are published to.
    pub fn storage_backend(&self) -> StorageBackend {
        if self.oss().is_some() {
            StorageBackend::Oss
        } else {
            StorageBackend::Local
        }
    }

    pub fn task_retention_secs(&self) -> u64 {
        self.as_relay().task_retention_secs
    }

    pub fn task_registry_capacity(&self) -> usize {
        self.as_relay().task_registry_capacity
    }

    pub fn file_retention_hours(&self) -> u64 {
        self.as_relay().file_retention_hours
    }

    pub fn file_cleanup_interval_secs(&self) -> u64 {
        self.as_relay().file_cleanup_interval_secs
    }
}

/// Parse an optional numeric variable. Unset uses `default`; an unparsable value fails startup.
fn parse_var<G, T>(get: &G, key: &str, default: T) -> Result<T, anyhow::Error>
where
    G: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match get(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("{} must be a valid number, got '{}'", key, raw)),
    }
}

fn megabytes(mb: usize, key: &str) -> Result<usize, anyhow::Error> {
    mb.checked_mul(1024 * 1024)
        .ok_or_else(|| anyhow::anyhow!("{} is too large", key))
}

fn is_production_name(environment: &str) -> bool {
    let env = environment.to_lowercase();
    env == "production" || env == "prod"
}

impl RelayConfig {
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Blank values count as unset so `KEY=` in a .env file disables a feature.
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let environment = get("ENVIRONMENT")
            .or_else(|| get("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins_str = get("CORS_ORIGINS").unwrap_or_else(|| "*".to_string());
        if is_production_name(&environment) && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let base = BaseConfig {
            host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            server_port: parse_var(&get, "PORT", DEFAULT_PORT)?,
            cors_origins,
            environment,
            http_concurrency_limit: parse_var(
                &get,
                "HTTP_CONCURRENCY_LIMIT",
                HTTP_CONCURRENCY_LIMIT,
            )?
            .max(1),
        };

        let default_mode = match get("DEFAULT_SYNTHESIS_MODE") {
            Some(raw) => raw.parse::<SynthesisMode>()?,
            None => SynthesisMode::default(),
        };

        let max_image_size_bytes =
            megabytes(parse_var(&get, "MAX_IMAGE_SIZE_MB", MAX_IMAGE_SIZE_MB)?, "MAX_IMAGE_SIZE_MB")?;
        let max_video_size_bytes =
            megabytes(parse_var(&get, "MAX_VIDEO_SIZE_MB", MAX_VIDEO_SIZE_MB)?, "MAX_VIDEO_SIZE_MB")?;

        let config = RelayConfig {
            base,
            dashscope_api_key: get("DASHSCOPE_API_KEY"),
            dashscope_base_url: get("DASHSCOPE_BASE_URL")
                .unwrap_or_else(|| DEFAULT_DASHSCOPE_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            synthesis_model: get("SYNTHESIS_MODEL")
                .unwrap_or_else(|| DEFAULT_SYNTHESIS_MODEL.to_string()),
            default_mode,
            upload_dir: PathBuf::from(get("UPLOAD_DIR").unwrap_or_else(|| "uploads".to_string())),
            download_dir: PathBuf::from(
                get("DOWNLOAD_DIR").unwrap_or_else(|| "downloads".to_string()),
            ),
            max_image_size_bytes,
            max_video_size_bytes,
            oss: oss_from_lookup(&get)?,
            task_retention_secs: parse_var(&get, "TASK_RETENTION_SECS", 0)?,
            task_registry_capacity: parse_var(&get, "TASK_REGISTRY_CAPACITY", 0)?,
            file_retention_hours: parse_var(&get, "FILE_RETENTION_HOURS", 0)?,
            file_cleanup_interval_secs: parse_var(
                &get,
                "FILE_CLEANUP_INTERVAL_SECS",
                FILE_CLEANUP_INTERVAL_SECS,
            )?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !self.dashscope_base_url.starts_with("http://")
            && !self.dashscope_base_url.starts_with("https://")
        {
            return Err(anyhow::anyhow!(
                "DASHSCOPE_BASE_URL must be an http(s) URL"
            ));
        }

        if self.max_image_size_bytes == 0 || self.max_video_size_bytes == 0 {
            return Err(anyhow::anyhow!(
                "MAX_IMAGE_SIZE_MB and MAX_VIDEO_SIZE_MB must be greater than zero"
            ));
        }

        if self.upload_dir == self.download_dir {
            return Err(anyhow::anyhow!(
                "UPLOAD_DIR and DOWNLOAD_DIR must be different directories"
            ));
        }

        if self.file_retention_hours > 0 && self.file_cleanup_interval_secs == 0 {
            return Err(anyhow::anyhow!(
                "FILE_CLEANUP_INTERVAL_SECS must be greater than zero when FILE_RETENTION_HOURS is set"
            ));
        }

        Ok(())
    }
}

/// Object storage is enabled only when all four required settings are present;
/// a partial set is a configuration mistake and fails startup.
fn oss_from_lookup<G>(get: &G) -> Result<Option<OssConfig>, anyhow::Error>
where
    G: Fn(&str) -> Option<String>,
{
    const REQUIRED: [&str; 4] = [
        "OSS_ACCESS_KEY_ID",
        "OSS_ACCESS_KEY_SECRET",
        "OSS_BUCKET_NAME",
        "OSS_ENDPOINT",
    ];

    let values: Vec<Option<String>> = REQUIRED.iter().map(|key| get(key)).collect();
    if values.iter().all(Option::is_none) {
        return Ok(None);
    }

    let missing: Vec<&str> = REQUIRED
        .iter()
        .zip(values.iter())
        .filter(|(_, v)| v.is_none())
        .map(|(k, _)| *k)
        .collect();
    if !missing.is_empty() {
        return Err(anyhow::anyhow!(
            "Object storage is partially configured; missing {}",
            missing.join(", ")
        ));
    }

    let mut values = values.into_iter().flatten();
    let (Some(access_key_id), Some(access_key_secret), Some(bucket), Some(endpoint)) =
        (values.next(), values.next(), values.next(), values.next())
    else {
        return Err(anyhow::anyhow!("Object storage settings could not be read"));
    };

    let endpoint = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        endpoint.trim_end_matches('/').to_string()
    } else {
        format!("https://{}", endpoint.trim_end_matches('/'))
    };

    Ok(Some(OssConfig {
        access_key_id,
        access_key_secret,
        bucket,
        endpoint,
        region: get("OSS_REGION").unwrap_or_else(|| DEFAULT_OSS_REGION.to_string()),
        key_prefix: get("OSS_KEY_PREFIX")
            .unwrap_or_else(|| DEFAULT_OSS_KEY_PREFIX.to_string())
            .trim_matches('/')
            .to_string(),
        public_base_url: get("OSS_PUBLIC_BASE_URL").map(|u| u.trim_end_matches('/').to_string()),
        signed_url_ttl_secs: parse_var(get, "OSS_SIGNED_URL_TTL_SECS", 0)?,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, anyhow::Error> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = load(&[]).unwrap();
        assert_eq!(config.host(), "0.0.0.0");
        assert_eq!(config.server_port(), 5000);
        assert_eq!(config.dashscope_base_url(), "https://dashscope.aliyuncs.com/api/v1");
        assert_eq!(config.synthesis_model(), "wan2.2-animate-move");
        assert_eq!(config.default_mode(), SynthesisMode::WanStd);
        assert_eq!(config.max_image_size_bytes(), 5 * 1024 * 1024);
        assert_eq!(config.max_video_size_bytes(), 200 * 1024 * 1024);
        assert_eq!(config.upload_dir(), Path::new("uploads"));
        assert_eq!(config.download_dir(), Path::new("downloads"));
        assert!(!config.api_key_configured());
        assert!(config.oss().is_none());
        assert_eq!(config.storage_backend(), StorageBackend::Local);
        assert_eq!(config.task_retention_secs(), 0);
        assert_eq!(config.task_registry_capacity(), 0);
        assert_eq!(config.file_retention_hours(), 0);
    }

    #[test]
    fn blank_api_key_counts_as_unset() {
        let config = load(&[("DASHSCOPE_API_KEY", "  ")]).unwrap();
        assert!(config.dashscope_api_key().is_none());

        let config = load(&[("DASHSCOPE_API_KEY", "sk-test")]).unwrap();
        assert_eq!(config.dashscope_api_key(), Some("sk-test"));
    }

    #[test]
    fn wildcard_cors_rejected_in_production() {
        let err = load(&[("ENVIRONMENT", "production")]).unwrap_err();
        assert!(err.to_string().contains("CORS_ORIGINS"));

        let config = load(&[
            ("ENVIRONMENT", "production"),
            ("CORS_ORIGINS", "https://a.example, https://b.example"),
        ])
        .unwrap();
        assert!(config.is_production());
        assert_eq!(config.cors_origins().len(), 2);
    }

    #[test]
    fn unknown_default_mode_fails() {
        assert!(load(&[("DEFAULT_SYNTHESIS_MODE", "wan-ultra")]).is_err());
        let config = load(&[("DEFAULT_SYNTHESIS_MODE", "wan-pro")]).unwrap();
        assert_eq!(config.default_mode(), SynthesisMode::WanPro);
    }

    #[test]
    fn oss_requires_all_settings() {
        let err = load(&[("OSS_BUCKET_NAME", "bucket")]).unwrap_err();
        assert!(err.to_string().contains("OSS_ACCESS_KEY_ID"));

        let config = load(&[
            ("OSS_ACCESS_KEY_ID", "id"),
            ("OSS_ACCESS_KEY_SECRET", "secret"),
            ("OSS_BUCKET_NAME", "media"),
            ("OSS_ENDPOINT", "oss-cn-hangzhou.aliyuncs.com"),
        ])
        .unwrap();
        let oss = config.oss().unwrap();
        assert_eq!(oss.endpoint, "https://oss-cn-hangzhou.aliyuncs.com");
        assert_eq!(oss.region, "oss-cn-beijing");
        assert_eq!(oss.key_prefix, "animove");
        assert_eq!(config.storage_backend(), StorageBackend::Oss);
    }

    #[test]
    fn debug_output_never_contains_secrets() {
        let config = load(&[
            ("DASHSCOPE_API_KEY", "sk-very-secret"),
            ("OSS_ACCESS_KEY_ID", "id"),
            ("OSS_ACCESS_KEY_SECRET", "oss-very-secret"),
            ("OSS_BUCKET_NAME", "media"),
            ("OSS_ENDPOINT", "https://oss-cn-beijing.aliyuncs.com"),
        ])
        .unwrap();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("sk-very-secret"));
        assert!(!rendered.contains("oss-very-secret"));
    }

    #[test]
    fn malformed_numbers_fail_startup() {
        for key in [
            "PORT",
            "MAX_IMAGE_SIZE_MB",
            "MAX_VIDEO_SIZE_MB",
            "HTTP_CONCURRENCY_LIMIT",
            "TASK_RETENTION_SECS",
            "TASK_REGISTRY_CAPACITY",
            "FILE_RETENTION_HOURS",
            "FILE_CLEANUP_INTERVAL_SECS",
        ] {
            let err = load(&[(key, "abc")]).unwrap_err();
            assert!(err.to_string().contains(key), "{key}: {err}");
        }

        let err = load(&[
            ("OSS_ACCESS_KEY_ID", "id"),
            ("OSS_ACCESS_KEY_SECRET", "secret"),
            ("OSS_BUCKET_NAME", "media"),
            ("OSS_ENDPOINT", "oss-cn-hangzhou.aliyuncs.com"),
            ("OSS_SIGNED_URL_TTL_SECS", "-5"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("OSS_SIGNED_URL_TTL_SECS"));
    }

    #[test]
    fn oversized_megabyte_limits_fail_startup() {
        let huge = usize::MAX.to_string();
        let err = load(&[("MAX_VIDEO_SIZE_MB", huge.as_str())]).unwrap_err();
        assert!(err.to_string().contains("MAX_VIDEO_SIZE_MB"));

        let config = load(&[("MAX_IMAGE_SIZE_MB", " 12 ")]).unwrap();
        assert_eq!(config.max_image_size_bytes(), 12 * 1024 * 1024);
    }

    #[test]
    fn same_upload_and_download_dir_rejected() {
        assert!(load(&[("UPLOAD_DIR", "files"), ("DOWNLOAD_DIR", "files")]).is_err());
    }
}
