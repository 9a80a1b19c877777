#![allow(dead_code)]

pub mod storage;

use animove_api::setup::routes::setup_routes;
use animove_api::setup::storage::setup_local_storage;
use animove_api::{AppState, TaskRegistry};
use animove_core::Config;
use animove_storage::Storage;
use animove_synthesis::DashScopeClient;
use axum_test::TestServer;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

/// Upstream URL for tests that never reach the synthesis API.
pub const UNREACHABLE_UPSTREAM: &str = "http://127.0.0.1:1";

/// Test application state
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    pub _temp_dir: TempDir,
}

impl TestApp {
    /// Get the HTTP test client
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn upload_dir(&self) -> PathBuf {
        self.state.uploads.base_path().to_path_buf()
    }

    pub fn download_dir(&self) -> PathBuf {
        self.state.downloads.base_path().to_path_buf()
    }
}

pub struct TestOptions {
    pub upstream_url: String,
    pub api_key: Option<String>,
    pub public_storage: Option<Arc<dyn Storage>>,
    pub env: Vec<(&'static str, String)>,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            upstream_url: UNREACHABLE_UPSTREAM.to_string(),
            api_key: Some("test-key".to_string()),
            public_storage: None,
            env: Vec::new(),
        }
    }
}

/// Setup a local-only test application talking to `upstream_url`.
pub async fn setup_test_app(upstream_url: &str) -> TestApp {
    setup_test_app_with(TestOptions {
        upstream_url: upstream_url.to_string(),
        ..TestOptions::default()
    })
    .await
}

pub async fn setup_test_app_with(options: TestOptions) -> TestApp {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    let mut vars: HashMap<&str, String> = HashMap::new();
    vars.insert(
        "UPLOAD_DIR",
        temp_dir.path().join("uploads").display().to_string(),
    );
    vars.insert(
        "DOWNLOAD_DIR",
        temp_dir.path().join("downloads").display().to_string(),
    );
    vars.insert("DASHSCOPE_BASE_URL", options.upstream_url.clone());
    if let Some(key) = &options.api_key {
        vars.insert("DASHSCOPE_API_KEY", key.clone());
    }
    for (key, value) in options.env {
        vars.insert(key, value);
    }

    let config = Config::from_lookup(|key| vars.get(key).cloned()).expect("Invalid test config");

    let (uploads, downloads) = setup_local_storage(&config)
        .await
        .expect("Failed to create local storage");

    let synthesis = DashScopeClient::new(
        options.api_key,
        &options.upstream_url,
        config.synthesis_model(),
    )
    .expect("Failed to create synthesis client");

    let state = Arc::new(AppState {
        config: config.clone(),
        registry: TaskRegistry::new(),
        uploads,
        downloads,
        public_storage: options.public_storage,
        synthesis: Arc::new(synthesis),
    });

    let router = setup_routes(&config, state.clone()).expect("Failed to build router");
    let server = TestServer::new(router.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        state,
        _temp_dir: temp_dir,
    }
}

/// File names currently stored in `dir`.
pub fn files_in(dir: &std::path::Path) -> Vec<String> {
    std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default()
}
