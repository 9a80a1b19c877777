mod helpers;

use helpers::storage::MemoryStorage;
use helpers::{setup_test_app, setup_test_app_with, TestOptions, UNREACHABLE_UPSTREAM};
use serde_json::Value;
use std::sync::Arc;

#[tokio::test]
async fn test_health_reports_configuration() {
    let app = setup_test_app(UNREACHABLE_UPSTREAM).await;

    let response = app.client().get("/health").await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["api_key_configured"], true);
    assert_eq!(body["storage_configured"], false);
}

#[tokio::test]
async fn test_health_without_api_key_or_storage() {
    let app = setup_test_app_with(TestOptions {
        api_key: None,
        ..TestOptions::default()
    })
    .await;

    let body: Value = app.client().get("/health").await.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["api_key_configured"], false);
}

#[tokio::test]
async fn test_config_exposes_limits_without_credentials() {
    let app = setup_test_app_with(TestOptions {
        public_storage: Some(Arc::new(MemoryStorage::default())),
        env: vec![("MAX_VIDEO_SIZE_MB", "50".to_string())],
        ..TestOptions::default()
    })
    .await;

    let response = app.client().get("/api/config").await;

    assert_eq!(response.status_code(), 200);
    let text = response.text();
    assert!(!text.contains("test-key"));

    let body: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["oss_configured"], true);
    assert_eq!(body["storage_backend"], "oss");
    assert_eq!(body["default_mode"], "wan-std");
    assert_eq!(body["modes"], serde_json::json!(["wan-std", "wan-pro"]));
    assert_eq!(body["max_image_size"], 5 * 1024 * 1024);
    assert_eq!(body["max_video_size"], 50 * 1024 * 1024);
    assert!(body["image_extensions"]
        .as_array()
        .unwrap()
        .iter()
        .any(|e| e == "webp"));
}

#[tokio::test]
async fn test_missing_files_return_404() {
    let app = setup_test_app(UNREACHABLE_UPSTREAM).await;

    for path in ["/uploads/nothing_here.png", "/downloads/result_00000000.mp4"] {
        let response = app.client().get(path).await;
        assert_eq!(response.status_code(), 404, "{path}");
        let body: Value = response.json();
        assert_eq!(body["code"], "NOT_FOUND");
    }
}

#[tokio::test]
async fn test_traversal_names_are_not_served() {
    let app = setup_test_app(UNREACHABLE_UPSTREAM).await;
    std::fs::write(app.upload_dir().join("..secret"), b"x").unwrap();

    let response = app.client().get("/uploads/..secret").await;
    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = setup_test_app(UNREACHABLE_UPSTREAM).await;

    let response = app
        .client()
        .get("/health")
        .add_header("x-request-id", "trace-123")
        .await;
    assert_eq!(response.header("x-request-id"), "trace-123");

    let response = app.client().get("/health").await;
    assert!(!response.header("x-request-id").is_empty());
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = setup_test_app(UNREACHABLE_UPSTREAM).await;

    let response = app.client().get("/api/openapi.json").await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert!(body["paths"]["/api/generate"].is_object());
    assert!(body["paths"]["/api/task/{task_id}"].is_object());
}

#[tokio::test]
async fn test_production_config_hides_error_details() {
    let app = setup_test_app_with(TestOptions {
        env: vec![
            ("ENVIRONMENT", "production".to_string()),
            ("CORS_ORIGINS", "https://studio.example.com".to_string()),
        ],
        ..TestOptions::default()
    })
    .await;
    assert!(app.state.config.is_production());

    let body: Value = app
        .client()
        .post("/api/generate")
        .json(&serde_json::json!({"image_url": "https://cdn.example.com/a.png"}))
        .await
        .json();
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "INVALID_INPUT");
    assert!(body.get("details").is_none());
    assert!(body.get("error_type").is_none());

    let response = app.client().get("/uploads/missing.png").await;
    assert_eq!(response.status_code(), 404);
    let body: Value = response.json();
    assert!(body.get("details").is_none());
}

#[tokio::test]
async fn test_development_config_keeps_error_details() {
    let app = setup_test_app(UNREACHABLE_UPSTREAM).await;

    let body: Value = app
        .client()
        .post("/api/generate")
        .json(&serde_json::json!({"image_url": "https://cdn.example.com/a.png"}))
        .await
        .json();
    assert_eq!(body["error_type"], "InvalidInput");
    assert!(body["details"].is_string());
}
