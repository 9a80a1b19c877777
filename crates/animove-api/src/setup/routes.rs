//! Route configuration and setup

use crate::api_doc::ApiDoc;
use crate::constants::{API_PREFIX, DOWNLOADS_ROUTE, UPLOADS_ROUTE};
use crate::handlers;
use crate::middleware::{
    redact_error_details, request_id_middleware, ErrorDetailPolicy, RequestId,
};
use crate::state::AppState;
use animove_core::Config;
use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, Request},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

/// Room for multipart boundaries and headers on top of the largest file.
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    let body_limit = config
        .max_video_size_bytes()
        .max(config.max_image_size_bytes())
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    let http_concurrency_limit = config.http_concurrency_limit().max(1);
    tracing::info!(
        http_concurrency_limit,
        body_limit_bytes = body_limit,
        "HTTP limits configured"
    );

    let error_policy = ErrorDetailPolicy {
        redact: config.is_production(),
    };

    let trace_layer = TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
        let request_id = request
            .extensions()
            .get::<RequestId>()
            .map(|id| id.0.as_str())
            .unwrap_or("-");
        tracing::info_span!(
            "http_request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %request_id,
        )
    });

    let api: Router<Arc<AppState>> = Router::new()
        // Uploads
        .route("/upload/image", post(handlers::upload::upload_image))
        .route("/upload/video", post(handlers::upload::upload_video))
        // Task lifecycle
        .route("/generate", post(handlers::generate::generate))
        .route("/task/{task_id}", get(handlers::task::get_task_status))
        .route("/save-video", post(handlers::save_video::save_video))
        .route("/tasks", get(handlers::tasks::list_tasks))
        .route("/config", get(handlers::config::get_config))
        .route("/openapi.json", get(|| async { Json(ApiDoc::openapi()) }));

    let app = Router::new()
        .nest(API_PREFIX, api)
        .route("/health", get(handlers::health::health_check))
        // Files
        .route(
            &format!("{}/{{filename}}", UPLOADS_ROUTE),
            get(handlers::files::serve_upload),
        )
        .route(
            &format!("{}/{{filename}}", DOWNLOADS_ROUTE),
            get(handlers::files::serve_download),
        )
        .with_state(state)
        .merge(utoipa_rapidoc::RapiDoc::new("/api/openapi.json").path("/docs"))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(ConcurrencyLimitLayer::new(http_concurrency_limit))
        .layer(axum::middleware::map_response_with_state(
            error_policy,
            redact_error_details,
        ))
        .layer(cors)
        .layer(trace_layer)
        .layer(axum::middleware::from_fn(request_id_middleware));

    Ok(app)
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .map_err(|e| anyhow::anyhow!("Invalid CORS origin '{}': {}", o, e))
            })
            .collect::<Result<Vec<_>, _>>()?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    };
    Ok(cors)
}
