use crate::error::RenderedError;
use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};

/// Whether error bodies may carry internal details. Built from `Config` at startup.
#[derive(Debug, Clone, Copy)]
pub struct ErrorDetailPolicy {
    pub redact: bool,
}

/// Re-renders error bodies without `details`/`error_type` when redaction is on.
pub async fn redact_error_details(
    State(policy): State<ErrorDetailPolicy>,
    mut response: Response,
) -> Response {
    let Some(RenderedError(mut body)) = response.extensions_mut().remove::<RenderedError>() else {
        return response;
    };
    if !policy.redact || (body.details.is_none() && body.error_type.is_none()) {
        return response;
    }
    body.redact();

    let (mut parts, _) = response.into_parts();
    let (rendered, json) = Json(body).into_response().into_parts();
    parts.headers.remove(header::CONTENT_LENGTH);
    if let Some(content_type) = rendered.headers.get(header::CONTENT_TYPE) {
        parts.headers.insert(header::CONTENT_TYPE, content_type.clone());
    }
    Response::from_parts(parts, json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HttpAppError;
    use animove_core::AppError;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn render(redact: bool) -> (u16, Value) {
        let response =
            HttpAppError(AppError::InvalidInput("No file selected".to_string())).into_response();
        let response = redact_error_details(State(ErrorDetailPolicy { redact }), response).await;
        let status = response.status().as_u16();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn production_policy_strips_details() {
        let (status, body) = render(true).await;
        assert_eq!(status, 400);
        assert_eq!(body["error"], "No file selected");
        assert_eq!(body["code"], "INVALID_INPUT");
        assert!(body.get("details").is_none());
        assert!(body.get("error_type").is_none());
    }

    #[tokio::test]
    async fn development_policy_keeps_details() {
        let (_, body) = render(false).await;
        assert_eq!(body["details"], "Invalid input: No file selected");
        assert_eq!(body["error_type"], "InvalidInput");
    }
}
