use crate::error::synthesis_app_error;
use crate::state::AppState;
use crate::utils::url::is_http_url;
use animove_core::models::{GenerationTask, SynthesisMode};
use animove_core::AppError;
use animove_synthesis::{SubmitOutcome, SubmitTask};
use serde::Deserialize;
use utoipa::ToSchema;

/// Body of `POST /api/generate`.
#[derive(Debug, Default, Clone, Deserialize, ToSchema)]
pub struct GenerateParams {
    /// Public URL of the reference image
    #[serde(default)]
    pub image_url: Option<String>,
    /// Public URL of the driving video
    #[serde(default)]
    pub video_url: Option<String>,
    /// `wan-std` (default) or `wan-pro`
    #[serde(default)]
    pub mode: Option<String>,
    /// Ask the remote to validate the image first (default `true`)
    #[serde(default)]
    pub check_image: Option<bool>,
}

/// Creates remote synthesis tasks and registers them.
pub struct GenerationService<'a> {
    state: &'a AppState,
}

fn require_public_url(value: Option<&str>, field: &str) -> Result<String, AppError> {
    let url = value.map(str::trim).unwrap_or_default();
    if url.is_empty() {
        return Err(AppError::InvalidInput(
            "Both image_url and video_url are required".to_string(),
        ));
    }
    if !is_http_url(url) {
        return Err(AppError::InvalidInput(format!(
            "{} must be a public http(s) URL; local files are not reachable by the synthesis service, configure object storage or pass a public URL",
            field
        )));
    }
    Ok(url.to_string())
}

impl<'a> GenerationService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Validate `params`, submit one remote task and register it.
    #[tracing::instrument(skip(self, params))]
    pub async fn submit(&self, params: GenerateParams) -> Result<SubmitOutcome, AppError> {
        let video_url = require_public_url(params.video_url.as_deref(), "video_url")?;
        let image_url = require_public_url(params.image_url.as_deref(), "image_url")?;

        let mode = match params.mode.as_deref().map(str::trim) {
            None | Some("") => self.state.config.default_mode(),
            Some(raw) => raw
                .parse::<SynthesisMode>()
                .map_err(|e| AppError::InvalidInput(e.to_string()))?,
        };

        let task = SubmitTask {
            image_url,
            video_url,
            mode,
            check_image: params.check_image.unwrap_or(true),
        };

        let outcome = self
            .state
            .synthesis
            .submit(&task)
            .await
            .map_err(synthesis_app_error)?;

        self.state.registry.insert(GenerationTask::new(
            outcome.task_id.clone(),
            outcome.task_status.clone(),
            mode,
        ));

        tracing::info!(
            task_id = %outcome.task_id,
            task_status = %outcome.task_status,
            mode = %mode,
            "Generation task registered"
        );

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_urls_are_rejected() {
        let err = require_public_url(None, "image_url").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid input: Both image_url and video_url are required"
        );
        assert!(require_public_url(Some("   "), "video_url").is_err());
    }

    #[test]
    fn local_urls_name_the_field() {
        let err = require_public_url(Some("/uploads/abc_v.mp4"), "video_url").unwrap_err();
        assert!(err.to_string().contains("video_url must be a public http(s) URL"));
    }

    #[test]
    fn public_urls_are_trimmed() {
        assert_eq!(
            require_public_url(Some(" https://cdn.example.com/a.png "), "image_url").unwrap(),
            "https://cdn.example.com/a.png"
        );
    }
}
