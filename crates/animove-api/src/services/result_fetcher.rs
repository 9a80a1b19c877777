use crate::error::synthesis_app_error;
use crate::state::AppState;
use crate::utils::url::is_http_url;
use animove_core::models::DownloadedArtifact;
use animove_core::AppError;
use tokio::fs;
use uuid::Uuid;

/// Copies a finished artifact into the download directory.
pub struct ResultFetcher<'a> {
    state: &'a AppState,
}

/// `result_<8 hex>.mp4`
fn artifact_filename() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("result_{}.mp4", &id[..8])
}

impl<'a> ResultFetcher<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    #[tracing::instrument(skip(self, video_url))]
    pub async fn fetch(&self, video_url: &str) -> Result<DownloadedArtifact, AppError> {
        let video_url = video_url.trim();
        if video_url.is_empty() {
            return Err(AppError::InvalidInput("video_url is required".to_string()));
        }
        if !is_http_url(video_url) {
            return Err(AppError::InvalidInput(
                "video_url must be an http(s) URL".to_string(),
            ));
        }

        let downloads = &self.state.downloads;
        let filename = artifact_filename();
        let (local_path, mut file) = downloads
            .create_file(&filename)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to create download file: {}", e)))?;

        let size = match self.state.synthesis.download(video_url, &mut file).await {
            Ok(size) => size,
            Err(e) => {
                drop(file);
                if let Err(cleanup) = fs::remove_file(&local_path).await {
                    tracing::warn!(error = %cleanup, path = %local_path.display(), "Failed to remove partial download");
                }
                return Err(synthesis_app_error(e));
            }
        };

        tracing::info!(filename = %filename, size_bytes = size, "Result saved");

        Ok(DownloadedArtifact {
            url: downloads.url_for(&filename),
            filename,
            local_path,
            size,
        })
    }
}
