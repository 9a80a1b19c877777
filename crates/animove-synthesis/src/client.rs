use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, Response, Url};
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::{Duration, Instant};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::error::SynthesisError;
use crate::types::{
    RemoteResponse, SubmitBody, SubmitInput, SubmitOutcome, SubmitParameters, SubmitTask,
    TaskSnapshot,
};
use animove_core::models::TaskStatus;

pub const SUBMIT_TIMEOUT: Duration = Duration::from_secs(30);
pub const QUERY_TIMEOUT: Duration = Duration::from_secs(60);
pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(120);

const SUBMIT_PATH: &str = "/services/aigc/image2video/video-synthesis";

/// Remote video-synthesis backend.
#[async_trait]
pub trait SynthesisProvider: Send + Sync {
    /// Create a remote task. Returns as soon as the remote accepts it.
    async fn submit(&self, task: &SubmitTask) -> Result<SubmitOutcome, SynthesisError>;

    /// One status read of a remote task.
    async fn query(&self, task_id: &str) -> Result<TaskSnapshot, SynthesisError>;

    /// Stream the artifact at `url` into `writer`, returning the bytes written.
    async fn download(
        &self,
        url: &str,
        writer: &mut (dyn AsyncWrite + Unpin + Send),
    ) -> Result<u64, SynthesisError>;

    /// Whether credentials are present.
    fn is_configured(&self) -> bool;
}

/// DashScope client for the `animate-move` model family.
pub struct DashScopeClient {
    http_client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl Debug for DashScopeClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("DashScopeClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key_configured", &self.api_key.is_some())
            .finish()
    }
}

impl DashScopeClient {
    pub fn new(
        api_key: Option<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self, SynthesisError> {
        let http_client = Client::builder().build().map_err(|e| {
            SynthesisError::Transport(format!("Failed to create HTTP client: {}", e))
        })?;

        Ok(Self {
            http_client,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        })
    }

    fn api_key(&self) -> Result<&str, SynthesisError> {
        self.api_key.as_deref().ok_or(SynthesisError::NotConfigured)
    }

    fn task_url(&self, task_id: &str) -> Result<Url, SynthesisError> {
        let mut url = Url::parse(&format!("{}/tasks", self.base_url))
            .map_err(|e| SynthesisError::InvalidRequest(format!("Bad base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| SynthesisError::InvalidRequest("Bad base URL".to_string()))?
            .push(task_id);
        Ok(url)
    }
}

/// Read a response body as the shared envelope. Non-2xx answers become `Rejected`.
async fn read_envelope(response: Response) -> Result<RemoteResponse, SynthesisError> {
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| SynthesisError::from_reqwest(e, "Reading response"))?;

    let parsed = serde_json::from_str::<RemoteResponse>(&text);

    if !status.is_success() {
        let envelope = parsed.unwrap_or_default();
        let message = envelope.message.unwrap_or_else(|| {
            if text.trim().is_empty() {
                format!("Synthesis API returned {}", status)
            } else {
                text.clone()
            }
        });
        return Err(SynthesisError::Rejected {
            status: status.as_u16(),
            code: envelope.code,
            message,
        });
    }

    parsed.map_err(|e| SynthesisError::InvalidResponse(e.to_string()))
}

#[async_trait]
impl SynthesisProvider for DashScopeClient {
    async fn submit(&self, task: &SubmitTask) -> Result<SubmitOutcome, SynthesisError> {
        let api_key = self.api_key()?;
        let body = SubmitBody {
            model: &self.model,
            input: SubmitInput {
                image_url: &task.image_url,
                video_url: &task.video_url,
            },
            parameters: SubmitParameters {
                mode: task.mode,
                check_image: task.check_image,
            },
        };

        let start = Instant::now();
        let response = self
            .http_client
            .post(format!("{}{}", self.base_url, SUBMIT_PATH))
            .bearer_auth(api_key)
            .header("X-DashScope-Async", "enable")
            .timeout(SUBMIT_TIMEOUT)
            .json(&body)
            .send()
            .await
            .map_err(|e| SynthesisError::from_reqwest(e, "Task submission"))?;

        let envelope = read_envelope(response).await?;
        let output = envelope.output.unwrap_or_default();

        let Some(task_id) = output.task_id.filter(|id| !id.is_empty()) else {
            return Err(SynthesisError::InvalidResponse(
                envelope
                    .message
                    .unwrap_or_else(|| "response did not contain a task_id".to_string()),
            ));
        };

        let task_status = output
            .task_status
            .map(TaskStatus::from)
            .unwrap_or(TaskStatus::Pending);

        tracing::info!(
            task_id = %task_id,
            task_status = %task_status,
            mode = %task.mode,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Synthesis task submitted"
        );

        Ok(SubmitOutcome {
            task_id,
            task_status,
            request_id: envelope.request_id,
        })
    }

    async fn query(&self, task_id: &str) -> Result<TaskSnapshot, SynthesisError> {
        let api_key = self.api_key()?;
        let url = self.task_url(task_id)?;

        let response = self
            .http_client
            .get(url)
            .bearer_auth(api_key)
            .timeout(QUERY_TIMEOUT)
            .send()
            .await
            .map_err(|e| SynthesisError::from_reqwest(e, "Task query"))?;

        let snapshot = read_envelope(response).await?.into_snapshot(task_id);

        tracing::debug!(
            task_id = %task_id,
            task_status = %snapshot.status,
            has_result = snapshot.video_url.is_some(),
            "Synthesis task queried"
        );

        Ok(snapshot)
    }

    async fn download(
        &self,
        url: &str,
        writer: &mut (dyn AsyncWrite + Unpin + Send),
    ) -> Result<u64, SynthesisError> {
        let start = Instant::now();
        let response = self
            .http_client
            .get(url)
            .timeout(DOWNLOAD_TIMEOUT)
            .send()
            .await
            .map_err(|e| SynthesisError::from_reqwest(e, "Artifact download"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SynthesisError::DownloadStatus(status.as_u16()));
        }

        let mut written: u64 = 0;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| SynthesisError::from_reqwest(e, "Artifact download"))?;
            writer.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        writer.flush().await?;

        tracing::info!(
            size_bytes = written,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Artifact downloaded"
        );

        Ok(written)
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_api_key_is_unconfigured() {
        let client = DashScopeClient::new(Some("  ".to_string()), "https://x/api/v1/", "m").unwrap();
        assert!(!client.is_configured());
        assert_eq!(client.base_url, "https://x/api/v1");
    }

    #[test]
    fn task_ids_are_escaped_into_one_segment() {
        let client = DashScopeClient::new(None, "https://x/api/v1", "m").unwrap();
        assert_eq!(
            client.task_url("abc-123").unwrap().as_str(),
            "https://x/api/v1/tasks/abc-123"
        );
        assert_eq!(
            client.task_url("../a b").unwrap().as_str(),
            "https://x/api/v1/tasks/..%2Fa%20b"
        );
    }

    #[test]
    fn debug_hides_key() {
        let client = DashScopeClient::new(Some("sk-secret".to_string()), "https://x", "m").unwrap();
        assert!(!format!("{:?}", client).contains("sk-secret"));
    }
}
