use thiserror::Error;

/// Failures talking to the synthesis API or fetching its artifacts.
#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("DASHSCOPE_API_KEY is not configured")]
    NotConfigured,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Network failure or timeout before a response arrived.
    #[error("{0}")]
    Transport(String),

    /// The API answered with a failure.
    #[error("{message}")]
    Rejected {
        status: u16,
        code: Option<String>,
        message: String,
    },

    /// The API answered successfully but the body was not what we expect.
    #[error("Unexpected response from synthesis API: {0}")]
    InvalidResponse(String),

    #[error("Download failed: {0}")]
    DownloadStatus(u16),

    #[error("Failed to write artifact: {0}")]
    Write(#[from] std::io::Error),
}

impl SynthesisError {
    /// Remote error code, when the API supplied one.
    pub fn remote_code(&self) -> Option<&str> {
        match self {
            SynthesisError::Rejected { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    pub(crate) fn from_reqwest(err: reqwest::Error, what: &str) -> Self {
        if err.is_timeout() {
            SynthesisError::Transport(format!("{} timed out", what))
        } else {
            SynthesisError::Transport(format!("{} failed: {}", what, err))
        }
    }
}
