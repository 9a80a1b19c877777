use std::path::PathBuf;

/// A completed synthesis result copied into the download directory.
#[derive(Debug, Clone)]
pub struct DownloadedArtifact {
    /// `result_<8 hex>.mp4`
    pub filename: String,
    pub local_path: PathBuf,
    /// Relay-served URL, e.g. `/downloads/<filename>`
    pub url: String,
    pub size: u64,
}
