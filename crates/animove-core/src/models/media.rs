use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::PathBuf;

use crate::storage_types::StorageBackend;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "webp"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mov"];

/// Declared kind of an uploaded file. Decides the extension allowlist and size ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }

    /// Lowercase extensions accepted for this kind.
    pub fn allowed_extensions(&self) -> &'static [&'static str] {
        match self {
            MediaKind::Image => IMAGE_EXTENSIONS,
            MediaKind::Video => VIDEO_EXTENSIONS,
        }
    }

    pub fn allows_extension(&self, extension: &str) -> bool {
        let extension = extension.to_lowercase();
        self.allowed_extensions().contains(&extension.as_str())
    }

    /// Content type served for an allowed extension. Content is never sniffed.
    pub fn content_type_for(extension: &str) -> &'static str {
        match extension.to_lowercase().as_str() {
            "jpg" | "jpeg" => "image/jpeg",
            "png" => "image/png",
            "bmp" => "image/bmp",
            "webp" => "image/webp",
            "mp4" => "video/mp4",
            "avi" => "video/x-msvideo",
            "mov" => "video/quicktime",
            _ => "application/octet-stream",
        }
    }
}

impl Display for MediaKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// A validated upload persisted in the upload directory, and optionally published
/// to object storage.
#[derive(Debug, Clone)]
pub struct UploadedAsset {
    pub kind: MediaKind,
    /// `<32 hex uuid>_<sanitized original name>`
    pub filename: String,
    pub extension: String,
    pub size: u64,
    pub content_type: &'static str,
    pub local_path: PathBuf,
    /// Relay-served URL, e.g. `/uploads/<filename>`
    pub local_url: String,
    /// Publicly reachable URL when the object store accepted the file.
    pub public_url: Option<String>,
    pub storage: StorageBackend,
}

impl UploadedAsset {
    /// URL clients should hand to the synthesis API: the public one when available.
    pub fn primary_url(&self) -> &str {
        self.public_url.as_deref().unwrap_or(&self.local_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_checks_are_case_insensitive() {
        assert!(MediaKind::Image.allows_extension("JPG"));
        assert!(MediaKind::Image.allows_extension("webp"));
        assert!(!MediaKind::Image.allows_extension("gif"));
        assert!(MediaKind::Video.allows_extension("MOV"));
        assert!(!MediaKind::Video.allows_extension("mkv"));
        assert!(!MediaKind::Video.allows_extension("png"));
    }

    #[test]
    fn content_type_follows_extension() {
        assert_eq!(MediaKind::content_type_for("JPEG"), "image/jpeg");
        assert_eq!(MediaKind::content_type_for("avi"), "video/x-msvideo");
        assert_eq!(MediaKind::content_type_for("txt"), "application/octet-stream");
    }

    #[test]
    fn primary_url_prefers_public_copy() {
        let mut asset = UploadedAsset {
            kind: MediaKind::Image,
            filename: "abc_a.png".to_string(),
            extension: "png".to_string(),
            size: 3,
            content_type: "image/png",
            local_path: PathBuf::from("uploads/abc_a.png"),
            local_url: "/uploads/abc_a.png".to_string(),
            public_url: None,
            storage: StorageBackend::Local,
        };
        assert_eq!(asset.primary_url(), "/uploads/abc_a.png");

        asset.public_url = Some("https://bucket.example/abc_a.png".to_string());
        assert_eq!(asset.primary_url(), "https://bucket.example/abc_a.png");
    }
}
