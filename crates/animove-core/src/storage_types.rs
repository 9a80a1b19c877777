use std::fmt::{Display, Formatter, Result as FmtResult};

/// Where an uploaded asset ended up.
///
/// `Oss` is the S3-compatible object store holding a publicly reachable copy;
/// `Local` is the relay's own upload/download directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Oss,
    Local,
}

impl Display for StorageBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            StorageBackend::Oss => write!(f, "oss"),
            StorageBackend::Local => write!(f, "local"),
        }
    }
}
