pub mod artifact;
pub mod media;
pub mod task;

pub use artifact::DownloadedArtifact;
pub use media::{MediaKind, UploadedAsset};
pub use task::{GenerationTask, SynthesisMode, TaskResult, TaskStatus};
