//! Request-independent business logic behind the handlers.

pub mod cleanup;
pub mod generation;
pub mod result_fetcher;
pub mod status;
pub mod upload;

pub use cleanup::CleanupService;
pub use generation::{GenerateParams, GenerationService};
pub use result_fetcher::ResultFetcher;
pub use status::StatusPoller;
pub use upload::UploadService;
