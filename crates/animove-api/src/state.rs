use crate::registry::TaskRegistry;
use animove_core::Config;
use animove_storage::{LocalStorage, Storage};
use animove_synthesis::SynthesisProvider;
use std::sync::Arc;

/// Shared application state, built once at startup.
pub struct AppState {
    pub config: Config,
    pub registry: TaskRegistry,
    /// Upload directory, served under `/uploads`.
    pub uploads: Arc<LocalStorage>,
    /// Download directory, served under `/downloads`.
    pub downloads: Arc<LocalStorage>,
    /// Object storage giving uploads a public URL. `None` runs local-only.
    pub public_storage: Option<Arc<dyn Storage>>,
    pub synthesis: Arc<dyn SynthesisProvider>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("tasks", &self.registry.len())
            .field("uploads", &self.uploads.base_path())
            .field("downloads", &self.downloads.base_path())
            .field("public_storage", &self.public_storage.is_some())
            .finish()
    }
}
