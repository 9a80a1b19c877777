use crate::error::synthesis_app_error;
use crate::state::AppState;
use animove_core::models::TaskResult;
use animove_core::AppError;
use animove_synthesis::TaskSnapshot;

/// Reads remote task status on demand and mirrors it into the registry.
pub struct StatusPoller<'a> {
    state: &'a AppState,
}

impl<'a> StatusPoller<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// One remote status read. Unknown ids are reported but never registered.
    #[tracing::instrument(skip(self))]
    pub async fn poll(&self, task_id: &str) -> Result<TaskSnapshot, AppError> {
        let task_id = task_id.trim();
        if task_id.is_empty() {
            return Err(AppError::InvalidInput("task_id is required".to_string()));
        }

        let snapshot = self
            .state
            .synthesis
            .query(task_id)
            .await
            .map_err(synthesis_app_error)?;

        let result = snapshot.video_url.clone().map(|video_url| TaskResult { video_url });
        let known = self
            .state
            .registry
            .update_status(task_id, snapshot.status.clone(), result);

        tracing::debug!(
            task_id = %task_id,
            task_status = %snapshot.status,
            known,
            "Task status polled"
        );

        Ok(snapshot)
    }
}
