//! In-memory registry of synthesis tasks created through this process.

use animove_core::models::{GenerationTask, TaskResult, TaskStatus};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Task records keyed by remote task id.
///
/// Nothing is persisted. Entries leave only through the retention policy:
/// age (`retention`) and size (`capacity`, oldest evicted first). Both are
/// unbounded by default.
#[derive(Debug, Default)]
pub struct TaskRegistry {
    tasks: Mutex<HashMap<String, GenerationTask>>,
    retention: Option<Duration>,
    capacity: Option<usize>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(retention: Option<Duration>, capacity: Option<usize>) -> Self {
        Self {
            tasks: Mutex::new(HashMap::new()),
            retention: retention.filter(|d| !d.is_zero()),
            capacity: capacity.filter(|c| *c > 0),
        }
    }

    // A panic while holding the lock cannot leave a half-written entry, so a
    // poisoned map is still consistent.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, GenerationTask>> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn purge_expired(&self, tasks: &mut HashMap<String, GenerationTask>) {
        let Some(retention) = self.retention else {
            return;
        };
        let Ok(retention) = chrono::Duration::from_std(retention) else {
            return;
        };
        let cutoff = Utc::now() - retention;
        let before = tasks.len();
        tasks.retain(|_, task| task.created_at > cutoff);
        let purged = before - tasks.len();
        if purged > 0 {
            tracing::debug!(purged, "Purged expired task records");
        }
    }

    /// Register a newly created task.
    pub fn insert(&self, task: GenerationTask) {
        let mut tasks = self.lock();
        self.purge_expired(&mut tasks);

        if let Some(capacity) = self.capacity {
            while tasks.len() >= capacity && !tasks.contains_key(&task.task_id) {
                let oldest = tasks
                    .values()
                    .min_by_key(|t| t.created_at)
                    .map(|t| t.task_id.clone());
                match oldest {
                    Some(id) => {
                        tasks.remove(&id);
                        tracing::debug!(task_id = %id, "Evicted oldest task record");
                    }
                    None => break,
                }
            }
        }

        tasks.insert(task.task_id.clone(), task);
    }

    /// Record a status observation. Unknown ids are ignored; returns whether the id was known.
    pub fn update_status(
        &self,
        task_id: &str,
        status: TaskStatus,
        result: Option<TaskResult>,
    ) -> bool {
        let mut tasks = self.lock();
        match tasks.get_mut(task_id) {
            Some(task) => {
                task.status = status;
                if result.is_some() {
                    task.result = result;
                }
                true
            }
            None => false,
        }
    }

    pub fn get(&self, task_id: &str) -> Option<GenerationTask> {
        self.lock().get(task_id).cloned()
    }

    /// All tasks, oldest first.
    pub fn list(&self) -> Vec<GenerationTask> {
        let mut tasks = self.lock();
        self.purge_expired(&mut tasks);
        let mut all: Vec<GenerationTask> = tasks.values().cloned().collect();
        drop(tasks);

        all.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.task_id.cmp(&b.task_id))
        });
        all
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
