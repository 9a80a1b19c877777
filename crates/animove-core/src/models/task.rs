use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use utoipa::ToSchema;

/// Remote task status. Values reported by the synthesis API are kept verbatim,
/// including ones this relay does not know about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
    Canceled,
    /// Local sentinel for "the remote did not tell us".
    Unknown,
    Other(String),
}

impl TaskStatus {
    pub fn as_str(&self) -> &str {
        match self {
            TaskStatus::Pending => "PENDING",
            TaskStatus::Running => "RUNNING",
            TaskStatus::Succeeded => "SUCCEEDED",
            TaskStatus::Failed => "FAILED",
            TaskStatus::Canceled => "CANCELED",
            TaskStatus::Unknown => "UNKNOWN",
            TaskStatus::Other(raw) => raw,
        }
    }
}

impl From<String> for TaskStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "PENDING" => TaskStatus::Pending,
            "RUNNING" => TaskStatus::Running,
            "SUCCEEDED" => TaskStatus::Succeeded,
            "FAILED" => TaskStatus::Failed,
            "CANCELED" => TaskStatus::Canceled,
            "UNKNOWN" => TaskStatus::Unknown,
            _ => TaskStatus::Other(raw),
        }
    }
}

impl From<&str> for TaskStatus {
    fn from(raw: &str) -> Self {
        TaskStatus::from(raw.to_string())
    }
}

impl From<TaskStatus> for String {
    fn from(status: TaskStatus) -> Self {
        match status {
            TaskStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl Display for TaskStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Synthesis quality mode accepted by the remote model.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum SynthesisMode {
    #[default]
    WanStd,
    WanPro,
}

impl SynthesisMode {
    pub const ALL: [SynthesisMode; 2] = [SynthesisMode::WanStd, SynthesisMode::WanPro];

    pub fn as_str(&self) -> &'static str {
        match self {
            SynthesisMode::WanStd => "wan-std",
            SynthesisMode::WanPro => "wan-pro",
        }
    }
}

impl Display for SynthesisMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for SynthesisMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "wan-std" => Ok(SynthesisMode::WanStd),
            "wan-pro" => Ok(SynthesisMode::WanPro),
            other => Err(anyhow::anyhow!(
                "Invalid mode '{}', allowed: wan-std, wan-pro",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TaskResult {
    pub video_url: String,
}

/// One remote synthesis job as last observed by this process.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GenerationTask {
    pub task_id: String,
    #[schema(value_type = String, example = "PENDING")]
    pub status: TaskStatus,
    pub mode: SynthesisMode,
    pub created_at: DateTime<Utc>,
    pub result: Option<TaskResult>,
}

impl GenerationTask {
    pub fn new(task_id: impl Into<String>, status: TaskStatus, mode: SynthesisMode) -> Self {
        Self {
            task_id: task_id.into(),
            status,
            mode,
            created_at: Utc::now(),
            result: None,
        }
    }
}
