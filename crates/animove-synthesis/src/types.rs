use animove_core::models::{SynthesisMode, TaskStatus};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What the relay asks the synthesis API to do.
#[derive(Debug, Clone)]
pub struct SubmitTask {
    pub image_url: String,
    pub video_url: String,
    pub mode: SynthesisMode,
    pub check_image: bool,
}

/// Accepted submission.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitOutcome {
    pub task_id: String,
    pub task_status: TaskStatus,
    pub request_id: Option<String>,
}

/// One status observation of a remote task.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskSnapshot {
    pub task_id: String,
    pub status: TaskStatus,
    /// Only set when the task has SUCCEEDED and a URL could be extracted.
    pub video_url: Option<String>,
    pub video_duration: Option<Value>,
    pub video_ratio: Option<Value>,
    pub code: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SubmitBody<'a> {
    pub model: &'a str,
    pub input: SubmitInput<'a>,
    pub parameters: SubmitParameters,
}

#[derive(Debug, Serialize)]
pub(crate) struct SubmitInput<'a> {
    pub image_url: &'a str,
    pub video_url: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct SubmitParameters {
    pub mode: SynthesisMode,
    pub check_image: bool,
}

/// Envelope shared by every synthesis API response, successful or not.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RemoteResponse {
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub output: Option<RemoteOutput>,
    #[serde(default)]
    pub usage: Option<RemoteUsage>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RemoteOutput {
    #[serde(default)]
    pub task_id: Option<String>,
    #[serde(default)]
    pub task_status: Option<String>,
    /// Kept raw so a results shape we can't read never hides the status.
    #[serde(default)]
    pub results: Option<Value>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RemoteUsage {
    #[serde(default)]
    pub video_duration: Option<Value>,
    #[serde(default)]
    pub video_ratio: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResultObject {
    #[serde(default)]
    pub video_url: Option<String>,
}

/// The shapes `output.results` has been observed in.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ResultsPayload {
    /// `[{"video_url": "..."}]`
    ObjectList(Vec<ResultObject>),
    /// `["..."]`
    UrlList(Vec<String>),
    /// `{"video_url": "..."}`
    Object(ResultObject),
}

impl ResultsPayload {
    pub fn from_value(value: &Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }

    /// URL of the first result, if any.
    pub fn first_video_url(&self) -> Option<&str> {
        let url = match self {
            ResultsPayload::ObjectList(items) => items.first()?.video_url.as_deref(),
            ResultsPayload::UrlList(urls) => urls.first().map(String::as_str),
            ResultsPayload::Object(item) => item.video_url.as_deref(),
        };
        url.filter(|u| !u.is_empty())
    }
}

impl RemoteOutput {
    /// Result URL of a finished task: `results` first, then `output.video_url`.
    pub(crate) fn video_url(&self) -> Option<String> {
        self.results
            .as_ref()
            .and_then(ResultsPayload::from_value)
            .and_then(|payload| payload.first_video_url().map(str::to_string))
            .or_else(|| self.video_url.clone().filter(|u| !u.is_empty()))
    }
}

impl RemoteResponse {
    pub(crate) fn into_snapshot(self, task_id: &str) -> TaskSnapshot {
        let output = self.output.unwrap_or_default();
        let usage = self.usage.unwrap_or_default();

        let status = output
            .task_status
            .clone()
            .map(TaskStatus::from)
            .unwrap_or(TaskStatus::Unknown);

        let video_url = if status == TaskStatus::Succeeded {
            output.video_url()
        } else {
            None
        };

        TaskSnapshot {
            task_id: output.task_id.clone().unwrap_or_else(|| task_id.to_string()),
            status,
            video_url,
            video_duration: usage.video_duration,
            video_ratio: usage.video_ratio,
            code: output.code.or(self.code),
            message: output.message.or(self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot(body: Value) -> TaskSnapshot {
        serde_json::from_value::<RemoteResponse>(body)
            .unwrap()
            .into_snapshot("t-1")
    }

    #[test]
    fn results_shapes() {
        let objects = ResultsPayload::from_value(&json!([{"video_url": "https://a/1.mp4"}]));
        assert_eq!(objects.unwrap().first_video_url(), Some("https://a/1.mp4"));

        let urls = ResultsPayload::from_value(&json!(["https://a/2.mp4", "https://a/3.mp4"]));
        assert_eq!(urls.unwrap().first_video_url(), Some("https://a/2.mp4"));

        let object = ResultsPayload::from_value(&json!({"video_url": "https://a/4.mp4"}));
        assert_eq!(object.unwrap().first_video_url(), Some("https://a/4.mp4"));

        let empty = ResultsPayload::from_value(&json!([]));
        assert_eq!(empty.unwrap().first_video_url(), None);

        assert!(ResultsPayload::from_value(&json!(42)).is_none());
    }

    #[test]
    fn every_results_shape_yields_the_same_url() {
        const URL: &str = "https://oss/result.mp4";
        let shapes = [
            json!([{"video_url": URL}]),
            json!([URL]),
            json!({"video_url": URL}),
        ];

        for results in shapes {
            let payload = ResultsPayload::from_value(&results).unwrap();
            assert_eq!(payload.first_video_url(), Some(URL), "{results}");

            let snap = snapshot(json!({
                "output": {"task_status": "SUCCEEDED", "results": results}
            }));
            assert_eq!(snap.video_url.as_deref(), Some(URL));
        }
    }

    #[test]
    fn succeeded_task_exposes_url_and_usage() {
        let snap = snapshot(json!({
            "request_id": "r",
            "output": {
                "task_id": "t-1",
                "task_status": "SUCCEEDED",
                "results": {"video_url": "https://oss/out.mp4"}
            },
            "usage": {"video_duration": 5.2, "video_ratio": "standard"}
        }));
        assert_eq!(snap.status, TaskStatus::Succeeded);
        assert_eq!(snap.video_url.as_deref(), Some("https://oss/out.mp4"));
        assert_eq!(snap.video_duration, Some(json!(5.2)));
        assert_eq!(snap.video_ratio, Some(json!("standard")));
    }

    #[test]
    fn falls_back_to_output_video_url() {
        let snap = snapshot(json!({
            "output": {
                "task_status": "SUCCEEDED",
                "results": [],
                "video_url": "https://oss/fallback.mp4"
            }
        }));
        assert_eq!(snap.task_id, "t-1");
        assert_eq!(snap.video_url.as_deref(), Some("https://oss/fallback.mp4"));
    }

    #[test]
    fn url_only_reported_for_succeeded_tasks() {
        let snap = snapshot(json!({
            "output": {
                "task_status": "RUNNING",
                "video_url": "https://oss/partial.mp4"
            }
        }));
        assert_eq!(snap.status, TaskStatus::Running);
        assert_eq!(snap.video_url, None);
    }

    #[test]
    fn missing_status_is_unknown_and_errors_pass_through() {
        let snap = snapshot(json!({
            "output": {"code": "InvalidParameter", "message": "bad image"}
        }));
        assert_eq!(snap.status, TaskStatus::Unknown);
        assert_eq!(snap.code.as_deref(), Some("InvalidParameter"));
        assert_eq!(snap.message.as_deref(), Some("bad image"));
    }

    #[test]
    fn unreadable_results_do_not_hide_status() {
        let snap = snapshot(json!({
            "output": {"task_status": "SUCCEEDED", "results": [1, 2]}
        }));
        assert_eq!(snap.status, TaskStatus::Succeeded);
        assert_eq!(snap.video_url, None);
    }

    #[test]
    fn submit_body_shape() {
        let body = SubmitBody {
            model: "animate-move",
            input: SubmitInput {
                image_url: "https://a/i.png",
                video_url: "https://a/v.mp4",
            },
            parameters: SubmitParameters {
                mode: SynthesisMode::WanPro,
                check_image: true,
            },
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "model": "animate-move",
                "input": {"image_url": "https://a/i.png", "video_url": "https://a/v.mp4"},
                "parameters": {"mode": "wan-pro", "check_image": true}
            })
        );
    }
}
