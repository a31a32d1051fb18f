// src/decoder/mod.rs

use crate::error::ClientError;
use crate::protocol::{ProjectResult, ResponseShape, Task};
use serde::Deserialize;
use serde_json::Value;

/// Turns a success body into a `ProjectResult`, reading it as `shape`.
pub fn decode(shape: ResponseShape, body: &[u8]) -> Result<ProjectResult, ClientError> {
    let result = match shape {
        ResponseShape::Flat => {
            let flat: FlatResponse = parse(body)?;
            ProjectResult {
                summary: flat.summary.unwrap_or_default(),
                tasks: flat.tasks.into_iter().map(RawTask::into_task).collect(),
                artifact_directory: flat.project_dir.unwrap_or_default(),
                server_message: flat.message,
                generated_at: flat.generated_at,
            }
        }
        ResponseShape::Wrapped => {
            let wrapped: WrappedResponse = parse(body)?;
            ProjectResult {
                summary: wrapped.result.summary,
                tasks: wrapped
                    .result
                    .tasks
                    .into_iter()
                    .map(RawTask::into_task)
                    .collect(),
                artifact_directory: String::new(),
                server_message: None,
                generated_at: None,
            }
        }
    };

    tracing::debug!(
        shape = ?shape,
        tasks = result.tasks.len(),
        "decoded generation response"
    );
    Ok(result)
}

/// Pulls the server's `detail` message out of an error body.
///
/// Anything that isn't a non-empty string (missing, a validation list,
/// an unparseable body) yields `None` so the caller falls back to the
/// generic message.
pub fn error_detail(body: &[u8]) -> Option<String> {
    let json: Value = serde_json::from_slice(body).ok()?;
    json.get("detail")
        .and_then(|v| v.as_str())
        .filter(|detail| !detail.trim().is_empty())
        .map(str::to_string)
}

fn parse<'a, T: Deserialize<'a>>(body: &'a [u8]) -> Result<T, ClientError> {
    serde_json::from_slice(body).map_err(|e| ClientError::Decode(e.to_string()))
}

#[derive(Deserialize)]
struct FlatResponse {
    #[serde(default)]
    summary: Option<String>,
    tasks: Vec<RawTask>,
    #[serde(default)]
    project_dir: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    generated_at: Option<String>,
}

#[derive(Deserialize)]
struct WrappedResponse {
    result: WrappedResult,
}

#[derive(Deserialize)]
struct WrappedResult {
    summary: String,
    tasks: Vec<RawTask>,
}

/// Either shape may carry either task form; the decoder doesn't care which.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawTask {
    Text(String),
    Record {
        name: String,
        #[serde(default)]
        description: Option<String>,
        #[serde(default)]
        assigned_to: Option<String>,
    },
}

impl RawTask {
    fn into_task(self) -> Task {
        match self {
            RawTask::Text(name) => Task {
                name,
                description: None,
                assigned_to: None,
            },
            RawTask::Record {
                name,
                description,
                assigned_to,
            } => Task {
                name,
                description,
                assigned_to,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn flat_shape_keeps_task_order() {
        let body = br#"{
            "project_dir": "C:\\gen\\movie-app",
            "tasks": [
                {"name": "Setup Backend", "description": "Initialize FastAPI backend", "assigned_to": "Backend"},
                {"name": "Setup Frontend", "description": "Initialize React app", "assigned_to": "Frontend"},
                {"name": "Integrate APIs", "description": "Connect frontend and backend", "assigned_to": "Coordinator"}
            ],
            "message": "Project generated successfully",
            "generated_at": "2025-01-02T03:04:05Z"
        }"#;

        let result = decode(ResponseShape::Flat, body).unwrap();
        assert_eq!(
            result.tasks,
            vec![
                Task::assigned("Setup Backend", "Initialize FastAPI backend", "Backend"),
                Task::assigned("Setup Frontend", "Initialize React app", "Frontend"),
                Task::assigned("Integrate APIs", "Connect frontend and backend", "Coordinator"),
            ]
        );
        assert_eq!(result.summary, "");
        assert_eq!(result.artifact_directory, r"C:\gen\movie-app");
        assert_eq!(result.server_message.as_deref(), Some("Project generated successfully"));
        assert_eq!(result.generated_at.as_deref(), Some("2025-01-02T03:04:05Z"));
    }

    #[test]
    fn flat_shape_without_directory_is_tolerated() {
        let body = br#"{"summary": "A shop", "tasks": []}"#;
        let result = decode(ResponseShape::Flat, body).unwrap();
        assert_eq!(result.summary, "A shop");
        assert!(result.tasks.is_empty());
        assert_eq!(result.artifact_directory, "");
    }

    #[test]
    fn wrapped_shape_has_string_tasks() {
        let body = br#"{"result": {"summary": "Movie reviews", "tasks": ["Design schema", "Build API"]}}"#;
        let result = decode(ResponseShape::Wrapped, body).unwrap();
        assert_eq!(result.summary, "Movie reviews");
        assert_eq!(
            result.tasks,
            vec![Task::titled("Design schema"), Task::titled("Build API")]
        );
        assert_eq!(result.artifact_directory, "");
    }

    #[test]
    fn missing_or_non_list_tasks_fail() {
        let bodies: [&[u8]; 5] = [
            br#"{"summary": "x", "project_dir": "/a/b"}"#,
            br#"{"summary": "x", "tasks": "do things"}"#,
            br#"{"summary": "x", "tasks": null}"#,
            br#"{"result": {"summary": "x"}}"#,
            b"<html>502</html>",
        ];
        for body in bodies {
            let err = decode(ResponseShape::Flat, body).unwrap_err();
            assert!(matches!(err, ClientError::Decode(_)), "{err:?}");
        }

        let err = decode(ResponseShape::Wrapped, br#"{"result": {"summary": "x", "tasks": {}}}"#)
            .unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[test]
    fn shapes_are_not_interchangeable() {
        let wrapped = br#"{"result": {"summary": "x", "tasks": []}}"#;
        assert!(decode(ResponseShape::Flat, wrapped).is_err());

        let flat = br#"{"summary": "x", "tasks": []}"#;
        assert!(decode(ResponseShape::Wrapped, flat).is_err());
    }

    #[test]
    fn error_detail_extraction() {
        assert_eq!(
            error_detail(br#"{"detail": "brief too short"}"#).as_deref(),
            Some("brief too short")
        );
        assert_eq!(error_detail(br#"{"detail": ""}"#), None);
        assert_eq!(error_detail(br#"{"detail": [{"loc": ["body"]}]}"#), None);
        assert_eq!(error_detail(br#"{"error": "nope"}"#), None);
        assert_eq!(error_detail(b"Internal Server Error"), None);
        assert_eq!(error_detail(b""), None);
    }
}
