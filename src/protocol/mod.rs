// src/protocol/mod.rs

use crate::resolver::{ArtifactReference, resolve_artifact};

/// Which of the two response layouts the targeted endpoint produces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResponseShape {
    /// `{ summary, tasks: [{ name, description, assigned_to }], project_dir }`
    #[default]
    Flat,
    /// `{ result: { summary, tasks: [string] } }`
    Wrapped,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Task {
    pub name: String,
    pub description: Option<String>,
    pub assigned_to: Option<String>,
}

impl Task {
    /// A wrapped-shape task: only a descriptive line.
    pub fn titled(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: None,
            assigned_to: None,
        }
    }

    pub fn assigned(name: &str, description: &str, assigned_to: &str) -> Self {
        Self {
            name: name.to_string(),
            description: Some(description.to_string()),
            assigned_to: Some(assigned_to.to_string()),
        }
    }
}

/// A decoded, successful response. Only the decoder builds these.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectResult {
    pub summary: String,
    pub tasks: Vec<Task>,
    pub artifact_directory: String,
    pub server_message: Option<String>,
    pub generated_at: Option<String>,
}

impl ProjectResult {
    /// Derived fresh on every call; never cached alongside the result.
    pub fn artifact_reference(&self) -> ArtifactReference {
        resolve_artifact(&self.artifact_directory)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SubmissionState {
    #[default]
    Idle,
    Pending,
    Succeeded(ProjectResult),
    Failed(String),
}

impl SubmissionState {
    pub fn is_pending(&self) -> bool {
        matches!(self, SubmissionState::Pending)
    }

    pub fn label(&self) -> &'static str {
        match self {
            SubmissionState::Idle => "idle",
            SubmissionState::Pending => "pending",
            SubmissionState::Succeeded(_) => "succeeded",
            SubmissionState::Failed(_) => "failed",
        }
    }
}
