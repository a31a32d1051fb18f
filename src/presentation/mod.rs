// src/presentation/mod.rs

use crate::controller::SubmissionController;
use crate::protocol::{ProjectResult, SubmissionState, Task};
use crate::resolver::ArtifactReference;
use colored::Colorize;
use std::fmt;

pub const SUCCESS_BANNER: &str = "Project generated successfully!";
pub const ERROR_PREFIX: &str = "Error generating project: ";
pub const SUBMIT_LABEL: &str = "Generate Project";
pub const BUSY_LABEL: &str = "Generating...";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Banner {
    Success,
    /// Carries the failure message exactly as the controller stored it.
    Error(String),
}

/// Everything a front-end needs to draw one frame. Built fresh from the
/// controller; holds no references back into it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct View {
    pub busy: bool,
    pub submit_enabled: bool,
    pub submit_label: &'static str,
    pub notice: Option<String>,
    pub banner: Option<Banner>,
    pub summary: Option<String>,
    pub server_message: Option<String>,
    pub project_dir: Option<String>,
    pub generated_at: Option<String>,
    pub task_rows: Vec<String>,
    pub artifact: Option<ArtifactReference>,
}

pub fn render(controller: &SubmissionController) -> View {
    project(controller.state(), controller.notice())
}

/// Pure mapping from state to view.
pub fn project(state: &SubmissionState, notice: Option<&str>) -> View {
    let busy = state.is_pending();
    let mut view = View {
        busy,
        submit_enabled: !busy,
        submit_label: if busy { BUSY_LABEL } else { SUBMIT_LABEL },
        notice: notice.map(str::to_string),
        ..View::default()
    };

    match state {
        SubmissionState::Idle | SubmissionState::Pending => {}
        SubmissionState::Failed(message) => {
            view.banner = Some(Banner::Error(message.clone()));
        }
        SubmissionState::Succeeded(result) => {
            view.banner = Some(Banner::Success);
            fill_result(&mut view, result);
        }
    }

    view
}

fn fill_result(view: &mut View, result: &ProjectResult) {
    view.summary = non_empty(&result.summary);
    view.server_message = result
        .server_message
        .as_deref()
        .and_then(non_empty);
    view.project_dir = non_empty(&result.artifact_directory);
    view.generated_at = result.generated_at.clone();
    view.task_rows = result.tasks.iter().map(task_row).collect();

    let reference = result.artifact_reference();
    view.artifact = (!reference.is_empty()).then_some(reference);
}

/// `name - description (assignee)`, dropping whichever parts are absent.
pub fn task_row(task: &Task) -> String {
    let mut row = task.name.clone();
    if let Some(description) = task.description.as_deref().filter(|d| !d.is_empty()) {
        row.push_str(" - ");
        row.push_str(description);
    }
    if let Some(assignee) = task.assigned_to.as_deref().filter(|a| !a.is_empty()) {
        row.push_str(&format!(" ({assignee})"));
    }
    row
}

fn non_empty(text: &str) -> Option<String> {
    (!text.is_empty()).then(|| text.to_string())
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(notice) = &self.notice {
            writeln!(f, "{}", notice.yellow())?;
        }
        if self.busy {
            writeln!(f, "{}", self.submit_label.dimmed())?;
        }
        match &self.banner {
            Some(Banner::Success) => writeln!(f, "{}", SUCCESS_BANNER.green().bold())?,
            Some(Banner::Error(message)) => {
                writeln!(f, "{}", format!("{ERROR_PREFIX}{message}").red())?
            }
            None => {}
        }
        if let Some(message) = &self.server_message {
            writeln!(f, "{}", message.dimmed())?;
        }
        if let Some(summary) = &self.summary {
            writeln!(f, "\n{}\n{summary}", "Project Summary".bold())?;
        }
        if let Some(dir) = &self.project_dir {
            writeln!(f, "\n{} {}", "Project Folder:".bold(), dir.cyan())?;
        }
        if let Some(generated_at) = &self.generated_at {
            writeln!(f, "{} {generated_at}", "Generated at:".dimmed())?;
        }
        if !self.task_rows.is_empty() {
            writeln!(f, "\n{}", "Tasks:".bold())?;
            for (i, row) in self.task_rows.iter().enumerate() {
                writeln!(f, "  {}. {row}", i + 1)?;
            }
        }
        if let Some(reference) = &self.artifact {
            writeln!(
                f,
                "\n{} {}",
                "Download ZIP:".bold(),
                format!(":download ({reference}.zip)").green()
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn result(dir: &str, tasks: Vec<Task>) -> ProjectResult {
        ProjectResult {
            summary: "Movie reviews with ratings".into(),
            tasks,
            artifact_directory: dir.into(),
            server_message: None,
            generated_at: None,
        }
    }

    #[test]
    fn idle_is_neutral() {
        let view = project(&SubmissionState::Idle, None);
        assert!(view.submit_enabled);
        assert!(!view.busy);
        assert_eq!(view.banner, None);
        assert!(view.task_rows.is_empty());
        assert_eq!(view.submit_label, SUBMIT_LABEL);
    }

    #[test]
    fn pending_disables_submit() {
        let view = project(&SubmissionState::Pending, None);
        assert!(view.busy);
        assert!(!view.submit_enabled);
        assert_eq!(view.submit_label, BUSY_LABEL);
    }

    #[test]
    fn failure_carries_message_verbatim() {
        let view = project(&SubmissionState::Failed("brief too short".into()), None);
        assert_eq!(view.banner, Some(Banner::Error("brief too short".into())));
        assert!(view.submit_enabled);
        assert!(view.to_string().contains("Error generating project: brief too short"));
    }

    #[test]
    fn success_lists_tasks_in_order_with_artifact() {
        let tasks = vec![
            Task::assigned("Setup Backend", "Initialize FastAPI backend", "Backend"),
            Task::titled("Write docs"),
        ];
        let view = project(
            &SubmissionState::Succeeded(result(r"C:\projects\movie-app", tasks)),
            None,
        );

        assert_eq!(view.banner, Some(Banner::Success));
        assert_eq!(
            view.task_rows,
            vec![
                "Setup Backend - Initialize FastAPI backend (Backend)".to_string(),
                "Write docs".to_string(),
            ]
        );
        assert_eq!(view.artifact.as_ref().map(|r| r.as_str()), Some("movie-app"));
        assert_eq!(view.summary.as_deref(), Some("Movie reviews with ratings"));
        assert!(view.submit_enabled);
    }

    #[test]
    fn no_directory_means_no_download() {
        let view = project(&SubmissionState::Succeeded(result("", vec![])), None);
        assert_eq!(view.artifact, None);
        assert_eq!(view.project_dir, None);
        assert!(!view.to_string().contains("Download ZIP"));
    }

    #[test]
    fn server_message_and_timestamp_are_rendered() {
        let mut generated = result("/srv/out/blog", vec![]);
        generated.server_message = Some("Scaffold written to disk".into());
        generated.generated_at = Some("2025-03-04T05:06:07Z".into());

        let view = project(&SubmissionState::Succeeded(generated), None);
        assert_eq!(view.server_message.as_deref(), Some("Scaffold written to disk"));

        let text = view.to_string();
        assert!(text.contains("Scaffold written to disk"));
        assert!(text.contains("2025-03-04T05:06:07Z"));
    }

    #[test]
    fn notice_is_shown_alongside_state() {
        let view = project(&SubmissionState::Idle, Some("Please enter a project brief!"));
        assert_eq!(view.notice.as_deref(), Some("Please enter a project brief!"));
        assert!(view.to_string().contains("Please enter a project brief!"));
    }
}
