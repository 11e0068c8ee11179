//! Project entity model and DTOs.

use planner_core::flag::YesNo;
use planner_core::reconcile::{ReconcileSummary, TaskChanges, TaskDraft};
use planner_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::task::TaskWithSubTasks;

/// A project row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    /// Owning user.
    pub user_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub goal: Option<String>,
    pub start_date: Date,
    pub end_date: Date,
    /// `"Y"` or `"N"`.
    pub active_yn: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Project {
    /// Typed view of `active_yn`. `None` if the column holds anything else.
    pub fn active(&self) -> Option<YesNo> {
        YesNo::parse(&self.active_yn)
    }
}

/// A project together with its tasks and their sub-tasks.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    pub tasks: Vec<TaskWithSubTasks>,
}

/// DTO for creating a project with its initial task tree.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProject {
    pub title: String,
    pub description: Option<String>,
    pub goal: Option<String>,
    pub start_date: Date,
    pub end_date: Date,
    #[serde(default)]
    pub tasks: Vec<TaskDraft>,
}

/// DTO for updating a project.
///
/// The scalar fields replace the stored values outright; the task lists are
/// reconciled against the project's current tasks.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProject {
    pub title: String,
    pub description: Option<String>,
    pub goal: Option<String>,
    pub start_date: Date,
    pub end_date: Date,
    #[serde(flatten)]
    pub changes: TaskChanges,
}

/// A project after an update, with what reconciliation did to its tasks.
#[derive(Debug, Clone, Serialize)]
pub struct UpdatedProject {
    #[serde(flatten)]
    pub project: Project,
    pub reconciled: ReconcileSummary,
}
