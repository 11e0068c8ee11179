//! Task and sub-task models.

use planner_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `tasks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Task {
    pub id: DbId,
    pub project_id: DbId,
    pub description: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `sub_tasks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SubTask {
    pub id: DbId,
    pub task_id: DbId,
    pub content: String,
    pub created_at: Timestamp,
}

/// A task with its checklist, ordered by insertion.
#[derive(Debug, Clone, Serialize)]
pub struct TaskWithSubTasks {
    #[serde(flatten)]
    pub task: Task,
    pub sub_tasks: Vec<SubTask>,
}
