//! Repository for the `tasks` table and task-tree reconciliation.

use std::collections::{HashMap, HashSet};

use planner_core::reconcile::{ReconcilePlan, ReconcileSummary, TaskDraft, TaskRewrite};
use planner_core::types::DbId;
use sqlx::PgPool;

use crate::models::task::{SubTask, Task, TaskWithSubTasks};
use crate::repositories::{PgTx, SubTaskRepo};

const COLUMNS: &str = "id, project_id, description, created_at, updated_at";

pub struct TaskRepo;

impl TaskRepo {
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1");
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Tasks of a project with their sub-tasks, both in insertion order.
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<TaskWithSubTasks>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE project_id = $1 ORDER BY id");
        let tasks = sqlx::query_as::<_, Task>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await?;

        let ids: Vec<DbId> = tasks.iter().map(|t| t.id).collect();
        let mut by_task: HashMap<DbId, Vec<SubTask>> = HashMap::new();
        for sub in SubTaskRepo::list_for_tasks(pool, &ids).await? {
            by_task.entry(sub.task_id).or_default().push(sub);
        }

        Ok(tasks
            .into_iter()
            .map(|task| {
                let sub_tasks = by_task.remove(&task.id).unwrap_or_default();
                TaskWithSubTasks { task, sub_tasks }
            })
            .collect())
    }

    pub async fn count_for_project(pool: &PgPool, project_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM tasks WHERE project_id = $1")
            .bind(project_id)
            .fetch_one(pool)
            .await
    }

    /// Ids of a project's current tasks, row-locked for the rest of the
    /// transaction.
    pub async fn ids_for_project(
        tx: &mut PgTx<'_>,
        project_id: DbId,
    ) -> Result<HashSet<DbId>, sqlx::Error> {
        let ids: Vec<DbId> =
            sqlx::query_scalar("SELECT id FROM tasks WHERE project_id = $1 FOR UPDATE")
                .bind(project_id)
                .fetch_all(&mut **tx)
                .await?;
        Ok(ids.into_iter().collect())
    }

    /// Insert a task owned by `project_id` together with its sub-tasks.
    pub async fn insert(
        tx: &mut PgTx<'_>,
        project_id: DbId,
        draft: &TaskDraft,
    ) -> Result<TaskWithSubTasks, sqlx::Error> {
        let query = format!(
            "INSERT INTO tasks (project_id, description) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        let task = sqlx::query_as::<_, Task>(&query)
            .bind(project_id)
            .bind(&draft.description)
            .fetch_one(&mut **tx)
            .await?;
        let sub_tasks = SubTaskRepo::insert_all(tx, task.id, &draft.sub_tasks).await?;
        Ok(TaskWithSubTasks { task, sub_tasks })
    }

    /// Replace a task's description and its whole checklist.
    ///
    /// Returns `false` (and writes nothing) if the task no longer exists.
    pub async fn rewrite(tx: &mut PgTx<'_>, rewrite: &TaskRewrite) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE tasks SET description = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(rewrite.task_id)
        .bind(&rewrite.description)
        .execute(&mut **tx)
        .await?;
        if result.rows_affected() == 0 {
            return Ok(false);
        }
        SubTaskRepo::replace_all(tx, rewrite.task_id, &rewrite.sub_tasks).await?;
        Ok(true)
    }

    /// Delete a task; its sub-tasks go with it. Returns `true` if removed.
    pub async fn delete(tx: &mut PgTx<'_>, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&mut **tx)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Apply a reconcile plan: rewrites, then additions, then deletions.
    pub async fn apply_plan(
        tx: &mut PgTx<'_>,
        project_id: DbId,
        plan: &ReconcilePlan,
    ) -> Result<ReconcileSummary, sqlx::Error> {
        let mut summary = ReconcileSummary {
            skipped: plan.skipped.clone(),
            ..ReconcileSummary::default()
        };

        for rewrite in &plan.rewrites {
            if Self::rewrite(tx, rewrite).await? {
                summary.updated.push(rewrite.task_id);
            }
        }

        for draft in &plan.additions {
            let created = Self::insert(tx, project_id, draft).await?;
            summary.added.push(created.task.id);
        }

        for &task_id in &plan.deletions {
            if Self::delete(tx, task_id).await? {
                summary.deleted.push(task_id);
            }
        }

        for skipped in &plan.skipped {
            tracing::debug!(
                project_id,
                idx = %skipped.idx,
                pass = ?skipped.pass,
                "Task reference skipped: not a task of this project"
            );
        }

        Ok(summary)
    }
}
