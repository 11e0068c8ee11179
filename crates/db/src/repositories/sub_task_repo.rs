//! Repository for the `sub_tasks` table.
//!
//! Sub-tasks are never edited in place: a task's checklist is written once
//! on insert and afterwards only ever replaced as a whole.

use planner_core::types::DbId;
use sqlx::PgPool;

use crate::models::task::SubTask;
use crate::repositories::PgTx;

const COLUMNS: &str = "id, task_id, content, created_at";

pub struct SubTaskRepo;

impl SubTaskRepo {
    /// All sub-tasks of the given tasks, in insertion order.
    pub async fn list_for_tasks(
        pool: &PgPool,
        task_ids: &[DbId],
    ) -> Result<Vec<SubTask>, sqlx::Error> {
        if task_ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "SELECT {COLUMNS} FROM sub_tasks WHERE task_id = ANY($1) ORDER BY task_id, id"
        );
        sqlx::query_as::<_, SubTask>(&query)
            .bind(task_ids)
            .fetch_all(pool)
            .await
    }

    pub async fn count_for_task(pool: &PgPool, task_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM sub_tasks WHERE task_id = $1")
            .bind(task_id)
            .fetch_one(pool)
            .await
    }

    /// Insert one sub-task row per line, in order.
    pub async fn insert_all(
        tx: &mut PgTx<'_>,
        task_id: DbId,
        lines: &[String],
    ) -> Result<Vec<SubTask>, sqlx::Error> {
        let query = format!(
            "INSERT INTO sub_tasks (task_id, content) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        let mut rows = Vec::with_capacity(lines.len());
        for line in lines {
            let row = sqlx::query_as::<_, SubTask>(&query)
                .bind(task_id)
                .bind(line)
                .fetch_one(&mut **tx)
                .await?;
            rows.push(row);
        }
        Ok(rows)
    }

    /// Replace a task's whole checklist: delete every existing row, then
    /// insert `lines`. The new rows always get fresh ids.
    pub async fn replace_all(
        tx: &mut PgTx<'_>,
        task_id: DbId,
        lines: &[String],
    ) -> Result<Vec<SubTask>, sqlx::Error> {
        sqlx::query("DELETE FROM sub_tasks WHERE task_id = $1")
            .bind(task_id)
            .execute(&mut **tx)
            .await?;
        Self::insert_all(tx, task_id, lines).await
    }
}
