//! Repository for the `projects` table.

use planner_core::project::{next_active_flag, DEFAULT_ACTIVE};
use planner_core::reconcile;
use planner_core::types::DbId;
use sqlx::PgPool;

use crate::models::project::{
    CreateProject, Project, ProjectDetail, UpdateProject, UpdatedProject,
};
use crate::repositories::TaskRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, title, description, goal, start_date, end_date, \
                       active_yn, created_at, updated_at";

/// Provides CRUD operations for projects and their task trees.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a project owned by `owner_id` with its whole initial task tree
    /// in one transaction.
    pub async fn create_with_tasks(
        pool: &PgPool,
        owner_id: DbId,
        input: &CreateProject,
    ) -> Result<ProjectDetail, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO projects (user_id, title, description, goal, start_date, end_date, active_yn)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        let project = sqlx::query_as::<_, Project>(&query)
            .bind(owner_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.goal)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(DEFAULT_ACTIVE.as_str())
            .fetch_one(&mut *tx)
            .await?;

        let mut tasks = Vec::with_capacity(input.tasks.len());
        for draft in &input.tasks {
            tasks.push(TaskRepo::insert(&mut tx, project.id, draft).await?);
        }

        tx.commit().await?;
        Ok(ProjectDetail { project, tasks })
    }

    /// Find a project by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a project with its tasks and sub-tasks.
    pub async fn find_detail(pool: &PgPool, id: DbId) -> Result<Option<ProjectDetail>, sqlx::Error> {
        let Some(project) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let tasks = TaskRepo::list_for_project(pool, id).await?;
        Ok(Some(ProjectDetail { project, tasks }))
    }

    /// One page of a user's projects, in id order.
    pub async fn list_by_owner(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects WHERE user_id = $1 ORDER BY id LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count_by_owner(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM projects WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// Replace a project's fields and reconcile its tasks in one transaction.
    ///
    /// The caller is expected to have run [`reconcile::check_disjoint`] on
    /// `input.changes`. Returns `None` (nothing written) if the project does
    /// not exist.
    pub async fn update_with_tasks(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<UpdatedProject>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE projects SET
                title = $2,
                description = $3,
                goal = $4,
                start_date = $5,
                end_date = $6,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let project = sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.goal)
            .bind(input.start_date)
            .bind(input.end_date)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(project) = project else {
            return Ok(None);
        };

        let existing = TaskRepo::ids_for_project(&mut tx, id).await?;
        let plan = reconcile::plan(&existing, &input.changes);
        let reconciled = TaskRepo::apply_plan(&mut tx, id, &plan).await?;

        tx.commit().await?;
        Ok(Some(UpdatedProject {
            project,
            reconciled,
        }))
    }

    /// Flip the activation flag: `"N"` becomes `"Y"`, anything else `"N"`.
    ///
    /// Returns the updated row, or `None` if the project does not exist.
    pub async fn toggle_active(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let current: Option<String> =
            sqlx::query_scalar("SELECT active_yn FROM projects WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(current) = current else {
            return Ok(None);
        };

        let next = next_active_flag(&current);
        let query = format!(
            "UPDATE projects SET active_yn = $2, updated_at = NOW() WHERE id = $1 RETURNING {COLUMNS}"
        );
        let project = sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(next.as_str())
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(project))
    }

    /// Delete a project; tasks and sub-tasks cascade. Returns `true` if a row
    /// was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
