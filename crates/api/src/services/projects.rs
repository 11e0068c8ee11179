//! Project lifecycle: create with tasks, view, update with task
//! reconciliation, toggle activation, delete, and deadline messages.
//!
//! Read entry points fail with `NotFound` on a missing project. Write entry
//! points report a missing owner or project as
//! [`WriteOutcome::SkippedMissingParent`] and leave the store untouched.

use planner_core::deadline::{Deadline, DEADLINE_UNAVAILABLE};
use planner_core::error::CoreError;
use planner_core::outcome::WriteOutcome;
use planner_core::pagination::{
    clamp_limit, clamp_offset, Page, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
use planner_core::project::validate_title;
use planner_core::reconcile::{check_disjoint, validate_changes, validate_draft};
use planner_core::types::{Date, DbId};
use planner_db::models::project::{
    CreateProject, Project, ProjectDetail, UpdateProject, UpdatedProject,
};
use planner_db::repositories::ProjectRepo;
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::services::identity::IdentityResolver;

pub struct ProjectService {
    pool: PgPool,
    identity: IdentityResolver,
}

impl ProjectService {
    pub fn new(pool: PgPool, identity: IdentityResolver) -> Self {
        Self { pool, identity }
    }

    /// Create a project with its whole task tree in one transaction.
    ///
    /// Skipped when `owner_email` does not resolve to a user, before the
    /// payload is validated.
    pub async fn create_project_planner(
        &self,
        owner_email: &str,
        input: &CreateProject,
    ) -> AppResult<WriteOutcome<ProjectDetail>> {
        let Some(owner) = self.identity.find(owner_email).await? else {
            tracing::debug!(email = owner_email, "Owner not found, project not created");
            return Ok(WriteOutcome::skipped("User", owner_email));
        };

        validate_title(&input.title)?;
        input.tasks.iter().try_for_each(validate_draft)?;

        let detail = ProjectRepo::create_with_tasks(&self.pool, owner.id, input).await?;
        tracing::info!(
            project_id = detail.project.id,
            user_id = owner.id,
            task_count = detail.tasks.len(),
            "Project planner created",
        );
        Ok(WriteOutcome::Applied(detail))
    }

    /// A page of the owner's projects.
    pub async fn view_projects(
        &self,
        owner_email: &str,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> AppResult<Page<Project>> {
        let owner = self.identity.resolve(owner_email).await?;
        let limit = clamp_limit(limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);
        let offset = clamp_offset(offset);
        let items = ProjectRepo::list_by_owner(&self.pool, owner.id, limit, offset).await?;
        let total = ProjectRepo::count_by_owner(&self.pool, owner.id).await?;
        Ok(Page::new(items, total, limit, offset))
    }

    /// One project with its tasks and sub-tasks.
    pub async fn view_project(&self, id: DbId) -> AppResult<ProjectDetail> {
        ProjectRepo::find_detail(&self.pool, id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Project",
                id,
            }))
    }

    pub async fn count_projects(&self, owner_email: &str) -> AppResult<i64> {
        let owner = self.identity.resolve(owner_email).await?;
        Ok(ProjectRepo::count_by_owner(&self.pool, owner.id).await?)
    }

    /// Replace the project's fields and reconcile its tasks.
    ///
    /// A missing project is skipped before the payload is looked at. The
    /// payload is rejected before any write when an id is listed for both
    /// update and delete. Task ids that are not among the project's current
    /// tasks are skipped.
    pub async fn update_project(
        &self,
        id: DbId,
        input: &UpdateProject,
    ) -> AppResult<WriteOutcome<UpdatedProject>> {
        if ProjectRepo::find_by_id(&self.pool, id).await?.is_none() {
            tracing::debug!(project_id = id, "Project not found, update skipped");
            return Ok(WriteOutcome::skipped("Project", id));
        }

        validate_title(&input.title)?;
        check_disjoint(&input.changes)?;
        validate_changes(&input.changes)?;

        match ProjectRepo::update_with_tasks(&self.pool, id, input).await? {
            Some(updated) => {
                tracing::info!(
                    project_id = id,
                    updated = updated.reconciled.updated.len(),
                    added = updated.reconciled.added.len(),
                    deleted = updated.reconciled.deleted.len(),
                    skipped = updated.reconciled.skipped.len(),
                    "Project updated",
                );
                Ok(WriteOutcome::Applied(updated))
            }
            // Deleted between the check and the locked update.
            None => {
                tracing::debug!(project_id = id, "Project gone, update skipped");
                Ok(WriteOutcome::skipped("Project", id))
            }
        }
    }

    /// Delete a project and, by cascade, its tasks and sub-tasks.
    pub async fn delete_project(&self, id: DbId) -> AppResult<WriteOutcome<()>> {
        if ProjectRepo::delete(&self.pool, id).await? {
            tracing::info!(project_id = id, "Project deleted");
            Ok(WriteOutcome::Applied(()))
        } else {
            tracing::debug!(project_id = id, "Project not found, delete skipped");
            Ok(WriteOutcome::skipped("Project", id))
        }
    }

    /// Flip the activation flag: `"N"` becomes `"Y"`, anything else `"N"`.
    pub async fn active_project(&self, id: DbId) -> AppResult<WriteOutcome<Project>> {
        match ProjectRepo::toggle_active(&self.pool, id).await? {
            Some(project) => {
                tracing::info!(
                    project_id = id,
                    active = ?project.active(),
                    "Project activation toggled",
                );
                Ok(WriteOutcome::Applied(project))
            }
            None => {
                tracing::debug!(project_id = id, "Project not found, activation skipped");
                Ok(WriteOutcome::skipped("Project", id))
            }
        }
    }

    /// Human-readable distance from `today` to the project's end date.
    ///
    /// A missing project yields [`DEADLINE_UNAVAILABLE`] rather than an error.
    pub async fn count_deadline(&self, id: DbId, today: Date) -> AppResult<String> {
        let message = match ProjectRepo::find_by_id(&self.pool, id).await? {
            Some(project) => Deadline::between(today, project.end_date).message(),
            None => DEADLINE_UNAVAILABLE.to_string(),
        };
        Ok(message)
    }
}
