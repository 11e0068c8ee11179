//! Alert emitter and the per-user alert inbox.

use planner_core::error::CoreError;
use planner_core::pagination::{
    clamp_limit, clamp_offset, Page, DEFAULT_ALERT_PAGE_SIZE, MAX_PAGE_SIZE,
};
use planner_core::types::DbId;
use planner_db::models::alert::Alert;
use planner_db::repositories::AlertRepo;
use sqlx::PgPool;

use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct AlertService {
    pool: PgPool,
}

impl AlertService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record an alert for `recipient_id`.
    ///
    /// Best-effort: a failed insert is logged and swallowed, the caller's
    /// operation carries on.
    pub async fn notify(&self, recipient_id: DbId, message: &str) {
        match AlertRepo::create(&self.pool, recipient_id, message).await {
            Ok(alert) => {
                tracing::info!(alert_id = alert.id, user_id = recipient_id, "Alert created");
            }
            Err(e) => {
                tracing::warn!(user_id = recipient_id, error = %e, "Failed to create alert");
            }
        }
    }

    /// A page of a user's alerts, newest first.
    pub async fn list(
        &self,
        user_id: DbId,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> AppResult<Page<Alert>> {
        let limit = clamp_limit(limit, DEFAULT_ALERT_PAGE_SIZE, MAX_PAGE_SIZE);
        let offset = clamp_offset(offset);
        let items = AlertRepo::list_for_user(&self.pool, user_id, limit, offset).await?;
        let total = AlertRepo::count_for_user(&self.pool, user_id).await?;
        Ok(Page::new(items, total, limit, offset))
    }

    /// Delete one of `user_id`'s alerts.
    ///
    /// An alert that belongs to someone else is reported as not found.
    pub async fn delete(&self, user_id: DbId, id: DbId) -> AppResult<()> {
        let not_found = || AppError::Core(CoreError::NotFound { entity: "Alert", id });

        let alert = AlertRepo::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(not_found)?;
        if alert.user_id != user_id {
            return Err(not_found());
        }

        if !AlertRepo::delete(&self.pool, id).await? {
            return Err(not_found());
        }
        Ok(())
    }

    /// Clear a user's inbox. Returns how many alerts were removed.
    pub async fn delete_all(&self, user_id: DbId) -> AppResult<u64> {
        let removed = AlertRepo::delete_all_for_user(&self.pool, user_id).await?;
        tracing::info!(user_id, removed, "Alert inbox cleared");
        Ok(removed)
    }
}
