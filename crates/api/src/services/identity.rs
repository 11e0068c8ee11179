//! Maps the caller's email to a user record.

use planner_core::error::CoreError;
use planner_db::models::user::User;
use planner_db::repositories::UserRepo;
use sqlx::PgPool;

use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct IdentityResolver {
    pool: PgPool,
}

impl IdentityResolver {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Look up a user by email. Absence is not an error here.
    pub async fn find(&self, email: &str) -> AppResult<Option<User>> {
        Ok(UserRepo::find_by_email(&self.pool, email).await?)
    }

    /// Look up a user by email, failing with `NotFound` when unknown.
    pub async fn resolve(&self, email: &str) -> AppResult<User> {
        self.find(email).await?.ok_or_else(|| {
            AppError::Core(CoreError::NotFoundByKey {
                entity: "User",
                key: email.to_string(),
            })
        })
    }
}
