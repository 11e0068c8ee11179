//! Alert (user inbox) model.

use planner_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `alerts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Alert {
    pub id: DbId,
    pub user_id: DbId,
    pub message: String,
    pub created_at: Timestamp,
}
