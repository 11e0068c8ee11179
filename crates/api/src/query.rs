//! Shared query parameter types for API handlers.

use planner_core::types::Date;
use serde::Deserialize;

/// Generic pagination parameters (`?limit=&offset=`).
///
/// Values are clamped in the service layer via `clamp_limit` / `clamp_offset`.
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// `?as_of=YYYY-MM-DD` for the deadline endpoint; defaults to today (UTC).
#[derive(Debug, Default, Deserialize)]
pub struct DeadlineParams {
    pub as_of: Option<Date>,
}
