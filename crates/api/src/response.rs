//! Shared response envelope types for API handlers.
//!
//! All API responses use a `{ "data": ... }` envelope. Use [`DataResponse`]
//! instead of ad-hoc `serde_json::json!({ "data": ... })`.

use planner_core::outcome::WriteOutcome;
use serde::Serialize;

use crate::error::AppResult;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// Settle a write outcome at the HTTP boundary.
///
/// `Some` when the write went through. A skipped write is `None` (answered
/// with 204 by the caller), or a 404 when `strict` is set.
pub fn settle<T>(outcome: WriteOutcome<T>, strict: bool) -> AppResult<Option<T>> {
    match outcome {
        WriteOutcome::Applied(value) => Ok(Some(value)),
        skipped @ WriteOutcome::SkippedMissingParent { .. } => {
            if strict {
                skipped.into_strict()?;
            }
            Ok(None)
        }
    }
}
