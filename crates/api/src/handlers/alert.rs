//! Handlers for the caller's alert inbox.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use planner_core::types::DbId;

use crate::error::AppResult;
use crate::middleware::principal::Principal;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/user/alerts
pub async fn list(
    principal: Principal,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let user = state.identity.resolve(&principal.email).await?;
    let page = state.alerts.list(user.id, params.limit, params.offset).await?;
    Ok(Json(DataResponse { data: page }))
}

/// DELETE /api/v1/user/alerts/{id}
pub async fn delete(
    principal: Principal,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let user = state.identity.resolve(&principal.email).await?;
    state.alerts.delete(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/user/alerts
///
/// An unknown caller has nothing to clear; that is not an error.
pub async fn delete_all(
    principal: Principal,
    State(state): State<AppState>,
) -> AppResult<StatusCode> {
    if let Some(user) = state.identity.find(&principal.email).await? {
        state.alerts.delete_all(user.id).await?;
    }
    Ok(StatusCode::NO_CONTENT)
}
