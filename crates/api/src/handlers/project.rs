//! Handlers for the `/projects` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use planner_core::types::DbId;
use planner_db::models::project::{CreateProject, UpdateProject};

use crate::error::AppResult;
use crate::middleware::principal::Principal;
use crate::query::{DeadlineParams, PaginationParams};
use crate::response::{settle, DataResponse};
use crate::state::AppState;

/// GET /api/v1/projects
pub async fn list(
    principal: Principal,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let page = state
        .projects
        .view_projects(&principal.email, params.limit, params.offset)
        .await?;
    Ok(Json(DataResponse { data: page }))
}

/// GET /api/v1/projects/count
pub async fn count(
    principal: Principal,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let count = state.projects.count_projects(&principal.email).await?;
    Ok(Json(DataResponse { data: count }))
}

/// POST /api/v1/projects
///
/// 201 with the created tree, or 204 when the caller has no user record.
pub async fn create(
    principal: Principal,
    State(state): State<AppState>,
    Json(input): Json<CreateProject>,
) -> AppResult<Response> {
    let outcome = state
        .projects
        .create_project_planner(&principal.email, &input)
        .await?;
    Ok(match settle(outcome, state.config.strict_missing_targets)? {
        Some(detail) => (StatusCode::CREATED, Json(DataResponse { data: detail })).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    })
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    _principal: Principal,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let detail = state.projects.view_project(id).await?;
    Ok(Json(DataResponse { data: detail }))
}

/// PUT /api/v1/projects/{id}
pub async fn update(
    _principal: Principal,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProject>,
) -> AppResult<Response> {
    let outcome = state.projects.update_project(id, &input).await?;
    Ok(match settle(outcome, state.config.strict_missing_targets)? {
        Some(updated) => Json(DataResponse { data: updated }).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    })
}

/// DELETE /api/v1/projects/{id}
///
/// Deleting a project that is already gone is not an error.
pub async fn delete(
    _principal: Principal,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let outcome = state.projects.delete_project(id).await?;
    settle(outcome, state.config.strict_missing_targets)?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/projects/{id}/activation
pub async fn toggle_activation(
    _principal: Principal,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Response> {
    let outcome = state.projects.active_project(id).await?;
    Ok(match settle(outcome, state.config.strict_missing_targets)? {
        Some(project) => Json(DataResponse { data: project }).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    })
}

/// GET /api/v1/projects/{id}/deadline
pub async fn deadline(
    _principal: Principal,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<DeadlineParams>,
) -> AppResult<impl IntoResponse> {
    let today = params
        .as_of
        .unwrap_or_else(|| chrono::Utc::now().date_naive());
    let message = state.projects.count_deadline(id, today).await?;
    Ok(Json(DataResponse { data: message }))
}
