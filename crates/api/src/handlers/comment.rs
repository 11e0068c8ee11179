//! Handlers for comments on posts.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use planner_core::types::DbId;
use planner_db::models::comment::{CreateComment, UpdateComment};

use crate::error::AppResult;
use crate::middleware::principal::Principal;
use crate::query::PaginationParams;
use crate::response::{settle, DataResponse};
use crate::state::AppState;

/// GET /api/v1/posts/{post_id}/comments
pub async fn list_by_post(
    _principal: Principal,
    State(state): State<AppState>,
    Path(post_id): Path<DbId>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let page = state
        .comments
        .select_comments(post_id, params.limit, params.offset)
        .await?;
    Ok(Json(DataResponse { data: page }))
}

/// GET /api/v1/posts/{post_id}/comments/count
pub async fn count_by_post(
    _principal: Principal,
    State(state): State<AppState>,
    Path(post_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let count = state.comments.count_comments(post_id).await?;
    Ok(Json(DataResponse { data: count }))
}

/// POST /api/v1/posts/{post_id}/comments
///
/// 201 with the new comment, or 204 when the post (or reply target) is gone.
pub async fn create(
    principal: Principal,
    State(state): State<AppState>,
    Path(post_id): Path<DbId>,
    Json(input): Json<CreateComment>,
) -> AppResult<Response> {
    let outcome = state
        .comments
        .create_comment(post_id, &principal.email, &input)
        .await?;
    Ok(match settle(outcome, state.config.strict_missing_targets)? {
        Some(comment) => {
            (StatusCode::CREATED, Json(DataResponse { data: comment })).into_response()
        }
        None => StatusCode::NO_CONTENT.into_response(),
    })
}

/// GET /api/v1/comments/{id}
pub async fn get_by_id(
    _principal: Principal,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let comment = state.comments.select_comment(id).await?;
    Ok(Json(DataResponse { data: comment }))
}

/// PUT /api/v1/comments/{id}
pub async fn update(
    _principal: Principal,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateComment>,
) -> AppResult<impl IntoResponse> {
    let comment = state.comments.update_comment(id, &input.content).await?;
    Ok(Json(DataResponse { data: comment }))
}

/// DELETE /api/v1/comments/{id}
///
/// Responds with how the comment was removed (`purge` or `tombstone`).
pub async fn delete(
    _principal: Principal,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let removal = state.comments.delete_comment(id).await?;
    Ok(Json(DataResponse { data: removal }))
}
