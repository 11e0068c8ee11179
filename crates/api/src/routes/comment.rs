//! Route definitions for comments.

use axum::routing::get;
use axum::Router;

use crate::handlers::comment;
use crate::state::AppState;

/// Routes mounted at `/posts/{post_id}/comments`.
///
/// ```text
/// GET    /        -> list_by_post
/// POST   /        -> create
/// GET    /count   -> count_by_post
/// ```
pub fn post_router() -> Router<AppState> {
    Router::new()
        .route("/", get(comment::list_by_post).post(comment::create))
        .route("/count", get(comment::count_by_post))
}

/// Routes mounted at `/comments`.
///
/// ```text
/// GET    /{id}    -> get_by_id
/// PUT    /{id}    -> update
/// DELETE /{id}    -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/{id}",
        get(comment::get_by_id)
            .put(comment::update)
            .delete(comment::delete),
    )
}
