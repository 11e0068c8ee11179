pub mod alert;
pub mod comment;
pub mod health;
pub mod project;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /projects                               list, create
/// /projects/count                         count
/// /projects/{id}                          get, update, delete
/// /projects/{id}/activation               toggle active flag
/// /projects/{id}/deadline                 D-day message
///
/// /posts/{post_id}/comments               list, create
/// /posts/{post_id}/comments/count         count
/// /comments/{id}                          get, update, delete
///
/// /user/alerts                            list, clear
/// /user/alerts/{id}                       delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/projects", project::router())
        .nest("/posts/{post_id}/comments", comment::post_router())
        .nest("/comments", comment::router())
        .nest("/user/alerts", alert::router())
}
