//! Route definitions for the caller's alert inbox.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::alert;
use crate::state::AppState;

/// Routes mounted at `/user/alerts`.
///
/// ```text
/// GET    /        -> list
/// DELETE /        -> delete_all
/// DELETE /{id}    -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(alert::list).delete(alert::delete_all))
        .route("/{id}", delete(alert::delete))
}
