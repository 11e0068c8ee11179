//! Services behind the HTTP handlers.
//!
//! Each service holds its own pool handle and is stored in
//! [`AppState`](crate::state::AppState). Handlers stay thin: extract,
//! call one service method, wrap the result.

pub mod alerts;
pub mod comments;
pub mod identity;
pub mod projects;

pub use alerts::AlertService;
pub use comments::{CommentService, CommentView};
pub use identity::IdentityResolver;
pub use projects::ProjectService;
