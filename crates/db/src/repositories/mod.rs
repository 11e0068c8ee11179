//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Methods that take part in a
//! larger write accept the open transaction instead, and the multi-table
//! writes (`create_with_tasks`, `update_with_tasks`, comment removal) open
//! and commit their own.

pub mod alert_repo;
pub mod comment_repo;
pub mod post_repo;
pub mod project_repo;
pub mod sub_task_repo;
pub mod task_repo;
pub mod user_repo;

pub use alert_repo::AlertRepo;
pub use comment_repo::CommentRepo;
pub use post_repo::PostRepo;
pub use project_repo::ProjectRepo;
pub use sub_task_repo::SubTaskRepo;
pub use task_repo::TaskRepo;
pub use user_repo::UserRepo;

/// Transaction handle passed between repositories within one write.
pub type PgTx<'c> = sqlx::Transaction<'c, sqlx::Postgres>;
