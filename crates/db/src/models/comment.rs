//! Comment entity model and DTOs.

use planner_core::flag::FLAG_YES;
use planner_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `comments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Comment {
    pub id: DbId,
    pub post_id: DbId,
    pub user_id: DbId,
    /// Set when this comment is a reply.
    pub parent_id: Option<DbId>,
    pub content: String,
    /// Tombstone flag, `"Y"` once deleted while replies exist.
    pub delete_yn: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Comment {
    pub fn is_tombstoned(&self) -> bool {
        self.delete_yn == FLAG_YES
    }
}

/// `(id, parent_id)` pair used to build a post's reply index.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct CommentLink {
    pub id: DbId,
    pub parent_id: Option<DbId>,
}

/// DTO for posting a comment (or a reply when `parent_id` is set).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateComment {
    pub content: String,
    pub parent_id: Option<DbId>,
}

/// DTO for editing a comment's text.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateComment {
    pub content: String,
}
