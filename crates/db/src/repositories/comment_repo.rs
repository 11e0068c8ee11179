//! Repository for the `comments` table.

use planner_core::comment::{removal_for, CommentRemoval};
use planner_core::types::DbId;
use sqlx::PgPool;

use crate::models::comment::{Comment, CommentLink, CreateComment};

const COLUMNS: &str =
    "id, post_id, user_id, parent_id, content, delete_yn, created_at, updated_at";

/// Provides CRUD operations for comments and replies.
pub struct CommentRepo;

impl CommentRepo {
    /// Insert a comment (or reply) on `post_id` by `user_id`.
    pub async fn create(
        pool: &PgPool,
        post_id: DbId,
        user_id: DbId,
        input: &CreateComment,
    ) -> Result<Comment, sqlx::Error> {
        let query = format!(
            "INSERT INTO comments (post_id, user_id, parent_id, content)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(post_id)
            .bind(user_id)
            .bind(input.parent_id)
            .bind(&input.content)
            .fetch_one(pool)
            .await
    }

    /// Find a comment by ID. Tombstoned comments are still returned.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Comment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM comments WHERE id = $1");
        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Replace a comment's text. Returns `None` if no such comment exists.
    pub async fn update_content(
        pool: &PgPool,
        id: DbId,
        content: &str,
    ) -> Result<Option<Comment>, sqlx::Error> {
        let query = format!(
            "UPDATE comments SET content = $2, updated_at = NOW() WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .bind(content)
            .fetch_optional(pool)
            .await
    }

    /// Number of direct replies, tombstoned ones included.
    pub async fn count_replies(pool: &PgPool, id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM comments WHERE parent_id = $1")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Remove a comment: purge it if it has no replies, otherwise set its
    /// tombstone flag. Returns `None` if the comment does not exist.
    pub async fn remove(pool: &PgPool, id: DbId) -> Result<Option<CommentRemoval>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let locked: Option<DbId> =
            sqlx::query_scalar("SELECT id FROM comments WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        if locked.is_none() {
            return Ok(None);
        }

        let reply_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM comments WHERE parent_id = $1")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;

        let removal = removal_for(reply_count);
        match removal.tombstone_flag() {
            None => {
                sqlx::query("DELETE FROM comments WHERE id = $1")
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;
            }
            Some(flag) => {
                sqlx::query("UPDATE comments SET delete_yn = $2, updated_at = NOW() WHERE id = $1")
                    .bind(id)
                    .bind(flag.as_str())
                    .execute(&mut *tx)
                    .await?;
            }
        }

        tx.commit().await?;
        Ok(Some(removal))
    }

    /// One page of a post's comments, oldest first.
    pub async fn list_by_post(
        pool: &PgPool,
        post_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Comment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM comments \
             WHERE post_id = $1 \
             ORDER BY created_at, id \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(post_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count_by_post(pool: &PgPool, post_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM comments WHERE post_id = $1")
            .bind(post_id)
            .fetch_one(pool)
            .await
    }

    /// Direct replies to any of `parent_ids`, as `(id, parent_id)` pairs for
    /// building the reply index. Oldest first.
    pub async fn reply_links_for_parents(
        pool: &PgPool,
        parent_ids: &[DbId],
    ) -> Result<Vec<CommentLink>, sqlx::Error> {
        if parent_ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, CommentLink>(
            "SELECT id, parent_id FROM comments \
             WHERE parent_id = ANY($1) \
             ORDER BY created_at, id",
        )
        .bind(parent_ids)
        .fetch_all(pool)
        .await
    }
}
