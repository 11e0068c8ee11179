//! Comment lifecycle: post (with an alert to the post's author), edit,
//! remove, and the per-post thread view.

use planner_core::comment::{
    comment_alert_message, validate_comment_text, CommentRemoval, ReplyIndex,
};
use planner_core::error::CoreError;
use planner_core::outcome::WriteOutcome;
use planner_core::pagination::{
    clamp_limit, clamp_offset, Page, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
use planner_core::types::DbId;
use planner_db::models::comment::{Comment, CreateComment};
use planner_db::repositories::{CommentRepo, PostRepo};
use serde::Serialize;
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::services::alerts::AlertService;
use crate::services::identity::IdentityResolver;

/// A comment as shown in a thread, with the ids of its direct replies.
#[derive(Debug, Clone, Serialize)]
pub struct CommentView {
    #[serde(flatten)]
    pub comment: Comment,
    pub replies: Vec<DbId>,
}

pub struct CommentService {
    pool: PgPool,
    identity: IdentityResolver,
    alerts: AlertService,
}

impl CommentService {
    pub fn new(pool: PgPool, identity: IdentityResolver, alerts: AlertService) -> Self {
        Self {
            pool,
            identity,
            alerts,
        }
    }

    pub async fn select_comment(&self, id: DbId) -> AppResult<Comment> {
        CommentRepo::find_by_id(&self.pool, id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Comment",
                id,
            }))
    }

    /// Post a comment (or a reply) on `post_id`.
    ///
    /// Skipped when the post is missing, or when the reply target is missing
    /// or sits on another post; both checks come before text validation.
    /// The post's author is alerted before the comment row is written.
    pub async fn create_comment(
        &self,
        post_id: DbId,
        author_email: &str,
        input: &CreateComment,
    ) -> AppResult<WriteOutcome<Comment>> {
        let Some(post) = PostRepo::find_by_id(&self.pool, post_id).await? else {
            tracing::debug!(post_id, "Post not found, comment not created");
            return Ok(WriteOutcome::skipped("Post", post_id));
        };

        if let Some(parent_id) = input.parent_id {
            let parent = CommentRepo::find_by_id(&self.pool, parent_id).await?;
            if !matches!(parent, Some(ref p) if p.post_id == post_id) {
                tracing::debug!(
                    post_id,
                    parent_id,
                    "Reply target not on post, comment not created",
                );
                return Ok(WriteOutcome::skipped("Comment", parent_id));
            }
        }

        validate_comment_text(&input.content)?;
        let author = self.identity.resolve(author_email).await?;

        self.alerts
            .notify(post.user_id, &comment_alert_message(&post.title))
            .await;

        let comment = CommentRepo::create(&self.pool, post_id, author.id, input).await?;
        tracing::info!(
            comment_id = comment.id,
            post_id,
            user_id = author.id,
            "Comment created",
        );
        Ok(WriteOutcome::Applied(comment))
    }

    pub async fn update_comment(&self, id: DbId, content: &str) -> AppResult<Comment> {
        validate_comment_text(content)?;
        CommentRepo::update_content(&self.pool, id, content)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Comment",
                id,
            }))
    }

    /// Purge the comment if nothing replies to it, otherwise tombstone it.
    pub async fn delete_comment(&self, id: DbId) -> AppResult<CommentRemoval> {
        let removal = CommentRepo::remove(&self.pool, id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Comment",
                id,
            }))?;
        tracing::info!(comment_id = id, ?removal, "Comment removed");
        Ok(removal)
    }

    /// A page of a post's comments, oldest first, each with its reply ids.
    pub async fn select_comments(
        &self,
        post_id: DbId,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> AppResult<Page<CommentView>> {
        let limit = clamp_limit(limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);
        let offset = clamp_offset(offset);
        let items = CommentRepo::list_by_post(&self.pool, post_id, limit, offset).await?;
        let total = CommentRepo::count_by_post(&self.pool, post_id).await?;

        let page_ids: Vec<DbId> = items.iter().map(|c| c.id).collect();
        let links = CommentRepo::reply_links_for_parents(&self.pool, &page_ids).await?;
        let index = ReplyIndex::from_links(links.iter().map(|l| (l.id, l.parent_id)));

        Ok(Page::new(items, total, limit, offset).map(|comment| CommentView {
            replies: index.replies_of(comment.id).to_vec(),
            comment,
        }))
    }

    pub async fn count_comments(&self, post_id: DbId) -> AppResult<i64> {
        Ok(CommentRepo::count_by_post(&self.pool, post_id).await?)
    }
}
