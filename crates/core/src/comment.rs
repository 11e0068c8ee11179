//! Comment rules: removal policy, alert text, and the reply index.
//!
//! A comment that has replies is never removed from storage; it is
//! tombstoned (`delete_yn = 'Y'`) so every reply keeps resolving to its
//! parent. A comment without replies is purged.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::CoreError;
use crate::flag::YesNo;
use crate::types::DbId;

/// Maximum length of comment text in characters.
pub const MAX_COMMENT_LENGTH: usize = 2_000;

/// How a comment is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentRemoval {
    /// Row deleted.
    Purge,
    /// Row kept, tombstone flag set.
    Tombstone,
}

impl CommentRemoval {
    /// Value written to the tombstone column, if the row survives.
    pub fn tombstone_flag(self) -> Option<YesNo> {
        match self {
            Self::Purge => None,
            Self::Tombstone => Some(YesNo::Yes),
        }
    }
}

/// Decide how to remove a comment with `reply_count` direct replies.
///
/// Tombstoned replies still count, so once a comment has any reply it can
/// only ever be tombstoned.
pub fn removal_for(reply_count: i64) -> CommentRemoval {
    if reply_count == 0 {
        CommentRemoval::Purge
    } else {
        CommentRemoval::Tombstone
    }
}

/// Alert text sent to a post's author when someone comments on it.
pub fn comment_alert_message(post_title: &str) -> String {
    format!("Post '{post_title}' received a comment")
}

/// Validate comment text: non-blank and within the length limit.
pub fn validate_comment_text(text: &str) -> Result<(), CoreError> {
    if text.trim().is_empty() {
        return Err(CoreError::Validation(
            "Comment cannot be empty".to_string(),
        ));
    }
    if text.chars().count() > MAX_COMMENT_LENGTH {
        return Err(CoreError::Validation(format!(
            "Comment exceeds maximum length of {MAX_COMMENT_LENGTH} characters"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Reply index
// ---------------------------------------------------------------------------

/// Parent id → direct reply ids, in the order the links were supplied.
///
/// Built from flat `(id, parent_id)` rows so the thread never needs
/// parent/child pointers between comment values.
#[derive(Debug, Clone, Default)]
pub struct ReplyIndex {
    children: HashMap<DbId, Vec<DbId>>,
}

impl ReplyIndex {
    pub fn from_links(links: impl IntoIterator<Item = (DbId, Option<DbId>)>) -> Self {
        let mut children: HashMap<DbId, Vec<DbId>> = HashMap::new();
        for (id, parent) in links {
            if let Some(parent) = parent {
                children.entry(parent).or_default().push(id);
            }
        }
        Self { children }
    }

    pub fn replies_of(&self, id: DbId) -> &[DbId] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }
}
