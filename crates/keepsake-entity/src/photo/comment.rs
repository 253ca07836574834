//! Photo comment model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use keepsake_core::types::{CommentId, PhotoId, UserId};

/// A comment left on a photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Comment {
    /// Unique comment identifier.
    pub id: CommentId,
    /// The photo commented on.
    pub photo_id: PhotoId,
    /// The author.
    pub user_id: UserId,
    /// Comment text.
    pub message: String,
    /// When the comment was posted.
    pub created_at: DateTime<Utc>,
}

/// Data required to post a comment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateComment {
    /// The photo commented on.
    pub photo_id: PhotoId,
    /// The author.
    pub user_id: UserId,
    /// Comment text (already trimmed).
    pub message: String,
}

/// A comment together with its author's display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentView {
    /// The stored comment.
    #[serde(flatten)]
    pub comment: Comment,
    /// Author display name.
    pub username: String,
}
