//! PostgreSQL comment repository.

use async_trait::async_trait;
use sqlx::PgPool;

use keepsake_core::error::{AppError, ErrorKind};
use keepsake_core::result::AppResult;
use keepsake_core::types::PhotoId;
use keepsake_entity::{Comment, CreateComment};

use super::CommentRepository;

/// Comment repository backed by the `comments` table.
#[derive(Debug, Clone)]
pub struct PgCommentRepository {
    pool: PgPool,
}

impl PgCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for PgCommentRepository {
    async fn list_by_photo(&self, photo_id: PhotoId) -> AppResult<Vec<Comment>> {
        sqlx::query_as::<_, Comment>(
            "SELECT * FROM comments WHERE photo_id = $1 ORDER BY created_at ASC",
        )
        .bind(photo_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list comments", e))
    }

    async fn create(&self, data: &CreateComment) -> AppResult<Comment> {
        sqlx::query_as::<_, Comment>(
            "INSERT INTO comments (photo_id, user_id, message) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(data.photo_id)
        .bind(data.user_id)
        .bind(&data.message)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to add comment", e))
    }
}
