//! PostgreSQL album repository.

use async_trait::async_trait;
use sqlx::PgPool;

use keepsake_core::error::{AppError, ErrorKind};
use keepsake_core::result::AppResult;
use keepsake_core::types::{AlbumId, UserId};
use keepsake_entity::{Album, CreateAlbum};

use super::AlbumRepository;

/// Album repository backed by the `albums` table.
#[derive(Debug, Clone)]
pub struct PgAlbumRepository {
    pool: PgPool,
}

impl PgAlbumRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AlbumRepository for PgAlbumRepository {
    async fn create(&self, data: &CreateAlbum) -> AppResult<Album> {
        sqlx::query_as::<_, Album>(
            "INSERT INTO albums (title, owner_id) VALUES ($1, $2) RETURNING *",
        )
        .bind(&data.title)
        .bind(data.owner_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create album", e))
    }

    async fn find_by_id(&self, id: AlbumId) -> AppResult<Option<Album>> {
        sqlx::query_as::<_, Album>("SELECT * FROM albums WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find album", e))
    }

    async fn list_for_user(&self, user_id: UserId, email: &str) -> AppResult<Vec<Album>> {
        sqlx::query_as::<_, Album>(
            "SELECT a.* FROM albums a \
             WHERE a.owner_id = $1 \
                OR EXISTS (SELECT 1 FROM album_members m \
                           WHERE m.album_id = a.id \
                             AND (m.user_id = $1 OR LOWER(m.user_email) = LOWER($2))) \
             ORDER BY a.created_at DESC",
        )
        .bind(user_id)
        .bind(email)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list albums", e))
    }
}
