//! PostgreSQL photo repository.

use async_trait::async_trait;
use sqlx::PgPool;

use keepsake_core::error::{AppError, ErrorKind};
use keepsake_core::result::AppResult;
use keepsake_core::types::{AlbumId, PhotoId};
use keepsake_entity::{CreatePhoto, Photo};

use super::PhotoRepository;

/// Photo repository backed by the `photos` table.
#[derive(Debug, Clone)]
pub struct PgPhotoRepository {
    pool: PgPool,
}

impl PgPhotoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PhotoRepository for PgPhotoRepository {
    async fn list_by_album(&self, album_id: AlbumId) -> AppResult<Vec<Photo>> {
        sqlx::query_as::<_, Photo>(
            "SELECT * FROM photos WHERE album_id = $1 ORDER BY captured_at ASC, created_at ASC",
        )
        .bind(album_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list photos", e))
    }

    async fn find_by_id(&self, id: PhotoId) -> AppResult<Option<Photo>> {
        sqlx::query_as::<_, Photo>("SELECT * FROM photos WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find photo", e))
    }

    async fn insert_many(&self, photos: &[CreatePhoto]) -> AppResult<Vec<Photo>> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let mut inserted = Vec::with_capacity(photos.len());
        for photo in photos {
            let row = sqlx::query_as::<_, Photo>(
                "INSERT INTO photos (album_id, uploaded_by, url, storage_key, captured_at) \
                 VALUES ($1, $2, $3, $4, $5) RETURNING *",
            )
            .bind(photo.album_id)
            .bind(photo.uploaded_by)
            .bind(&photo.url)
            .bind(&photo.storage_key)
            .bind(photo.captured_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to insert photo", e))?;
            inserted.push(row);
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit photo batch", e)
        })?;
        Ok(inserted)
    }

    async fn delete(&self, id: PhotoId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM photos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete photo", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn update_description(
        &self,
        id: PhotoId,
        description: Option<&str>,
    ) -> AppResult<Option<Photo>> {
        sqlx::query_as::<_, Photo>("UPDATE photos SET description = $2 WHERE id = $1 RETURNING *")
            .bind(id)
            .bind(description)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to update description", e)
            })
    }
}
