//! PostgreSQL membership repository.

use async_trait::async_trait;
use sqlx::PgPool;

use keepsake_core::error::{AppError, ErrorKind};
use keepsake_core::result::AppResult;
use keepsake_core::types::{AlbumId, UserId};
use keepsake_entity::{MemberRef, MemberRole, Membership};

use super::{DUPLICATE_MEMBER_MESSAGE, MembershipRepository};

/// Membership repository backed by the `album_members` table.
#[derive(Debug, Clone)]
pub struct PgMembershipRepository {
    pool: PgPool,
}

impl PgMembershipRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MembershipRepository for PgMembershipRepository {
    async fn list(&self, album_id: AlbumId) -> AppResult<Vec<Membership>> {
        sqlx::query_as::<_, Membership>(
            "SELECT * FROM album_members WHERE album_id = $1 ORDER BY created_at ASC",
        )
        .bind(album_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list members", e))
    }

    async fn add(
        &self,
        album_id: AlbumId,
        user_id: Option<UserId>,
        email: &str,
        role: MemberRole,
    ) -> AppResult<Membership> {
        sqlx::query_as::<_, Membership>(
            "INSERT INTO album_members (album_id, user_id, user_email, role) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(album_id)
        .bind(user_id)
        .bind(email)
        .bind(role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            // 23505: unique_violation on (album_id, lower(user_email))
            sqlx::Error::Database(ref db_err) if db_err.code().as_deref() == Some("23505") => {
                AppError::conflict(DUPLICATE_MEMBER_MESSAGE)
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to add member", e),
        })
    }

    async fn remove(&self, album_id: AlbumId, member: &MemberRef) -> AppResult<bool> {
        let query = match member {
            MemberRef::User(user_id) => {
                sqlx::query("DELETE FROM album_members WHERE album_id = $1 AND user_id = $2")
                    .bind(album_id)
                    .bind(*user_id)
            }
            MemberRef::Email(email) => sqlx::query(
                "DELETE FROM album_members WHERE album_id = $1 AND LOWER(user_email) = LOWER($2)",
            )
            .bind(album_id)
            .bind(email.clone()),
        };

        let result = query
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to remove member", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn role_of(&self, album_id: AlbumId, user_id: UserId) -> AppResult<Option<MemberRole>> {
        sqlx::query_scalar::<_, MemberRole>(
            "SELECT role FROM album_members WHERE album_id = $1 AND user_id = $2",
        )
        .bind(album_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to look up role", e))
    }
}
