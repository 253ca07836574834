//! Photo entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use keepsake_core::types::{AlbumId, PhotoId, UserId};

/// A photo belonging to an album.
///
/// Immutable after upload except for `description`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Photo {
    /// Unique photo identifier.
    pub id: PhotoId,
    /// The owning album.
    pub album_id: AlbumId,
    /// Who uploaded the photo.
    pub uploaded_by: UserId,
    /// Public URL of the image.
    pub url: String,
    /// Key of the image in the blob store.
    pub storage_key: String,
    /// When the photo was taken.
    pub captured_at: DateTime<Utc>,
    /// Optional caption.
    pub description: Option<String>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to insert a photo record after its blob is stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePhoto {
    /// The owning album.
    pub album_id: AlbumId,
    /// The uploader.
    pub uploaded_by: UserId,
    /// Public URL of the image.
    pub url: String,
    /// Key of the image in the blob store.
    pub storage_key: String,
    /// When the photo was taken.
    pub captured_at: DateTime<Utc>,
}

