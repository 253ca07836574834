//! Album entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use keepsake_core::types::{AlbumId, UserId};

/// A photo album. The root aggregate for photos and membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Album {
    /// Unique album identifier.
    pub id: AlbumId,
    /// Title shown on the cover.
    pub title: String,
    /// The single owner.
    pub owner_id: UserId,
    /// When the album was created.
    pub created_at: DateTime<Utc>,
}

impl Album {
    /// Whether the given user owns this album.
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.owner_id == user_id
    }
}

/// Data required to create a new album.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAlbum {
    /// Album title (already trimmed).
    pub title: String,
    /// The owner.
    pub owner_id: UserId,
}
