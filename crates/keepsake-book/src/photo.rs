//! The book's view of a photo.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use keepsake_core::types::PhotoId;
use keepsake_entity::Photo;

use crate::label::format_label;

/// A photo as placed on a page.
///
/// Carries the precomputed date label so grouping and lookups never
/// reformat timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookPhoto {
    /// Photo identifier, used as the reflow anchor.
    pub id: PhotoId,
    /// Public image URL.
    pub url: String,
    /// Calendar date the photo was taken.
    pub captured_on: NaiveDate,
    /// Display label, e.g. `"Dec 1, 2025"`.
    pub label: String,
    /// Optional caption.
    pub description: Option<String>,
    /// Blob key, needed to delete the photo.
    pub storage_key: String,
}

impl BookPhoto {
    /// Build a book photo from its parts.
    pub fn new(
        id: PhotoId,
        url: impl Into<String>,
        captured_at: DateTime<Utc>,
        storage_key: impl Into<String>,
    ) -> Self {
        let captured_on = captured_at.date_naive();
        Self {
            id,
            url: url.into(),
            captured_on,
            label: format_label(captured_on),
            description: None,
            storage_key: storage_key.into(),
        }
    }
}

impl From<&Photo> for BookPhoto {
    fn from(photo: &Photo) -> Self {
        let mut book_photo = Self::new(
            photo.id,
            photo.url.clone(),
            photo.captured_at,
            photo.storage_key.clone(),
        );
        book_photo.description = photo.description.clone();
        book_photo
    }
}

impl From<Photo> for BookPhoto {
    fn from(photo: Photo) -> Self {
        Self::from(&photo)
    }
}
