//! Photos, the upload pipeline and comments.

use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use rand::Rng;
use tracing::{error, info, warn};

use keepsake_auth::Authenticator;
use keepsake_core::config::StorageConfig;
use keepsake_core::error::AppError;
use keepsake_core::result::AppResult;
use keepsake_core::traits::BlobStore;
use keepsake_core::types::{AlbumId, PhotoId, UserId};
use keepsake_database::{CommentRepository, PhotoRepository, UserRepository};
use keepsake_entity::{CommentView, CreateComment, CreatePhoto, Photo};

use crate::metadata::MetadataExtractor;
use crate::upload::UploadFile;

/// Shown for comment authors whose account cannot be found.
pub const UNKNOWN_USERNAME: &str = "User";

const KEY_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const KEY_SUFFIX_LEN: usize = 7;

/// Photo and comment operations.
#[derive(Debug, Clone)]
pub struct PhotoService {
    photos: Arc<dyn PhotoRepository>,
    comments: Arc<dyn CommentRepository>,
    users: Arc<dyn UserRepository>,
    store: Arc<dyn BlobStore>,
    auth: Arc<Authenticator>,
    extractor: MetadataExtractor,
    config: StorageConfig,
}

impl PhotoService {
    pub fn new(
        photos: Arc<dyn PhotoRepository>,
        comments: Arc<dyn CommentRepository>,
        users: Arc<dyn UserRepository>,
        store: Arc<dyn BlobStore>,
        auth: Arc<Authenticator>,
        extractor: MetadataExtractor,
        config: StorageConfig,
    ) -> Self {
        Self {
            photos,
            comments,
            users,
            store,
            auth,
            extractor,
            config,
        }
    }

    /// Photos of an album, oldest capture first.
    pub async fn list(&self, album_id: AlbumId) -> AppResult<Vec<Photo>> {
        self.photos.list_by_album(album_id).await
    }

    pub async fn get(&self, photo_id: PhotoId) -> AppResult<Photo> {
        self.photos
            .find_by_id(photo_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Photo {photo_id} not found")))
    }

    /// Upload files into an album.
    ///
    /// Files are stored concurrently. A file that fails is logged and left
    /// out; the rest are recorded in one batch. Returns the stored photos.
    pub async fn upload(&self, album_id: AlbumId, files: Vec<UploadFile>) -> AppResult<Vec<Photo>> {
        let session = self.auth.require_session().await?;
        let requested = files.len();

        let staged = join_all(
            files
                .iter()
                .map(|file| self.stage(album_id, session.user_id, file)),
        )
        .await;

        let rows: Vec<CreatePhoto> = staged
            .into_iter()
            .zip(&files)
            .filter_map(|(result, file)| match result {
                Ok(row) => Some(row),
                Err(e) => {
                    warn!(album_id = %album_id, file = %file.name, error = %e, "Upload failed");
                    None
                }
            })
            .collect();

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let stored = self.photos.insert_many(&rows).await?;
        info!(
            album_id = %album_id,
            requested,
            stored = stored.len(),
            "Photos uploaded"
        );
        Ok(stored)
    }

    async fn stage(&self, album_id: AlbumId, user_id: UserId, file: &UploadFile) -> AppResult<CreatePhoto> {
        if file.data.len() as u64 > self.config.max_upload_size_bytes {
            return Err(AppError::validation(format!(
                "File exceeds maximum upload size of {} bytes",
                self.config.max_upload_size_bytes
            )));
        }

        let key = storage_key(album_id, &file.extension());
        self.store.write(&key, file.data.clone()).await?;

        Ok(CreatePhoto {
            album_id,
            uploaded_by: user_id,
            url: self.store.public_url(&key),
            captured_at: self.extractor.captured_at(file, Utc::now()),
            storage_key: key,
        })
    }

    /// Delete a photo and its blob.
    ///
    /// A blob that cannot be removed is logged and left behind; failing
    /// to delete the record is an error.
    pub async fn delete(&self, photo_id: PhotoId, storage_key: &str) -> AppResult<()> {
        self.auth.require_session().await?;

        if let Err(e) = self.store.delete(storage_key).await {
            error!(photo_id = %photo_id, key = storage_key, error = %e, "Failed to delete blob");
        }

        self.photos.delete(photo_id).await?;
        info!(photo_id = %photo_id, "Photo deleted");
        Ok(())
    }

    /// Set or clear a photo's caption.
    pub async fn update_description(
        &self,
        photo_id: PhotoId,
        description: Option<&str>,
    ) -> AppResult<Photo> {
        self.auth.require_session().await?;
        let description = description.map(str::trim).filter(|d| !d.is_empty());
        self.photos
            .update_description(photo_id, description)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Photo {photo_id} not found")))
    }

    /// Post a comment as the signed-in user.
    pub async fn add_comment(&self, photo_id: PhotoId, text: &str) -> AppResult<CommentView> {
        let session = self.auth.require_session().await?;
        let message = text.trim();
        if message.is_empty() {
            return Err(AppError::validation("Comment cannot be empty."));
        }

        let comment = self
            .comments
            .create(&CreateComment {
                photo_id,
                user_id: session.user_id,
                message: message.to_string(),
            })
            .await?;
        let username = self.resolve_username(comment.user_id).await;
        Ok(CommentView { comment, username })
    }

    /// Comments on a photo, oldest first, with author names.
    pub async fn list_comments(&self, photo_id: PhotoId) -> AppResult<Vec<CommentView>> {
        let comments = self.comments.list_by_photo(photo_id).await?;
        let usernames = join_all(comments.iter().map(|c| self.resolve_username(c.user_id))).await;
        Ok(comments
            .into_iter()
            .zip(usernames)
            .map(|(comment, username)| CommentView { comment, username })
            .collect())
    }

    /// Display name of a user, [`UNKNOWN_USERNAME`] when unavailable.
    pub async fn resolve_username(&self, user_id: UserId) -> String {
        match self.users.find_by_id(user_id).await {
            Ok(Some(user)) => user.username,
            Ok(None) => UNKNOWN_USERNAME.to_string(),
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Failed to resolve username");
                UNKNOWN_USERNAME.to_string()
            }
        }
    }
}

/// `"{album_id}/{unix_millis}_{7 base36 chars}.{ext}"`
fn storage_key(album_id: AlbumId, extension: &str) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..KEY_SUFFIX_LEN)
        .map(|_| KEY_ALPHABET[rng.gen_range(0..KEY_ALPHABET.len())] as char)
        .collect();
    format!(
        "{album_id}/{}_{suffix}.{extension}",
        Utc::now().timestamp_millis()
    )
}
