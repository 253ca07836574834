//! Repository traits and their PostgreSQL implementations.
//!
//! Services hold repositories as `Arc<dyn …Repository>` so the same code
//! runs against PostgreSQL or [`MemoryDatabase`](crate::MemoryDatabase).

pub mod album;
pub mod comment;
pub mod membership;
pub mod photo;
pub mod user;

use std::fmt::Debug;

use async_trait::async_trait;

use keepsake_core::result::AppResult;
use keepsake_core::types::{AlbumId, PhotoId, UserId};
use keepsake_entity::{
    Album, Comment, CreateAlbum, CreateComment, CreatePhoto, CreateUser, MemberRef, MemberRole,
    Membership, Photo, User,
};

pub use album::PgAlbumRepository;
pub use comment::PgCommentRepository;
pub use membership::PgMembershipRepository;
pub use photo::PgPhotoRepository;
pub use user::PgUserRepository;

/// Message returned when an account already exists for an email.
pub const USER_EXISTS_MESSAGE: &str = "User already exists. Please Log In.";

/// Message returned when an email is already on an album's member list.
pub const DUPLICATE_MEMBER_MESSAGE: &str = "User is already a member of this album.";

/// Account lookups and creation.
#[async_trait]
pub trait UserRepository: Send + Sync + Debug + 'static {
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>>;

    /// Case-insensitive lookup.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Whether an account exists for the email.
    async fn email_exists(&self, email: &str) -> AppResult<bool>;

    /// Insert an account. A taken email is a `Conflict`.
    async fn create(&self, data: &CreateUser) -> AppResult<User>;
}

/// Album records.
#[async_trait]
pub trait AlbumRepository: Send + Sync + Debug + 'static {
    async fn create(&self, data: &CreateAlbum) -> AppResult<Album>;

    async fn find_by_id(&self, id: AlbumId) -> AppResult<Option<Album>>;

    /// Albums owned by the user or listing them as a member (by account or
    /// by email), newest first.
    async fn list_for_user(&self, user_id: UserId, email: &str) -> AppResult<Vec<Album>>;
}

/// Stored membership rows. The owner is never stored here.
#[async_trait]
pub trait MembershipRepository: Send + Sync + Debug + 'static {
    /// Rows for an album, oldest first.
    async fn list(&self, album_id: AlbumId) -> AppResult<Vec<Membership>>;

    /// Add a row. An email already on the album is a `Conflict`.
    async fn add(
        &self,
        album_id: AlbumId,
        user_id: Option<UserId>,
        email: &str,
        role: MemberRole,
    ) -> AppResult<Membership>;

    /// Remove the matching row. Returns whether one was removed.
    async fn remove(&self, album_id: AlbumId, member: &MemberRef) -> AppResult<bool>;

    /// The user's stored role in an album, if any.
    async fn role_of(&self, album_id: AlbumId, user_id: UserId) -> AppResult<Option<MemberRole>>;
}

/// Photo records.
#[async_trait]
pub trait PhotoRepository: Send + Sync + Debug + 'static {
    /// Photos of an album, ascending by capture time.
    async fn list_by_album(&self, album_id: AlbumId) -> AppResult<Vec<Photo>>;

    async fn find_by_id(&self, id: PhotoId) -> AppResult<Option<Photo>>;

    /// Insert several photos at once; all or none are stored.
    async fn insert_many(&self, photos: &[CreatePhoto]) -> AppResult<Vec<Photo>>;

    async fn delete(&self, id: PhotoId) -> AppResult<bool>;

    async fn update_description(
        &self,
        id: PhotoId,
        description: Option<&str>,
    ) -> AppResult<Option<Photo>>;
}

/// Photo comments.
#[async_trait]
pub trait CommentRepository: Send + Sync + Debug + 'static {
    /// Comments on a photo, oldest first.
    async fn list_by_photo(&self, photo_id: PhotoId) -> AppResult<Vec<Comment>>;

    async fn create(&self, data: &CreateComment) -> AppResult<Comment>;
}
