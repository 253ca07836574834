//! In-process implementation of every repository trait.
//!
//! Backs tests and the offline demo mode of the CLI. Rows live in
//! [`DashMap`]s keyed by id; a global sequence number stands in for
//! `created_at` ordering so rows created within the same clock tick still
//! sort deterministically. Individual operations can be made to fail with
//! [`MemoryDatabase::fail_on`].

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::{DashMap, DashSet};

use keepsake_core::error::AppError;
use keepsake_core::result::AppResult;
use keepsake_core::types::{AlbumId, CommentId, MembershipId, PhotoId, UserId};
use keepsake_entity::{
    Album, Comment, CreateAlbum, CreateComment, CreatePhoto, CreateUser, MemberRef, MemberRole,
    Membership, Photo, User,
};

use crate::repositories::{
    AlbumRepository, CommentRepository, DUPLICATE_MEMBER_MESSAGE, MembershipRepository,
    PhotoRepository, USER_EXISTS_MESSAGE, UserRepository,
};

/// Operation names accepted by [`MemoryDatabase::fail_on`].
pub mod ops {
    pub const USERS_FIND: &str = "users.find";
    pub const USERS_EXISTS: &str = "users.exists";
    pub const USERS_CREATE: &str = "users.create";
    pub const ALBUMS_CREATE: &str = "albums.create";
    pub const ALBUMS_FIND: &str = "albums.find";
    pub const ALBUMS_LIST: &str = "albums.list";
    pub const MEMBERS_LIST: &str = "members.list";
    pub const MEMBERS_ADD: &str = "members.add";
    pub const MEMBERS_REMOVE: &str = "members.remove";
    pub const MEMBERS_ROLE: &str = "members.role";
    pub const PHOTOS_LIST: &str = "photos.list";
    pub const PHOTOS_FIND: &str = "photos.find";
    pub const PHOTOS_INSERT: &str = "photos.insert";
    pub const PHOTOS_DELETE: &str = "photos.delete";
    pub const PHOTOS_DESCRIBE: &str = "photos.describe";
    pub const COMMENTS_LIST: &str = "comments.list";
    pub const COMMENTS_CREATE: &str = "comments.create";
}

#[derive(Debug, Clone)]
struct Row<T> {
    seq: u64,
    value: T,
}

/// All Keepsake tables held in memory.
#[derive(Debug, Default)]
pub struct MemoryDatabase {
    seq: AtomicU64,
    users: DashMap<UserId, Row<User>>,
    albums: DashMap<AlbumId, Row<Album>>,
    memberships: DashMap<MembershipId, Row<Membership>>,
    photos: DashMap<PhotoId, Row<Photo>>,
    comments: DashMap<CommentId, Row<Comment>>,
    failures: DashSet<String>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call of the named operation fail with a database error.
    pub fn fail_on(&self, operation: &str) {
        self.failures.insert(operation.to_string());
    }

    /// Undo [`fail_on`](Self::fail_on).
    pub fn recover(&self, operation: &str) {
        self.failures.remove(operation);
    }

    /// Number of stored photos across all albums.
    pub fn photo_count(&self) -> usize {
        self.photos.len()
    }

    fn check(&self, operation: &str) -> AppResult<()> {
        if self.failures.contains(operation) {
            return Err(AppError::database(format!("{operation} unavailable")));
        }
        Ok(())
    }

    fn next_seq(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::Relaxed)
    }

    fn row<T>(&self, value: T) -> Row<T> {
        Row {
            seq: self.next_seq(),
            value,
        }
    }
}

fn sorted<K, T: Clone>(map: &DashMap<K, Row<T>>, keep: impl Fn(&T) -> bool) -> Vec<Row<T>>
where
    K: Eq + std::hash::Hash,
{
    let mut rows: Vec<Row<T>> = map
        .iter()
        .filter(|entry| keep(&entry.value().value))
        .map(|entry| entry.value().clone())
        .collect();
    rows.sort_by_key(|row| row.seq);
    rows
}

#[async_trait]
impl UserRepository for MemoryDatabase {
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        self.check(ops::USERS_FIND)?;
        Ok(self.users.get(&id).map(|row| row.value.clone()))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.check(ops::USERS_FIND)?;
        Ok(self
            .users
            .iter()
            .find(|row| row.value.email.eq_ignore_ascii_case(email))
            .map(|row| row.value.clone()))
    }

    async fn email_exists(&self, email: &str) -> AppResult<bool> {
        self.check(ops::USERS_EXISTS)?;
        Ok(self
            .users
            .iter()
            .any(|row| row.value.email.eq_ignore_ascii_case(email)))
    }

    async fn create(&self, data: &CreateUser) -> AppResult<User> {
        self.check(ops::USERS_CREATE)?;
        if self
            .users
            .iter()
            .any(|row| row.value.email.eq_ignore_ascii_case(&data.email))
        {
            return Err(AppError::conflict(USER_EXISTS_MESSAGE));
        }
        let user = User {
            id: UserId::new(),
            email: data.email.clone(),
            username: data.username.clone(),
            password_hash: data.password_hash.clone(),
            created_at: Utc::now(),
        };
        self.users.insert(user.id, self.row(user.clone()));
        Ok(user)
    }
}

#[async_trait]
impl AlbumRepository for MemoryDatabase {
    async fn create(&self, data: &CreateAlbum) -> AppResult<Album> {
        self.check(ops::ALBUMS_CREATE)?;
        let album = Album {
            id: AlbumId::new(),
            title: data.title.clone(),
            owner_id: data.owner_id,
            created_at: Utc::now(),
        };
        self.albums.insert(album.id, self.row(album.clone()));
        Ok(album)
    }

    async fn find_by_id(&self, id: AlbumId) -> AppResult<Option<Album>> {
        self.check(ops::ALBUMS_FIND)?;
        Ok(self.albums.get(&id).map(|row| row.value.clone()))
    }

    async fn list_for_user(&self, user_id: UserId, email: &str) -> AppResult<Vec<Album>> {
        self.check(ops::ALBUMS_LIST)?;
        let member_of: Vec<AlbumId> = self
            .memberships
            .iter()
            .filter(|row| {
                row.value.user_id == Some(user_id)
                    || row.value.user_email.eq_ignore_ascii_case(email)
            })
            .map(|row| row.value.album_id)
            .collect();

        let mut rows = sorted(&self.albums, |album| {
            album.owner_id == user_id || member_of.contains(&album.id)
        });
        rows.reverse();
        Ok(rows.into_iter().map(|row| row.value).collect())
    }
}

#[async_trait]
impl MembershipRepository for MemoryDatabase {
    async fn list(&self, album_id: AlbumId) -> AppResult<Vec<Membership>> {
        self.check(ops::MEMBERS_LIST)?;
        Ok(sorted(&self.memberships, |m| m.album_id == album_id)
            .into_iter()
            .map(|row| row.value)
            .collect())
    }

    async fn add(
        &self,
        album_id: AlbumId,
        user_id: Option<UserId>,
        email: &str,
        role: MemberRole,
    ) -> AppResult<Membership> {
        self.check(ops::MEMBERS_ADD)?;
        let duplicate = self.memberships.iter().any(|row| {
            row.value.album_id == album_id && row.value.user_email.eq_ignore_ascii_case(email)
        });
        if duplicate {
            return Err(AppError::conflict(DUPLICATE_MEMBER_MESSAGE));
        }
        let membership = Membership {
            id: MembershipId::new(),
            album_id,
            user_id,
            user_email: email.to_string(),
            role,
            created_at: Utc::now(),
        };
        self.memberships
            .insert(membership.id, self.row(membership.clone()));
        Ok(membership)
    }

    async fn remove(&self, album_id: AlbumId, member: &MemberRef) -> AppResult<bool> {
        self.check(ops::MEMBERS_REMOVE)?;
        let before = self.memberships.len();
        self.memberships.retain(|_, row| {
            let m = &row.value;
            let matches = m.album_id == album_id
                && match member {
                    MemberRef::User(user_id) => m.user_id == Some(*user_id),
                    MemberRef::Email(email) => m.user_email.eq_ignore_ascii_case(email),
                };
            !matches
        });
        Ok(self.memberships.len() < before)
    }

    async fn role_of(&self, album_id: AlbumId, user_id: UserId) -> AppResult<Option<MemberRole>> {
        self.check(ops::MEMBERS_ROLE)?;
        Ok(self
            .memberships
            .iter()
            .find(|row| row.value.album_id == album_id && row.value.user_id == Some(user_id))
            .map(|row| row.value.role))
    }
}

#[async_trait]
impl PhotoRepository for MemoryDatabase {
    async fn list_by_album(&self, album_id: AlbumId) -> AppResult<Vec<Photo>> {
        self.check(ops::PHOTOS_LIST)?;
        let mut rows = sorted(&self.photos, |p| p.album_id == album_id);
        rows.sort_by_key(|row| row.value.captured_at);
        Ok(rows.into_iter().map(|row| row.value).collect())
    }

    async fn find_by_id(&self, id: PhotoId) -> AppResult<Option<Photo>> {
        self.check(ops::PHOTOS_FIND)?;
        Ok(self.photos.get(&id).map(|row| row.value.clone()))
    }

    async fn insert_many(&self, photos: &[CreatePhoto]) -> AppResult<Vec<Photo>> {
        self.check(ops::PHOTOS_INSERT)?;
        let now = Utc::now();
        let inserted: Vec<Photo> = photos
            .iter()
            .map(|data| Photo {
                id: PhotoId::new(),
                album_id: data.album_id,
                uploaded_by: data.uploaded_by,
                url: data.url.clone(),
                storage_key: data.storage_key.clone(),
                captured_at: data.captured_at,
                description: None,
                created_at: now,
            })
            .collect();
        for photo in &inserted {
            self.photos.insert(photo.id, self.row(photo.clone()));
        }
        Ok(inserted)
    }

    async fn delete(&self, id: PhotoId) -> AppResult<bool> {
        self.check(ops::PHOTOS_DELETE)?;
        let removed = self.photos.remove(&id).is_some();
        if removed {
            self.comments.retain(|_, row| row.value.photo_id != id);
        }
        Ok(removed)
    }

    async fn update_description(
        &self,
        id: PhotoId,
        description: Option<&str>,
    ) -> AppResult<Option<Photo>> {
        self.check(ops::PHOTOS_DESCRIBE)?;
        Ok(self.photos.get_mut(&id).map(|mut row| {
            row.value.description = description.map(str::to_string);
            row.value.clone()
        }))
    }
}

#[async_trait]
impl CommentRepository for MemoryDatabase {
    async fn list_by_photo(&self, photo_id: PhotoId) -> AppResult<Vec<Comment>> {
        self.check(ops::COMMENTS_LIST)?;
        Ok(sorted(&self.comments, |c| c.photo_id == photo_id)
            .into_iter()
            .map(|row| row.value)
            .collect())
    }

    async fn create(&self, data: &CreateComment) -> AppResult<Comment> {
        self.check(ops::COMMENTS_CREATE)?;
        let comment = Comment {
            id: CommentId::new(),
            photo_id: data.photo_id,
            user_id: data.user_id,
            message: data.message.clone(),
            created_at: Utc::now(),
        };
        self.comments.insert(comment.id, self.row(comment.clone()));
        Ok(comment)
    }
}
