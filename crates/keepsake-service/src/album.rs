//! Albums and their member lists.

use std::sync::Arc;

use tracing::{info, warn};

use keepsake_auth::Authenticator;
use keepsake_core::error::AppError;
use keepsake_core::result::AppResult;
use keepsake_core::types::{AlbumId, UserId};
use keepsake_database::{AlbumRepository, MembershipRepository, UserRepository};
use keepsake_entity::{Album, AlbumMember, CreateAlbum, MemberRef, MemberRole};

/// Shown for the owner when their email cannot be resolved.
pub const UNKNOWN_OWNER_EMAIL: &str = "Album Owner";

/// Album creation, listing and membership management for the signed-in user.
#[derive(Debug, Clone)]
pub struct AlbumService {
    albums: Arc<dyn AlbumRepository>,
    memberships: Arc<dyn MembershipRepository>,
    users: Arc<dyn UserRepository>,
    auth: Arc<Authenticator>,
}

impl AlbumService {
    pub fn new(
        albums: Arc<dyn AlbumRepository>,
        memberships: Arc<dyn MembershipRepository>,
        users: Arc<dyn UserRepository>,
        auth: Arc<Authenticator>,
    ) -> Self {
        Self {
            albums,
            memberships,
            users,
            auth,
        }
    }

    /// Create an album owned by the signed-in user.
    pub async fn create(&self, title: &str) -> AppResult<Album> {
        let session = self.auth.require_session().await?;
        let title = title.trim();
        if title.is_empty() {
            return Err(AppError::validation("Album title is required."));
        }

        let album = self
            .albums
            .create(&CreateAlbum {
                title: title.to_string(),
                owner_id: session.user_id,
            })
            .await?;

        info!(album_id = %album.id, owner_id = %album.owner_id, title = %album.title, "Album created");
        Ok(album)
    }

    /// Albums the signed-in user owns or belongs to, newest first.
    pub async fn list_mine(&self) -> AppResult<Vec<Album>> {
        let session = self.auth.require_session().await?;
        self.albums
            .list_for_user(session.user_id, &session.email)
            .await
    }

    pub async fn get(&self, album_id: AlbumId) -> AppResult<Album> {
        self.albums
            .find_by_id(album_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Album {album_id} not found")))
    }

    /// The member list with the owner synthesized as its first entry.
    pub async fn list_members(&self, album_id: AlbumId) -> AppResult<Vec<AlbumMember>> {
        let session = self.auth.require_session().await?;
        let album = self.get(album_id).await?;

        let owner_email = if album.is_owned_by(session.user_id) {
            session.email.clone()
        } else {
            self.resolve_owner_email(album.owner_id)
                .await
                .unwrap_or_else(|| UNKNOWN_OWNER_EMAIL.to_string())
        };

        let rows = self.memberships.list(album_id).await?;
        let mut members = Vec::with_capacity(rows.len() + 1);
        members.push(AlbumMember::owner(album.owner_id, owner_email));
        members.extend(
            rows.into_iter()
                .filter(|row| row.user_id != Some(album.owner_id))
                .map(AlbumMember::from),
        );
        Ok(members)
    }

    /// Invite someone by email. Only the owner may invite.
    pub async fn add_member(&self, album_id: AlbumId, email: &str) -> AppResult<AlbumMember> {
        let session = self.auth.require_session().await?;
        let email = email.trim().to_lowercase();
        if email.is_empty() {
            return Err(AppError::validation("Email is required."));
        }
        if email == session.email {
            return Err(AppError::validation("You cannot invite yourself."));
        }

        let album = self.get(album_id).await?;
        if !album.is_owned_by(session.user_id) {
            return Err(AppError::authorization(
                "Only the album owner can manage members.",
            ));
        }

        let user_id = self.users.find_by_email(&email).await?.map(|user| user.id);
        let membership = self
            .memberships
            .add(album_id, user_id, &email, MemberRole::Member)
            .await?;

        info!(
            album_id = %album_id,
            email = %email,
            linked = user_id.is_some(),
            "Member added"
        );
        Ok(AlbumMember::from(membership))
    }

    /// Remove a member by account or by invited email. Returns whether a
    /// member was removed.
    pub async fn remove_member(&self, album_id: AlbumId, member: &MemberRef) -> AppResult<bool> {
        let session = self.auth.require_session().await?;
        let album = self.get(album_id).await?;
        if !album.is_owned_by(session.user_id) {
            return Err(AppError::authorization(
                "Only the album owner can manage members.",
            ));
        }

        let removed = self.memberships.remove(album_id, member).await?;
        info!(album_id = %album_id, member = ?member, removed, "Member removal");
        Ok(removed)
    }

    /// Email of an album owner, `None` when it cannot be resolved.
    pub async fn resolve_owner_email(&self, user_id: UserId) -> Option<String> {
        match self.users.find_by_id(user_id).await {
            Ok(user) => user.map(|user| user.email),
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Failed to resolve owner email");
                None
            }
        }
    }

    /// Whether the signed-in user owns the album. Failures count as "no".
    pub async fn resolve_ownership(&self, album_id: AlbumId) -> bool {
        let Some(session) = self.auth.current_session().await else {
            return false;
        };

        match self.albums.find_by_id(album_id).await {
            Ok(Some(album)) if album.is_owned_by(session.user_id) => true,
            Ok(Some(_)) => match self.memberships.role_of(album_id, session.user_id).await {
                Ok(role) => role == Some(MemberRole::Owner),
                Err(e) => {
                    warn!(album_id = %album_id, error = %e, "Ownership check failed");
                    false
                }
            },
            Ok(None) => false,
            Err(e) => {
                warn!(album_id = %album_id, error = %e, "Ownership check failed");
                false
            }
        }
    }
}
