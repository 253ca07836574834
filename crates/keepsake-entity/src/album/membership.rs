//! Album membership rows and the member list view.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use keepsake_core::types::{AlbumId, MembershipId, UserId};

/// Role a user holds in an album.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "member_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    /// The album owner.
    Owner,
    /// An invited member.
    Member,
}

impl MemberRole {
    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Member => "member",
        }
    }
}

impl fmt::Display for MemberRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A stored membership row.
///
/// Invites addressed to an email without an account have no `user_id`
/// until that account exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Membership {
    /// Row identifier.
    pub id: MembershipId,
    /// The album.
    pub album_id: AlbumId,
    /// The member, when they have an account.
    pub user_id: Option<UserId>,
    /// The invited email.
    pub user_email: String,
    /// Role in the album.
    pub role: MemberRole,
    /// When the member was added.
    pub created_at: DateTime<Utc>,
}

/// One entry of an album's member list as displayed.
///
/// The owner entry is synthesized from `Album::owner_id` and has no
/// membership row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumMember {
    /// Backing row, `None` for the synthesized owner.
    pub membership_id: Option<MembershipId>,
    /// The member's account, if any.
    pub user_id: Option<UserId>,
    /// Email shown for the member.
    pub email: String,
    /// Role in the album.
    pub role: MemberRole,
}

impl AlbumMember {
    /// Synthesize the owner entry.
    pub fn owner(owner_id: UserId, email: impl Into<String>) -> Self {
        Self {
            membership_id: None,
            user_id: Some(owner_id),
            email: email.into(),
            role: MemberRole::Owner,
        }
    }

    /// Whether this entry is the synthesized owner.
    pub fn is_owner(&self) -> bool {
        self.role == MemberRole::Owner
    }

    /// Reference used to remove this member.
    pub fn member_ref(&self) -> MemberRef {
        match self.user_id {
            Some(user_id) => MemberRef::User(user_id),
            None => MemberRef::Email(self.email.clone()),
        }
    }
}

impl From<Membership> for AlbumMember {
    fn from(row: Membership) -> Self {
        Self {
            membership_id: Some(row.id),
            user_id: row.user_id,
            email: row.user_email,
            role: row.role,
        }
    }
}

/// Identifies a member to remove: by account, or by invited email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemberRef {
    /// Match on the member's account.
    User(UserId),
    /// Match on the invited email.
    Email(String),
}
