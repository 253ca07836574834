//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use keepsake_core::types::UserId;

/// A registered account.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: UserId,
    /// Lower-cased login email.
    pub email: String,
    /// Name shown next to comments.
    pub username: String,
    /// Argon2 password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to create a new account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Lower-cased login email.
    pub email: String,
    /// Display name.
    pub username: String,
    /// Pre-hashed password.
    pub password_hash: String,
}

impl CreateUser {
    /// Username derived from the local part of an email address.
    pub fn username_from_email(email: &str) -> String {
        email
            .split('@')
            .next()
            .filter(|local| !local.is_empty())
            .unwrap_or(email)
            .to_string()
    }
}
