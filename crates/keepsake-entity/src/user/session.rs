//! Signed-in session value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use keepsake_core::types::{SessionId, UserId};

/// The identity of the signed-in user for the lifetime of a sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Session identifier.
    pub id: SessionId,
    /// The signed-in user.
    pub user_id: UserId,
    /// The signed-in user's email.
    pub email: String,
    /// When the session started.
    pub started_at: DateTime<Utc>,
}

impl Session {
    /// Start a session for a user.
    pub fn start(user_id: UserId, email: impl Into<String>) -> Self {
        Self {
            id: SessionId::new(),
            user_id,
            email: email.into(),
            started_at: Utc::now(),
        }
    }
}
