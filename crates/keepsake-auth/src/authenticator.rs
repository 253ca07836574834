//! Sign-up, sign-in and the current session.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};

use keepsake_core::config::AuthConfig;
use keepsake_core::error::AppError;
use keepsake_core::result::AppResult;
use keepsake_database::UserRepository;
use keepsake_database::repositories::USER_EXISTS_MESSAGE;
use keepsake_entity::{CreateUser, Session, User};

use crate::password::{CredentialValidator, PasswordHasher};

const INVALID_CREDENTIALS: &str = "Invalid login credentials";

/// Authenticates users and holds the signed-in session.
#[derive(Debug)]
pub struct Authenticator {
    users: Arc<dyn UserRepository>,
    hasher: PasswordHasher,
    validator: CredentialValidator,
    current: RwLock<Option<Session>>,
}

impl Authenticator {
    pub fn new(users: Arc<dyn UserRepository>, config: &AuthConfig) -> Self {
        Self {
            users,
            hasher: PasswordHasher::new(),
            validator: CredentialValidator::new(config),
            current: RwLock::new(None),
        }
    }

    /// Create an account. Does not sign in.
    ///
    /// An existing account is reported before any hashing work. If the
    /// existence probe itself fails, sign-up still proceeds and the
    /// insert's own uniqueness check has the final word.
    pub async fn sign_up(&self, email: &str, password: &str) -> AppResult<User> {
        let email = self.validator.normalize_email(email)?;
        self.validator.validate_password(password)?;

        match self.users.email_exists(&email).await {
            Ok(true) => return Err(AppError::conflict(USER_EXISTS_MESSAGE)),
            Ok(false) => {}
            Err(e) => warn!(email = %email, error = %e, "Email check failed"),
        }

        let password_hash = self.hasher.hash_password(password)?;
        let user = self
            .users
            .create(&CreateUser {
                username: CreateUser::username_from_email(&email),
                email,
                password_hash,
            })
            .await?;

        info!(user_id = %user.id, email = %user.email, "Account created");
        Ok(user)
    }

    /// Sign in and make the session current.
    pub async fn sign_in(&self, email: &str, password: &str) -> AppResult<Session> {
        let email = email.trim().to_lowercase();
        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::authentication(INVALID_CREDENTIALS))?;

        if !self.hasher.verify_password(password, &user.password_hash)? {
            warn!(email = %email, "Sign-in rejected");
            return Err(AppError::authentication(INVALID_CREDENTIALS));
        }

        let session = Session::start(user.id, user.email);
        *self.current.write().await = Some(session.clone());
        info!(user_id = %session.user_id, session_id = %session.id, "Signed in");
        Ok(session)
    }

    /// Drop the current session, if any.
    pub async fn sign_out(&self) {
        if let Some(session) = self.current.write().await.take() {
            info!(user_id = %session.user_id, "Signed out");
        }
    }

    /// The current session, if signed in.
    pub async fn current_session(&self) -> Option<Session> {
        self.current.read().await.clone()
    }

    /// The current session, or an authentication error.
    pub async fn require_session(&self) -> AppResult<Session> {
        self.current_session()
            .await
            .ok_or_else(|| AppError::authentication("Not signed in"))
    }

    /// The signed-in user's account.
    pub async fn current_user(&self) -> AppResult<Option<User>> {
        match self.current_session().await {
            Some(session) => self.users.find_by_id(session.user_id).await,
            None => Ok(None),
        }
    }
}
