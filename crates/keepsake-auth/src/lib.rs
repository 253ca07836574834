//! # keepsake-auth
//!
//! Account creation and sign-in. Passwords are hashed with Argon2id; the
//! signed-in identity is held in process by the [`Authenticator`].

pub mod authenticator;
pub mod password;

pub use authenticator::Authenticator;
pub use password::{CredentialValidator, PasswordHasher};
