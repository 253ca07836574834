//! User accounts and sign-in sessions.

pub mod model;
pub mod session;

pub use model::{CreateUser, User};
pub use session::Session;
