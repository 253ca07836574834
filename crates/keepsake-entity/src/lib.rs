//! # keepsake-entity
//!
//! Domain entity models for Keepsake. Structs that mirror a table row
//! derive `sqlx::FromRow`; view types assembled by services do not.

pub mod album;
pub mod photo;
pub mod user;

pub use album::{Album, AlbumMember, CreateAlbum, MemberRef, MemberRole, Membership};
pub use photo::{Comment, CommentView, CreateComment, CreatePhoto, Photo};
pub use user::{CreateUser, Session, User};
