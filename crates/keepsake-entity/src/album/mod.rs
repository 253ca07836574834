//! Albums and their membership.

pub mod membership;
pub mod model;

pub use membership::{AlbumMember, MemberRef, MemberRole, Membership};
pub use model::{Album, CreateAlbum};
