//! # keepsake-database
//!
//! Data access for Keepsake. The repository traits in [`repositories`]
//! are what services depend on; `Pg*` types implement them against
//! PostgreSQL and [`MemoryDatabase`] implements all of them in process.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
pub use memory::MemoryDatabase;
pub use repositories::{
    AlbumRepository, CommentRepository, MembershipRepository, PhotoRepository, UserRepository,
};
