//! # keepsake-service
//!
//! Use cases built on the repositories, the blob store and the
//! authenticator. Services take their dependencies as `Arc`s at
//! construction time.

pub mod album;
pub mod context;
pub mod metadata;
pub mod photo;
pub mod session;
pub mod upload;

pub use album::AlbumService;
pub use context::{AppServices, Repositories};
pub use metadata::MetadataExtractor;
pub use photo::PhotoService;
pub use session::{AlbumLoad, BookSession, OpenTicket};
pub use upload::UploadFile;
