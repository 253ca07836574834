//! Core traits defined in `keepsake-core` and implemented by other crates.

pub mod storage;

pub use storage::BlobStore;
