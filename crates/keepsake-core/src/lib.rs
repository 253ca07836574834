//! # keepsake-core
//!
//! Core crate for Keepsake. Contains the unified error system, typed
//! identifiers, configuration schemas, and the blob storage trait that
//! the storage crate implements.
//!
//! This crate has **no** internal dependencies on other Keepsake crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
