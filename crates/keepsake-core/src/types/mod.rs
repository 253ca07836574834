//! Core type definitions used across the Keepsake workspace.

pub mod id;

pub use id::*;
