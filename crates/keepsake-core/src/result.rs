//! Convenience result type alias for Keepsake.

use crate::error::AppError;

/// A specialized `Result` type for Keepsake operations.
pub type AppResult<T> = Result<T, AppError>;
