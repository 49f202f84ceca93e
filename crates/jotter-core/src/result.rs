//! Convenience result type alias for Jotter.

use crate::error::AppError;

/// A specialized `Result` type for Jotter operations.
pub type AppResult<T> = Result<T, AppError>;
