//! Convenience result type alias for Neoterik.

use crate::error::AppError;

/// A specialized `Result` type for Neoterik operations.
pub type AppResult<T> = Result<T, AppError>;
