//! Convenience result type alias for HirePulse.

use crate::error::AppError;

/// A specialized `Result` type for HirePulse operations.
pub type AppResult<T> = Result<T, AppError>;
