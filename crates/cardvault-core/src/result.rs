//! Convenience result type alias for CardVault.

use crate::error::AppError;

/// A specialized `Result` type for CardVault operations.
pub type AppResult<T> = Result<T, AppError>;
