//! Unified application error types for CardVault.
//!
//! Every crate maps its failures into [`AppError`] so that the `?`
//! operator carries a single error type up to the caller. The
//! [`ErrorKind`] carries the access-control taxonomy; callers at the
//! boundary use [`ErrorKind::disposition`] to decide how to answer.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The caller has no access to the resource, or the resource does not exist.
    Forbidden,
    /// A row other than the guarded resource was not found.
    NotFound,
    /// A grantee or new owner could not be resolved.
    UserNotFound,
    /// A non-deleted share already exists for the resource and grantee.
    AlreadyShared,
    /// The operation is not available for this resource kind.
    NotSupported,
    /// Ownership transfer to the current owner.
    SelfTransfer,
    /// The caller is not the current owner of the resource.
    NotOwner,
    /// An identifier could not be parsed.
    InvalidId,
    /// Input validation failed.
    Validation,
    /// A concurrent writer changed the row first.
    Conflict,
    /// The backing store failed.
    Database,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// An internal error occurred.
    Internal,
}

/// How a boundary layer should answer an error of a given kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorDisposition {
    /// Access denied, without detail.
    AccessDenied,
    /// Request rejected with a reason the user can act on.
    Rejected,
    /// Transient infrastructure failure; the caller may retry.
    Retryable,
    /// Unexpected failure.
    Internal,
}

impl ErrorKind {
    /// Map the kind to its boundary disposition.
    pub fn disposition(&self) -> ErrorDisposition {
        match self {
            Self::Forbidden | Self::NotOwner => ErrorDisposition::AccessDenied,
            Self::NotFound
            | Self::UserNotFound
            | Self::AlreadyShared
            | Self::NotSupported
            | Self::SelfTransfer
            | Self::InvalidId
            | Self::Validation
            | Self::Conflict => ErrorDisposition::Rejected,
            Self::Database => ErrorDisposition::Retryable,
            Self::Configuration | Self::Serialization | Self::Internal => {
                ErrorDisposition::Internal
            }
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Forbidden => write!(f, "FORBIDDEN"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::UserNotFound => write!(f, "USER_NOT_FOUND"),
            Self::AlreadyShared => write!(f, "ALREADY_SHARED"),
            Self::NotSupported => write!(f, "NOT_SUPPORTED"),
            Self::SelfTransfer => write!(f, "SELF_TRANSFER"),
            Self::NotOwner => write!(f, "NOT_OWNER"),
            Self::InvalidId => write!(f, "INVALID_ID"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::Database => write!(f, "DATABASE"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified application error used throughout CardVault.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a forbidden error.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, message)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a user-not-found error.
    pub fn user_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UserNotFound, message)
    }

    /// Create an already-shared error.
    pub fn already_shared(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AlreadyShared, message)
    }

    /// Create a not-supported error.
    pub fn not_supported(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotSupported, message)
    }

    /// Create a self-transfer error.
    pub fn self_transfer(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SelfTransfer, message)
    }

    /// Create a not-owner error.
    pub fn not_owner(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotOwner, message)
    }

    /// Create an invalid-id error.
    pub fn invalid_id(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidId, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Whether this error has the given kind.
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        Self::with_source(ErrorKind::Database, format!("Database error: {err}"), err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_failures_are_denied() {
        assert_eq!(
            ErrorKind::Forbidden.disposition(),
            ErrorDisposition::AccessDenied
        );
        assert_eq!(
            ErrorKind::NotOwner.disposition(),
            ErrorDisposition::AccessDenied
        );
    }

    #[test]
    fn test_user_errors_are_rejected() {
        for kind in [
            ErrorKind::AlreadyShared,
            ErrorKind::SelfTransfer,
            ErrorKind::UserNotFound,
            ErrorKind::NotSupported,
            ErrorKind::InvalidId,
        ] {
            assert_eq!(kind.disposition(), ErrorDisposition::Rejected, "{kind}");
        }
    }

    #[test]
    fn test_store_failure_is_retryable() {
        let err = AppError::database("connection reset");
        assert_eq!(err.kind.disposition(), ErrorDisposition::Retryable);
    }

    #[test]
    fn test_display_includes_kind() {
        let err = AppError::already_shared("Card already shared with this user");
        assert_eq!(
            err.to_string(),
            "ALREADY_SHARED: Card already shared with this user"
        );
    }

    #[test]
    fn test_clone_drops_source() {
        let io = std::io::Error::other("boom");
        let err = AppError::with_source(ErrorKind::Database, "store failed", io);
        let cloned = err.clone();
        assert!(cloned.source.is_none());
        assert!(cloned.is(ErrorKind::Database));
    }
}
