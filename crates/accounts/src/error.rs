//! Error types for account and leaderboard operations.

use database::DatabaseError;
use thiserror::Error;

use crate::validation::ValidationError;

/// Errors surfaced to callers of the service operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// No caller identity was supplied.
    #[error("caller is not authenticated")]
    Unauthenticated,

    /// A required argument was missing or malformed.
    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] ValidationError),

    /// The caller lacks the role or scope for the operation.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// The data store failed. Any batch in flight was rolled back.
    #[error("internal error: {0}")]
    Internal(#[from] DatabaseError),
}

impl ServiceError {
    /// Stable error code reported across the invocation boundary.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::Unauthenticated => "unauthenticated",
            ServiceError::InvalidArgument(_) => "invalid-argument",
            ServiceError::PermissionDenied(_) => "permission-denied",
            ServiceError::Internal(_) => "internal",
        }
    }
}

/// Errors from the credential store.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// There was no credential to delete.
    #[error("credential not found for user {0}")]
    NotFound(String),

    /// The credential backend failed.
    #[error("credential store error: {0}")]
    Store(String),
}

/// Result type for service operations.
pub type Result<T> = std::result::Result<T, ServiceError>;
