//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the core domain expects from infrastructure.
//! They contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No `sqlx` or `mongodb` types in any signature
//! - The DAO contract is identical for every backend
//! - Storage errors are mapped to `RepositoryError` inside the adapter

pub mod clock;
pub mod system_dao;

use thiserror::Error;

use crate::contracts::ResponseCode;
use crate::validation::ValidationError;

// Re-export port traits for convenience
pub use clock::{Clock, SystemClock, stamp_after, stamp_now};
pub use system_dao::SystemDao;

#[cfg(any(test, feature = "test-utils"))]
pub use clock::{FixedClock, SteppingClock};

#[cfg(test)]
pub use system_dao::MockSystemDao;

/// Domain-specific errors for repository operations.
///
/// This error type abstracts away storage implementation details (e.g., sqlx
/// or driver errors) and provides a clean interface for services to handle
/// storage failures.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The requested entity was not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// An entity with the same identifier or name already exists.
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Storage backend error (unreachable server, I/O failure, etc.).
    #[error("Storage error: {0}")]
    Storage(String),

    /// A stored record could not be mapped to a domain type.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A storage constraint other than uniqueness was violated.
    #[error("Constraint violation: {0}")]
    Constraint(String),
}

/// Core error type for semantic domain errors.
///
/// Every variant is recoverable by the caller. `SystemService` converts each
/// of them into a failure `Envelope` with the matching `ResponseCode`.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The request violated one or more field rules.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No system matches the given identifier or name.
    #[error("{0}")]
    NotFound(String),

    /// The identifier or name is already taken.
    #[error("{0}")]
    Conflict(String),

    /// An identifier string is not a UUID.
    #[error("Malformed identifier: '{0}' is not a valid UUID")]
    MalformedIdentifier(String),

    /// A request body could not be parsed at all.
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    /// The requested page lies beyond the last page of a non-empty listing.
    #[error("Page limit exceeded: requested page {page}, total pages {total_pages}")]
    PageOutOfRange { page: u32, total_pages: u64 },

    /// Infrastructure failure (backend unreachable, corrupt record, etc.).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Result code reported in the failure envelope.
    pub const fn code(&self) -> ResponseCode {
        match self {
            Self::Validation(_) => ResponseCode::ValidationError,
            Self::NotFound(_) | Self::PageOutOfRange { .. } => ResponseCode::NotFound,
            Self::Conflict(_) => ResponseCode::Conflict,
            Self::MalformedIdentifier(_) | Self::MalformedRequest(_) => ResponseCode::BadRequest,
            Self::Internal(_) => ResponseCode::InternalError,
        }
    }
}

impl From<RepositoryError> for CoreError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(msg) => Self::NotFound(msg),
            RepositoryError::AlreadyExists(msg) => Self::Conflict(msg),
            other => Self::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{FieldViolation, ViolationReason};

    #[test]
    fn test_repository_errors_map_to_codes() {
        let not_found: CoreError = RepositoryError::NotFound("System with ID x".into()).into();
        assert_eq!(not_found.code(), ResponseCode::NotFound);

        let conflict: CoreError = RepositoryError::AlreadyExists("dup".into()).into();
        assert_eq!(conflict.code(), ResponseCode::Conflict);

        let storage: CoreError = RepositoryError::Storage("connection refused".into()).into();
        assert_eq!(storage.code(), ResponseCode::InternalError);
        assert!(storage.to_string().contains("connection refused"));
    }

    #[test]
    fn test_caller_errors_map_to_codes() {
        let validation = CoreError::from(ValidationError::new(vec![FieldViolation::new(
            "name",
            ViolationReason::Required,
        )]));
        assert_eq!(validation.code(), ResponseCode::ValidationError);
        assert_eq!(
            CoreError::MalformedIdentifier("abc".into()).code(),
            ResponseCode::BadRequest
        );
        assert_eq!(
            CoreError::PageOutOfRange {
                page: 4,
                total_pages: 2
            }
            .code(),
            ResponseCode::NotFound
        );
    }
}
