//! System data-access contract.
//!
//! This port defines the interface every persistence backend implements.
//! Implementations must handle all storage details internally.

use async_trait::async_trait;
use uuid::Uuid;

use super::RepositoryError;
use crate::domain::{NewSystem, Page, PageRequest, System, SystemUpdate};

/// Data-access contract for systems.
///
/// Both the document and the relational backend implement this trait with
/// observably identical results for identical calls.
///
/// # Design Rules
///
/// - No driver types in signatures
/// - No validation: inputs have already passed the validator
/// - Timestamps are stamped by the implementation, never by the caller
/// - Default ordering is `id` ascending; explicit sorts tie-break on `id`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SystemDao: Send + Sync {
    /// Persist a new system.
    ///
    /// Generates an identifier when `system.id` is `None`. Returns
    /// `Err(RepositoryError::AlreadyExists)` if the identifier or the name is
    /// already taken; the existing record is never overwritten.
    async fn create(&self, system: &NewSystem) -> Result<System, RepositoryError>;

    /// Get a system by its identifier.
    ///
    /// Returns `Err(RepositoryError::NotFound)` if the system doesn't exist.
    async fn find_by_id(&self, id: Uuid) -> Result<System, RepositoryError>;

    /// Get a system by its unique name.
    ///
    /// Returns `Err(RepositoryError::NotFound)` if no system has that name.
    async fn find_by_name(&self, name: &str) -> Result<System, RepositoryError>;

    /// List one page of systems together with the total count.
    async fn find_all(&self, request: &PageRequest) -> Result<Page<System>, RepositoryError>;

    /// Replace the mutable fields of an existing system.
    ///
    /// Keeps `id` and `created_at`, refreshes `modified_at` to a value
    /// strictly greater than the previous one. Returns
    /// `Err(RepositoryError::NotFound)` if the system doesn't exist and
    /// `Err(RepositoryError::AlreadyExists)` if the new name is taken.
    async fn update(&self, id: Uuid, update: &SystemUpdate) -> Result<System, RepositoryError>;

    /// Delete a system by its identifier.
    ///
    /// Returns `Err(RepositoryError::NotFound)` if the system doesn't exist.
    async fn delete_by_id(&self, id: Uuid) -> Result<(), RepositoryError>;

    /// Delete every system, returning how many were removed.
    async fn delete_all(&self) -> Result<u64, RepositoryError>;
}
