//! `SystemDao` implementations.
//!
//! These implementations encapsulate all queries and driver access. The
//! `SqlitePool` and the `mongodb` client are confined to this module and
//! never exposed through the port trait signatures.

mod mongo_system_dao;
mod row_mappers;
mod sqlite_system_dao;

pub use mongo_system_dao::{MongoSystemDao, SYSTEMS_COLLECTION};
pub use sqlite_system_dao::SqliteSystemDao;

use modelrepo_core::RepositoryError;
use uuid::Uuid;

/// Which unique key a rejected write collided on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UniqueKey {
    Id,
    Name,
}

/// The error both backends report for a uniqueness collision.
fn already_exists(key: UniqueKey, id: Uuid, name: &str) -> RepositoryError {
    match key {
        UniqueKey::Id => {
            RepositoryError::AlreadyExists(format!("System with ID {id} already exists"))
        }
        UniqueKey::Name => {
            RepositoryError::AlreadyExists(format!("System with name '{name}' already exists"))
        }
    }
}

fn not_found_id(id: Uuid) -> RepositoryError {
    RepositoryError::NotFound(format!("System with ID {id} not found"))
}

fn not_found_name(name: &str) -> RepositoryError {
    RepositoryError::NotFound(format!("System with name '{name}' not found"))
}
