//! Storage adapters for modelrepo.
//!
//! Two independent implementations of `modelrepo_core::SystemDao`:
//!
//! - `SqliteSystemDao` - relational backend on `sqlx` `SQLite`
//! - `MongoSystemDao` - document backend on the `mongodb` driver
//!
//! `PersistenceFacade` opens whichever one the configuration selects.
//! Driver types never leave this crate.

#![deny(unsafe_code)]

#[cfg(any(test, feature = "test-utils"))]
pub mod conformance;
pub mod facade;
pub mod repositories;
pub mod setup;

// Re-export facade for convenient access
pub use facade::PersistenceFacade;

// Re-export TestDb for integration tests
#[cfg(any(test, feature = "test-utils"))]
pub use facade::TestDb;

// Re-export repository implementations
pub use repositories::{MongoSystemDao, SqliteSystemDao};

// Re-export setup functions for convenient access
pub use setup::setup_database;
#[cfg(any(test, feature = "test-utils"))]
pub use setup::setup_test_database;
