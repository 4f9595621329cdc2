//! Core of the modelrepo metadata repository.
//!
//! This crate owns everything that must behave identically regardless of
//! which storage backend is active:
//!
//! - `domain` - the `System` entity and its embedded `Location` value
//! - `contracts` - wire DTOs, converters and the response `Envelope`
//! - `validation` - the pre-persistence validation gate
//! - `ports` - the `SystemDao` contract and the `Clock` port
//! - `services` - `SystemService`, the request orchestrator
//! - `config` - start-up configuration for backend selection
//!
//! Storage adapters live in `modelrepo-db`; nothing here depends on a
//! database driver.

pub mod config;
pub mod contracts;
pub mod domain;
pub mod ports;
pub mod services;
pub mod validation;

// Re-export commonly used types for convenience
pub use config::{BackendKind, ConfigError, MongoConfig, PersistenceConfig, SqliteConfig};
pub use contracts::{
    Envelope, GeoRequestDto, GeoResponseDto, LocationRequestDto, LocationResponseDto, Outcome,
    Pagination, ResponseCode, SystemPatchDto, SystemRequestDto, SystemResponseDto,
};
pub use domain::{
    GeoPoint, Location, NewSystem, Page, PageRequest, Sort, SortDirection, SortField, System,
    SystemUpdate,
};
pub use ports::{Clock, CoreError, RepositoryError, SystemClock, SystemDao};
pub use services::SystemService;
pub use validation::{FieldViolation, Validate, ValidationError, ViolationReason};
