//! System domain types.
//!
//! These types represent deployed computational systems, independent of
//! any infrastructure concerns (database, wire format, etc.).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::location::Location;

// ─────────────────────────────────────────────────────────────────────────────
// Persisted System
// ─────────────────────────────────────────────────────────────────────────────

/// A system that exists in a backend.
///
/// Only a `SystemDao` produces values of this type. Use `NewSystem` for
/// systems that haven't been persisted yet and `SystemUpdate` to replace
/// the mutable part of an existing one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct System {
    /// Stable external reference, immutable once assigned.
    pub id: Uuid,
    /// Unique, non-blank name.
    pub name: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Organization operating the system.
    pub organization: Option<String>,
    /// Where the system is deployed.
    pub location: Option<Location>,
    /// UTC timestamp of creation, set once by the backend.
    pub created_at: DateTime<Utc>,
    /// UTC timestamp of the last mutation, refreshed by the backend.
    pub modified_at: DateTime<Utc>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Inputs
// ─────────────────────────────────────────────────────────────────────────────

/// A system to be inserted (no timestamps yet, identifier optional).
///
/// When `id` is `None` the backend generates one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSystem {
    /// Caller-supplied identifier, if any.
    pub id: Option<Uuid>,
    /// Unique, non-blank name.
    pub name: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Organization operating the system.
    pub organization: Option<String>,
    /// Where the system is deployed.
    pub location: Option<Location>,
}

impl NewSystem {
    /// Create a new system with just a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: None,
            organization: None,
            location: None,
        }
    }

    /// Request a specific identifier instead of a generated one.
    #[must_use]
    pub const fn with_id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    /// Attach a description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attach the operating organization.
    #[must_use]
    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    /// Attach a location.
    #[must_use]
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }
}

/// Replacement values for the mutable fields of an existing system.
///
/// The identifier and creation timestamp are deliberately absent: they
/// cannot be changed through an update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemUpdate {
    pub name: String,
    pub description: Option<String>,
    pub organization: Option<String>,
    pub location: Option<Location>,
}

impl From<&System> for SystemUpdate {
    fn from(system: &System) -> Self {
        Self {
            name: system.name.clone(),
            description: system.description.clone(),
            organization: system.organization.clone(),
            location: system.location.clone(),
        }
    }
}

impl From<NewSystem> for SystemUpdate {
    fn from(system: NewSystem) -> Self {
        Self {
            name: system.name,
            description: system.description,
            organization: system.organization,
            location: system.location,
        }
    }
}
