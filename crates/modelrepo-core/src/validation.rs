//! Pre-persistence validation of inbound requests.
//!
//! Validation runs before any conversion or storage call and behaves the
//! same whichever backend is active. Violations are returned as values:
//! every rule is checked and all failures are reported together, each with
//! the dotted path of the offending field and a machine-readable reason.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

use crate::contracts::{GeoRequestDto, LocationRequestDto, SystemPatchDto, SystemRequestDto};
use crate::domain::GeoPoint;

/// Maximum length of a system name, in characters.
pub const MAX_NAME_LEN: usize = 255;

/// Maximum length of a system description, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 4096;

/// Maximum length of an organization name, in characters.
pub const MAX_ORGANIZATION_LEN: usize = 255;

/// Maximum length of a location name, address or virtual location, in characters.
pub const MAX_LOCATION_FIELD_LEN: usize = 255;

/// Why a field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationReason {
    /// A mandatory field is missing or blank.
    Required,
    /// An optional text field was supplied but contains only whitespace.
    Blank,
    /// A text field exceeds its maximum length.
    TooLong,
    /// A coordinate is outside its range or not a finite number.
    OutOfRange,
    /// Only one of latitude/longitude was supplied.
    IncompleteCoordinates,
    /// A location carries both coordinates and a virtual location.
    ConflictingLocation,
    /// A caller-supplied identifier is not a UUID.
    InvalidIdentifier,
    /// The identifier in the body differs from the one being updated.
    IdentifierMismatch,
}

impl ViolationReason {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Required => "REQUIRED",
            Self::Blank => "BLANK",
            Self::TooLong => "TOO_LONG",
            Self::OutOfRange => "OUT_OF_RANGE",
            Self::IncompleteCoordinates => "INCOMPLETE_COORDINATES",
            Self::ConflictingLocation => "CONFLICTING_LOCATION",
            Self::InvalidIdentifier => "INVALID_IDENTIFIER",
            Self::IdentifierMismatch => "IDENTIFIER_MISMATCH",
        }
    }
}

impl fmt::Display for ViolationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    /// Dotted path of the field, e.g. `location.geo.latitude`.
    pub field: String,
    pub reason: ViolationReason,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, reason: ViolationReason) -> Self {
        Self {
            field: field.into(),
            reason,
        }
    }
}

/// Every violation found in one request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Validation failed: {}", summarize(.violations))]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    pub const fn new(violations: Vec<FieldViolation>) -> Self {
        Self { violations }
    }

    /// Whether `field` was rejected for `reason`.
    pub fn contains(&self, field: &str, reason: ViolationReason) -> bool {
        self.violations
            .iter()
            .any(|v| v.field == field && v.reason == reason)
    }
}

fn summarize(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("{} ({})", v.field, v.reason))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Accumulates violations under a field-path prefix.
#[derive(Debug, Default)]
pub struct Violations {
    items: Vec<FieldViolation>,
}

impl Violations {
    pub fn push(&mut self, field: impl Into<String>, reason: ViolationReason) {
        self.items.push(FieldViolation::new(field, reason));
    }

    /// Finish collecting: `Ok` when nothing was rejected.
    pub fn into_result(self) -> Result<(), ValidationError> {
        if self.items.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(self.items))
        }
    }
}

/// Validation rules for a wire type.
pub trait Validate {
    /// Record every violation of `self` under the `path` prefix.
    fn collect_violations(&self, path: &str, violations: &mut Violations);

    /// Validate `self` as a top-level request.
    fn validate(&self) -> Result<(), ValidationError> {
        let mut violations = Violations::default();
        self.collect_violations("", &mut violations);
        violations.into_result()
    }
}

fn join(path: &str, field: &str) -> String {
    if path.is_empty() {
        field.to_string()
    } else {
        format!("{path}.{field}")
    }
}

/// Parse a UUID, rejecting anything else.
pub fn parse_identifier(raw: &str) -> Option<Uuid> {
    Uuid::try_parse(raw.trim()).ok()
}

fn check_required_text(value: &str, max: usize, field: String, violations: &mut Violations) {
    if value.trim().is_empty() {
        violations.push(field, ViolationReason::Required);
    } else if value.chars().count() > max {
        violations.push(field, ViolationReason::TooLong);
    }
}

fn check_optional_text(value: Option<&str>, max: usize, field: String, violations: &mut Violations) {
    match value {
        Some(v) if v.trim().is_empty() => violations.push(field, ViolationReason::Blank),
        Some(v) if v.chars().count() > max => violations.push(field, ViolationReason::TooLong),
        _ => {}
    }
}

impl Validate for GeoRequestDto {
    fn collect_violations(&self, path: &str, violations: &mut Violations) {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => {
                if !GeoPoint::latitude_in_range(latitude) {
                    violations.push(join(path, "latitude"), ViolationReason::OutOfRange);
                }
                if !GeoPoint::longitude_in_range(longitude) {
                    violations.push(join(path, "longitude"), ViolationReason::OutOfRange);
                }
            }
            (Some(_), None) => {
                violations.push(join(path, "longitude"), ViolationReason::IncompleteCoordinates);
            }
            (None, Some(_)) => {
                violations.push(join(path, "latitude"), ViolationReason::IncompleteCoordinates);
            }
            (None, None) => {}
        }
    }
}

impl Validate for LocationRequestDto {
    fn collect_violations(&self, path: &str, violations: &mut Violations) {
        check_optional_text(
            self.name.as_deref(),
            MAX_LOCATION_FIELD_LEN,
            join(path, "name"),
            violations,
        );
        check_optional_text(
            self.address.as_deref(),
            MAX_LOCATION_FIELD_LEN,
            join(path, "address"),
            violations,
        );
        check_optional_text(
            self.virtual_location.as_deref(),
            MAX_LOCATION_FIELD_LEN,
            join(path, "virtualLocation"),
            violations,
        );
        if let Some(geo) = &self.geo {
            geo.collect_violations(&join(path, "geo"), violations);
        }

        // Physical or virtual, never both.
        let has_coordinates = self
            .geo
            .as_ref()
            .is_some_and(|g| g.latitude.is_some() || g.longitude.is_some());
        let has_virtual = self
            .virtual_location
            .as_deref()
            .is_some_and(|v| !v.trim().is_empty());
        if has_coordinates && has_virtual {
            violations.push(
                join(path, "virtualLocation"),
                ViolationReason::ConflictingLocation,
            );
        }
    }
}

impl Validate for SystemRequestDto {
    fn collect_violations(&self, path: &str, violations: &mut Violations) {
        if let Some(id) = &self.id {
            if parse_identifier(id).is_none() {
                violations.push(join(path, "id"), ViolationReason::InvalidIdentifier);
            }
        }
        check_required_text(&self.name, MAX_NAME_LEN, join(path, "name"), violations);
        check_optional_text(
            self.description.as_deref(),
            MAX_DESCRIPTION_LEN,
            join(path, "description"),
            violations,
        );
        check_optional_text(
            self.organization.as_deref(),
            MAX_ORGANIZATION_LEN,
            join(path, "organization"),
            violations,
        );
        if let Some(location) = &self.location {
            location.collect_violations(&join(path, "location"), violations);
        }
    }
}

impl Validate for SystemPatchDto {
    fn collect_violations(&self, path: &str, violations: &mut Violations) {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                violations.push(join(path, "name"), ViolationReason::Blank);
            } else if name.chars().count() > MAX_NAME_LEN {
                violations.push(join(path, "name"), ViolationReason::TooLong);
            }
        }
        check_optional_text(
            self.description.as_ref().and_then(|d| d.as_deref()),
            MAX_DESCRIPTION_LEN,
            join(path, "description"),
            violations,
        );
        check_optional_text(
            self.organization.as_ref().and_then(|o| o.as_deref()),
            MAX_ORGANIZATION_LEN,
            join(path, "organization"),
            violations,
        );
        if let Some(Some(location)) = &self.location {
            location.collect_violations(&join(path, "location"), violations);
        }
    }
}

/// Validate a full-replacement request targeting `target`.
///
/// Applies the regular request rules and additionally rejects a body
/// identifier that names a different system.
pub fn validate_update(request: &SystemRequestDto, target: Uuid) -> Result<(), ValidationError> {
    let mut violations = Violations::default();
    request.collect_violations("", &mut violations);
    if let Some(body_id) = request.id.as_deref().and_then(parse_identifier) {
        if body_id != target {
            violations.push("id", ViolationReason::IdentifierMismatch);
        }
    }
    violations.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str) -> SystemRequestDto {
        SystemRequestDto {
            name: name.to_string(),
            ..SystemRequestDto::default()
        }
    }

    fn geo(latitude: Option<f64>, longitude: Option<f64>) -> LocationRequestDto {
        LocationRequestDto {
            geo: Some(GeoRequestDto {
                latitude,
                longitude,
            }),
            ..LocationRequestDto::default()
        }
    }

    #[test]
    fn test_valid_request_passes() {
        let mut dto = request("Weather Station A");
        dto.location = Some(LocationRequestDto {
            name: Some("Athens HQ".into()),
            address: None,
            geo: Some(GeoRequestDto {
                latitude: Some(37.98),
                longitude: Some(23.72),
            }),
            virtual_location: None,
        });
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_blank_name_is_required() {
        let err = request("   ").validate().unwrap_err();
        assert!(err.contains("name", ViolationReason::Required));
        assert_eq!(err.violations.len(), 1);
    }

    #[test]
    fn test_half_specified_coordinates_are_rejected() {
        let mut dto = request("Probe");
        dto.location = Some(geo(Some(37.98), None));
        let err = dto.validate().unwrap_err();
        assert!(err.contains(
            "location.geo.longitude",
            ViolationReason::IncompleteCoordinates
        ));

        dto.location = Some(geo(None, Some(23.72)));
        let err = dto.validate().unwrap_err();
        assert!(err.contains(
            "location.geo.latitude",
            ViolationReason::IncompleteCoordinates
        ));
    }

    #[test]
    fn test_empty_geo_object_is_accepted() {
        let mut dto = request("Probe");
        dto.location = Some(geo(None, None));
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_location_is_physical_or_virtual() {
        let mut dto = request("Probe");
        let mut location = geo(Some(37.98), Some(23.72));
        location.virtual_location = Some("eu-west-1".into());
        dto.location = Some(location);
        let err = dto.validate().unwrap_err();
        assert!(err.contains(
            "location.virtualLocation",
            ViolationReason::ConflictingLocation
        ));
        assert_eq!(err.violations.len(), 1);

        dto.location = Some(LocationRequestDto {
            virtual_location: Some("eu-west-1".into()),
            ..LocationRequestDto::default()
        });
        assert!(dto.validate().is_ok());

        let mut location = geo(None, None);
        location.virtual_location = Some("eu-west-1".into());
        dto.location = Some(location);
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_blank_virtual_location_is_rejected() {
        let mut dto = request("Probe");
        dto.location = Some(LocationRequestDto {
            virtual_location: Some("   ".into()),
            ..LocationRequestDto::default()
        });
        let err = dto.validate().unwrap_err();
        assert!(err.contains("location.virtualLocation", ViolationReason::Blank));
    }

    #[test]
    fn test_out_of_range_coordinates() {
        let mut dto = request("Probe");
        dto.location = Some(geo(Some(91.0), Some(-181.0)));
        let err = dto.validate().unwrap_err();
        assert!(err.contains("location.geo.latitude", ViolationReason::OutOfRange));
        assert!(err.contains("location.geo.longitude", ViolationReason::OutOfRange));

        dto.location = Some(geo(Some(f64::NAN), Some(0.0)));
        let err = dto.validate().unwrap_err();
        assert!(err.contains("location.geo.latitude", ViolationReason::OutOfRange));
    }

    #[test]
    fn test_all_violations_are_collected() {
        let dto = SystemRequestDto {
            id: Some("not-a-uuid".into()),
            name: String::new(),
            description: Some("  ".into()),
            organization: Some("o".repeat(MAX_ORGANIZATION_LEN + 1)),
            location: Some(LocationRequestDto {
                name: Some("x".repeat(MAX_LOCATION_FIELD_LEN + 1)),
                address: None,
                geo: Some(GeoRequestDto {
                    latitude: Some(0.0),
                    longitude: None,
                }),
                virtual_location: None,
            }),
        };
        let err = dto.validate().unwrap_err();
        assert!(err.contains("id", ViolationReason::InvalidIdentifier));
        assert!(err.contains("name", ViolationReason::Required));
        assert!(err.contains("description", ViolationReason::Blank));
        assert!(err.contains("organization", ViolationReason::TooLong));
        assert!(err.contains("location.name", ViolationReason::TooLong));
        assert!(err.contains(
            "location.geo.longitude",
            ViolationReason::IncompleteCoordinates
        ));
        assert_eq!(err.violations.len(), 6);
    }

    #[test]
    fn test_caller_supplied_uuid_is_accepted() {
        let mut dto = request("Probe");
        dto.id = Some(Uuid::new_v4().to_string());
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_update_rejects_mismatched_identifier() {
        let target = Uuid::new_v4();
        let mut dto = request("Probe");
        dto.id = Some(Uuid::new_v4().to_string());
        let err = validate_update(&dto, target).unwrap_err();
        assert!(err.contains("id", ViolationReason::IdentifierMismatch));

        dto.id = Some(target.to_string());
        assert!(validate_update(&dto, target).is_ok());

        dto.id = None;
        assert!(validate_update(&dto, target).is_ok());
    }

    #[test]
    fn test_patch_rules() {
        let patch = SystemPatchDto {
            name: Some(String::new()),
            description: None,
            organization: Some(Some(" ".into())),
            location: Some(Some(geo(Some(10.0), None))),
        };
        let err = patch.validate().unwrap_err();
        assert!(err.contains("name", ViolationReason::Blank));
        assert!(err.contains("organization", ViolationReason::Blank));
        assert!(err.contains(
            "location.geo.longitude",
            ViolationReason::IncompleteCoordinates
        ));

        assert!(SystemPatchDto::default().validate().is_ok());

        let clearing = SystemPatchDto {
            description: Some(None),
            organization: Some(None),
            location: Some(None),
            ..SystemPatchDto::default()
        };
        assert!(clearing.validate().is_ok());
    }

    #[test]
    fn test_error_message_lists_fields() {
        let err = request("").validate().unwrap_err();
        assert_eq!(err.to_string(), "Validation failed: name (REQUIRED)");
    }

    #[test]
    fn test_parse_identifier() {
        let id = Uuid::new_v4();
        assert_eq!(parse_identifier(&id.to_string()), Some(id));
        assert_eq!(parse_identifier(&format!(" {id} ")), Some(id));
        assert_eq!(parse_identifier("1234"), None);
        assert_eq!(parse_identifier(""), None);
    }
}
