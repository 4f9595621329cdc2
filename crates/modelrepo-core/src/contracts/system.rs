//! System request and response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Deserialize a field that distinguishes "absent" from an explicit `null`.
///
/// Paired with `#[serde(default)]`: absent is `None`, `null` is
/// `Some(None)` and a value is `Some(Some(value))`.
#[allow(clippy::option_option)]
fn explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// ─────────────────────────────────────────────────────────────────────────────
// Requests
// ─────────────────────────────────────────────────────────────────────────────

/// Coordinates as received from a caller.
///
/// Both values are optional here so that a half-specified pair reaches the
/// validator instead of failing deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoRequestDto {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Location as received from a caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationRequestDto {
    pub name: Option<String>,
    pub address: Option<String>,
    pub geo: Option<GeoRequestDto>,
    /// Non-physical placement; mutually exclusive with `geo`.
    pub virtual_location: Option<String>,
}

/// Body of a create or full-replace request.
///
/// `id` is optional on create (the backend generates one) and, when present
/// on update, must match the system being updated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemRequestDto {
    pub id: Option<String>,
    /// Missing names deserialize as empty and are rejected by validation.
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
    pub organization: Option<String>,
    pub location: Option<LocationRequestDto>,
}

/// Body of a partial update.
///
/// Absent fields keep their stored values. An explicit `null` clears an
/// optional field; `name` cannot be cleared.
#[allow(clippy::option_option)]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemPatchDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        default,
        deserialize_with = "explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub organization: Option<Option<String>>,
    /// Replaces the stored location as a whole.
    #[serde(
        default,
        deserialize_with = "explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub location: Option<Option<LocationRequestDto>>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Responses
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoResponseDto {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationResponseDto {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub geo: Option<GeoResponseDto>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub virtual_location: Option<String>,
}

/// A persisted system as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemResponseDto {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub organization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub location: Option<LocationResponseDto>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_request_deserializes_from_camel_case_json() {
        let json = r#"{
            "name": "Weather Station A",
            "location": { "name": "Athens HQ", "geo": { "latitude": 37.98, "longitude": 23.72 } }
        }"#;
        let dto: SystemRequestDto = serde_json::from_str(json).unwrap();

        assert_eq!(dto.id, None);
        assert_eq!(dto.name, "Weather Station A");
        assert_eq!(dto.description, None);
        let location = dto.location.unwrap();
        assert_eq!(location.name.as_deref(), Some("Athens HQ"));
        assert_eq!(location.address, None);
        assert_eq!(
            location.geo,
            Some(GeoRequestDto {
                latitude: Some(37.98),
                longitude: Some(23.72)
            })
        );
    }

    #[test]
    fn test_missing_name_deserializes_as_empty() {
        let dto: SystemRequestDto = serde_json::from_str(r#"{"description": "x"}"#).unwrap();
        assert!(dto.name.is_empty());
    }

    #[test]
    fn test_half_coordinates_survive_deserialization() {
        let dto: GeoRequestDto = serde_json::from_str(r#"{"latitude": 12.5}"#).unwrap();
        assert_eq!(dto.latitude, Some(12.5));
        assert_eq!(dto.longitude, None);
    }

    #[test]
    fn test_response_omits_unset_optionals() {
        let dto = SystemResponseDto {
            id: Uuid::nil(),
            name: "Gateway".into(),
            description: None,
            organization: None,
            location: None,
            created_at: Utc.timestamp_opt(0, 0).unwrap(),
            modified_at: Utc.timestamp_opt(0, 0).unwrap(),
        };
        let json = serde_json::to_value(&dto).unwrap();

        assert_eq!(json["id"], "00000000-0000-0000-0000-000000000000");
        assert!(json.get("description").is_none());
        assert!(json.get("organization").is_none());
        assert!(json.get("location").is_none());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("modifiedAt").is_some());
    }

    #[test]
    fn test_virtual_location_uses_camel_case() {
        let dto: LocationRequestDto =
            serde_json::from_str(r#"{"virtualLocation": "eu-west-1"}"#).unwrap();
        assert_eq!(dto.virtual_location.as_deref(), Some("eu-west-1"));
        assert_eq!(dto.geo, None);
    }

    #[test]
    fn test_patch_distinguishes_null_from_absent() {
        let patch: SystemPatchDto =
            serde_json::from_str(r#"{"description": null, "organization": "Acme"}"#).unwrap();
        assert_eq!(patch.name, None);
        assert_eq!(patch.description, Some(None));
        assert_eq!(patch.organization, Some(Some("Acme".to_string())));
        assert_eq!(patch.location, None);

        let patch: SystemPatchDto = serde_json::from_str(r#"{"location": null}"#).unwrap();
        assert_eq!(patch.location, Some(None));
        assert_eq!(patch.description, None);
    }
}
