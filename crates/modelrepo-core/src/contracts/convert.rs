//! Conversions between wire DTOs and domain entities.
//!
//! Pure structural mapping: no validation and no I/O. Requests are expected
//! to have passed `Validate` already; absent optionals always map to `None`.

use crate::domain::{GeoPoint, Location, NewSystem, System, SystemUpdate};
use crate::validation::parse_identifier;

use super::system::{
    GeoRequestDto, GeoResponseDto, LocationRequestDto, LocationResponseDto, SystemRequestDto,
    SystemResponseDto,
};

// ─────────────────────────────────────────────────────────────────────────────
// Request → Entity
// ─────────────────────────────────────────────────────────────────────────────

impl From<&GeoRequestDto> for Option<GeoPoint> {
    /// A point exists only when both coordinates were supplied.
    fn from(dto: &GeoRequestDto) -> Self {
        match (dto.latitude, dto.longitude) {
            (Some(latitude), Some(longitude)) => Some(GeoPoint::new(latitude, longitude)),
            _ => None,
        }
    }
}

impl From<LocationRequestDto> for Location {
    fn from(dto: LocationRequestDto) -> Self {
        Self {
            name: dto.name,
            address: dto.address,
            geo: dto.geo.as_ref().and_then(Option::<GeoPoint>::from),
            virtual_location: dto.virtual_location,
        }
    }
}

impl From<SystemRequestDto> for NewSystem {
    fn from(dto: SystemRequestDto) -> Self {
        Self {
            id: dto.id.as_deref().and_then(parse_identifier),
            name: dto.name.trim().to_string(),
            description: dto.description,
            organization: dto.organization,
            location: dto.location.map(Location::from),
        }
    }
}

impl From<SystemRequestDto> for SystemUpdate {
    fn from(dto: SystemRequestDto) -> Self {
        NewSystem::from(dto).into()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Entity → Response
// ─────────────────────────────────────────────────────────────────────────────

impl From<GeoPoint> for GeoResponseDto {
    fn from(point: GeoPoint) -> Self {
        Self {
            latitude: point.latitude,
            longitude: point.longitude,
        }
    }
}

impl From<Location> for LocationResponseDto {
    fn from(location: Location) -> Self {
        Self {
            name: location.name,
            address: location.address,
            geo: location.geo.map(GeoResponseDto::from),
            virtual_location: location.virtual_location,
        }
    }
}

impl From<System> for SystemResponseDto {
    fn from(system: System) -> Self {
        Self {
            id: system.id,
            name: system.name,
            description: system.description,
            organization: system.organization,
            location: system.location.map(LocationResponseDto::from),
            created_at: system.created_at,
            modified_at: system.modified_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn persist(new: NewSystem) -> System {
        let now = Utc::now();
        System {
            id: new.id.unwrap_or_else(Uuid::new_v4),
            name: new.name,
            description: new.description,
            organization: new.organization,
            location: new.location,
            created_at: now,
            modified_at: now,
        }
    }

    #[test]
    fn test_coordinates_survive_request_to_response() {
        let dto = SystemRequestDto {
            id: None,
            name: "Weather Station A".into(),
            description: None,
            organization: Some("Hellenic Met Service".into()),
            location: Some(LocationRequestDto {
                name: Some("Athens HQ".into()),
                address: Some("Patission 42".into()),
                geo: Some(GeoRequestDto {
                    latitude: Some(37.983_810_7),
                    longitude: Some(-23.727_539_4),
                }),
                virtual_location: None,
            }),
        };

        let response = SystemResponseDto::from(persist(NewSystem::from(dto)));
        let location = response.location.unwrap();
        let geo = location.geo.unwrap();

        assert_eq!(geo.latitude.to_bits(), 37.983_810_7_f64.to_bits());
        assert_eq!(geo.longitude.to_bits(), (-23.727_539_4_f64).to_bits());
        assert_eq!(location.name.as_deref(), Some("Athens HQ"));
        assert_eq!(location.address.as_deref(), Some("Patission 42"));
        assert_eq!(location.virtual_location, None);
        assert_eq!(response.organization.as_deref(), Some("Hellenic Met Service"));
    }

    #[test]
    fn test_virtual_location_survives_request_to_response() {
        let dto = SystemRequestDto {
            name: "Inference API".into(),
            location: Some(LocationRequestDto {
                virtual_location: Some("eu-west-1".into()),
                ..LocationRequestDto::default()
            }),
            ..SystemRequestDto::default()
        };

        let response = SystemResponseDto::from(persist(NewSystem::from(dto)));
        let location = response.location.unwrap();
        assert_eq!(location.virtual_location.as_deref(), Some("eu-west-1"));
        assert_eq!(location.geo, None);
    }

    #[test]
    fn test_absent_optionals_stay_absent() {
        let dto = SystemRequestDto {
            name: "Gateway".into(),
            location: Some(LocationRequestDto::default()),
            ..SystemRequestDto::default()
        };

        let new = NewSystem::from(dto);
        assert_eq!(new.id, None);
        assert_eq!(new.description, None);
        assert_eq!(new.organization, None);
        assert_eq!(new.location, Some(Location::default()));

        let response = SystemResponseDto::from(persist(new));
        let location = response.location.unwrap();
        assert_eq!(location.name, None);
        assert_eq!(location.address, None);
        assert_eq!(location.geo, None);
    }

    #[test]
    fn test_missing_location_is_not_an_empty_location() {
        let new = NewSystem::from(SystemRequestDto {
            name: "Gateway".into(),
            ..SystemRequestDto::default()
        });
        assert_eq!(new.location, None);
    }

    #[test]
    fn test_zero_coordinates_are_real_values() {
        let geo = GeoRequestDto {
            latitude: Some(0.0),
            longitude: Some(0.0),
        };
        assert_eq!(Option::<GeoPoint>::from(&geo), Some(GeoPoint::new(0.0, 0.0)));
    }

    #[test]
    fn test_caller_identifier_is_carried() {
        let id = Uuid::new_v4();
        let new = NewSystem::from(SystemRequestDto {
            id: Some(id.to_string()),
            name: "  Padded  ".into(),
            ..SystemRequestDto::default()
        });
        assert_eq!(new.id, Some(id));
        assert_eq!(new.name, "Padded");
    }

    #[test]
    fn test_request_to_update_drops_identifier() {
        let update = SystemUpdate::from(SystemRequestDto {
            id: Some(Uuid::new_v4().to_string()),
            name: "Gateway".into(),
            description: Some("edge node".into()),
            organization: Some("Acme".into()),
            location: None,
        });
        assert_eq!(update.name, "Gateway");
        assert_eq!(update.description.as_deref(), Some("edge node"));
        assert_eq!(update.organization.as_deref(), Some("Acme"));
    }
}
