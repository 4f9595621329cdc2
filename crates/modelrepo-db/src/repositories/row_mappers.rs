//! Row mapping helpers for `SQLite` queries.

use chrono::{DateTime, NaiveDateTime, Utc};
use modelrepo_core::{GeoPoint, Location, RepositoryError, System};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use uuid::Uuid;

/// Shared SELECT column list for system queries.
pub const SYSTEM_SELECT_COLUMNS: &str = "id, name, description, organization, has_location, location_name, location_address, latitude, longitude, location_virtual, created_at, modified_at";

/// Fixed-width UTC format, so text order equals chronological order.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, RepositoryError> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .map(|dt| DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc))
        .map_err(|e| RepositoryError::Serialization(format!("Invalid timestamp '{raw}': {e}")))
}

/// A `Location` flattened into its table columns.
#[derive(Debug, Default, PartialEq)]
pub struct LocationColumns {
    pub has_location: bool,
    pub name: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub virtual_location: Option<String>,
}

impl LocationColumns {
    pub fn from_location(location: Option<&Location>) -> Self {
        location.map_or_else(Self::default, |location| Self {
            has_location: true,
            name: location.name.clone(),
            address: location.address.clone(),
            latitude: location.geo.map(|g| g.latitude),
            longitude: location.geo.map(|g| g.longitude),
            virtual_location: location.virtual_location.clone(),
        })
    }

    /// Rebuild the embedded value. A row holding only one coordinate is
    /// corrupt.
    pub fn into_location(self) -> Result<Option<Location>, RepositoryError> {
        if !self.has_location {
            return Ok(None);
        }
        let geo = match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(GeoPoint::new(latitude, longitude)),
            (None, None) => None,
            _ => {
                return Err(RepositoryError::Serialization(
                    "Corrupt row: only one coordinate is set".to_string(),
                ));
            }
        };
        Ok(Some(Location {
            name: self.name,
            address: self.address,
            geo,
            virtual_location: self.virtual_location,
        }))
    }
}

fn column<'r, T>(row: &'r SqliteRow, name: &str) -> Result<T, RepositoryError>
where
    T: sqlx::Decode<'r, sqlx::Sqlite> + sqlx::Type<sqlx::Sqlite>,
{
    row.try_get(name)
        .map_err(|e| RepositoryError::Storage(e.to_string()))
}

/// Parse a database row into a System.
pub fn row_to_system(row: &SqliteRow) -> Result<System, RepositoryError> {
    let raw_id: String = column(row, "id")?;
    let id = Uuid::try_parse(&raw_id)
        .map_err(|e| RepositoryError::Serialization(format!("Invalid id '{raw_id}': {e}")))?;

    let location = LocationColumns {
        has_location: column(row, "has_location")?,
        name: column(row, "location_name")?,
        address: column(row, "location_address")?,
        latitude: column(row, "latitude")?,
        longitude: column(row, "longitude")?,
        virtual_location: column(row, "location_virtual")?,
    }
    .into_location()?;

    let created_at: String = column(row, "created_at")?;
    let modified_at: String = column(row, "modified_at")?;

    Ok(System {
        id,
        name: column(row, "name")?,
        description: column(row, "description")?,
        organization: column(row, "organization")?,
        location,
        created_at: parse_timestamp(&created_at)?,
        modified_at: parse_timestamp(&modified_at)?,
    })
}
