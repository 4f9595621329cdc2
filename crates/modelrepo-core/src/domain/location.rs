//! Location value types.
//!
//! A `Location` has no identity of its own; it is always embedded in the
//! `System` that owns it.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// A pair of geographic coordinates in decimal degrees.
///
/// Both coordinates are always present: a half-specified pair cannot be
/// represented past the validation boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude, within `[-90, 90]`.
    pub latitude: f64,
    /// Longitude, within `[-180, 180]`.
    pub longitude: f64,
}

impl GeoPoint {
    /// Valid latitude range in degrees.
    pub const LATITUDE_RANGE: RangeInclusive<f64> = -90.0..=90.0;

    /// Valid longitude range in degrees.
    pub const LONGITUDE_RANGE: RangeInclusive<f64> = -180.0..=180.0;

    /// Create a new coordinate pair.
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Whether both coordinates are finite and within range.
    pub fn is_valid(&self) -> bool {
        Self::latitude_in_range(self.latitude) && Self::longitude_in_range(self.longitude)
    }

    /// Whether a latitude value is finite and within `[-90, 90]`.
    pub fn latitude_in_range(latitude: f64) -> bool {
        latitude.is_finite() && Self::LATITUDE_RANGE.contains(&latitude)
    }

    /// Whether a longitude value is finite and within `[-180, 180]`.
    pub fn longitude_in_range(longitude: f64) -> bool {
        longitude.is_finite() && Self::LONGITUDE_RANGE.contains(&longitude)
    }
}

/// Where a system is deployed.
///
/// Every part is optional; an empty `Location` is distinct from no location
/// at all and both backends preserve that distinction. A location is either
/// physical (`geo`) or virtual (`virtual_location`), never both.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Human-readable site name (e.g. "Athens HQ").
    pub name: Option<String>,
    /// Postal address of the site.
    pub address: Option<String>,
    /// Geographic coordinates of the site.
    pub geo: Option<GeoPoint>,
    /// Non-physical placement such as a cloud region or a URL.
    pub virtual_location: Option<String>,
}

impl Location {
    /// Create a location with only a site name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Attach an address.
    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Attach geographic coordinates.
    #[must_use]
    pub const fn with_geo(mut self, geo: GeoPoint) -> Self {
        self.geo = Some(geo);
        self
    }

    /// Attach a virtual placement.
    #[must_use]
    pub fn with_virtual_location(mut self, virtual_location: impl Into<String>) -> Self {
        self.virtual_location = Some(virtual_location.into());
        self
    }
}
