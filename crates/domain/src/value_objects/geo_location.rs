//! WGS84 position value object

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::DomainError;

/// Mean Earth radius used for great-circle distances
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// A geographic position in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    latitude: f64,
    longitude: f64,
}

impl GeoLocation {
    /// Create a position, checking the coordinate ranges
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCoordinates` if latitude is not in
    /// [-90, 90] or longitude is not in [-180, 180]
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, DomainError> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(DomainError::InvalidCoordinates {
                latitude,
                longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Create a position from coordinates a server has already vouched for
    #[must_use]
    pub const fn new_unchecked(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Great-circle distance in meters (haversine)
    #[must_use]
    pub fn distance_meters(&self, other: &Self) -> f64 {
        let (phi_from, phi_to) = (self.latitude.to_radians(), other.latitude.to_radians());
        let half_dphi = (phi_to - phi_from) / 2.0;
        let half_dlambda = (other.longitude - self.longitude).to_radians() / 2.0;

        // Clamped: rounding can push h slightly above 1 for antipodal points.
        let h = (phi_from.cos() * phi_to.cos())
            .mul_add(half_dlambda.sin().powi(2), half_dphi.sin().powi(2))
            .min(1.0);

        2.0 * EARTH_RADIUS_METERS * h.sqrt().asin()
    }
}

impl fmt::Display for GeoLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_coordinates() {
        let loc = GeoLocation::new(46.948_9, 7.439_1).unwrap();
        assert!((loc.latitude() - 46.948_9).abs() < f64::EPSILON);
        assert!((loc.longitude() - 7.439_1).abs() < f64::EPSILON);
    }

    #[test]
    fn accepts_boundaries() {
        assert!(GeoLocation::new(90.0, 180.0).is_ok());
        assert!(GeoLocation::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(matches!(
            GeoLocation::new(91.0, 0.0),
            Err(DomainError::InvalidCoordinates { .. })
        ));
        assert!(GeoLocation::new(0.0, -181.0).is_err());
    }

    #[test]
    fn bern_to_zurich() {
        let bern = GeoLocation::new_unchecked(46.948_9, 7.439_1);
        let zurich = GeoLocation::new_unchecked(47.378_2, 8.540_2);
        let km = bern.distance_meters(&zurich) / 1000.0;
        assert!((95.0..97.0).contains(&km), "got {km}");
    }

    #[test]
    fn display_uses_six_decimals() {
        let loc = GeoLocation::new_unchecked(46.5, 7.25);
        assert_eq!(loc.to_string(), "46.500000, 7.250000");
    }

    #[test]
    fn serde_roundtrip() {
        let loc = GeoLocation::new_unchecked(46.5, 7.25);
        let json = serde_json::to_string(&loc).unwrap();
        let parsed: GeoLocation = serde_json::from_str(&json).unwrap();
        assert_eq!(loc, parsed);
    }
}
