//! Coordinates - reverse lookup input

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ContractError;

/// Mean Earth radius in kilometers
const EARTH_RADIUS_KM: f64 = 6371.0;

/// WGS84 coordinate pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Create coordinates without range checks
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Create coordinates, rejecting non-finite or out-of-range values
    ///
    /// # Errors
    /// Returns `InvalidArgument` when latitude is outside [-90, 90] or
    /// longitude outside [-180, 180].
    pub fn try_new(latitude: f64, longitude: f64) -> Result<Self, ContractError> {
        let coordinates = Self::new(latitude, longitude);
        coordinates.validate()?;
        Ok(coordinates)
    }

    /// Check ranges
    pub fn validate(&self) -> Result<(), ContractError> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(ContractError::invalid_argument(format!(
                "latitude must be within [-90, 90], got {}",
                self.latitude
            )));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(ContractError::invalid_argument(format!(
                "longitude must be within [-180, 180], got {}",
                self.longitude
            )));
        }
        Ok(())
    }

    /// Great-circle distance in kilometers (haversine)
    pub fn distance_km(&self, other: &Coordinates) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let d_lat = lat2 - lat1;
        let d_lon = (other.longitude - self.longitude).to_radians();

        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_new_rejects_out_of_range() {
        assert!(Coordinates::try_new(48.85, 2.35).is_ok());
        assert!(Coordinates::try_new(91.0, 0.0).is_err());
        assert!(Coordinates::try_new(0.0, -180.5).is_err());
        assert!(Coordinates::try_new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_distance_paris_london() {
        let paris = Coordinates::new(48.8566, 2.3522);
        let london = Coordinates::new(51.5074, -0.1278);
        let d = paris.distance_km(&london);
        assert!((d - 343.5).abs() < 2.0, "got {d}");
        assert!(paris.distance_km(&paris) < 1e-9);
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_string(&Coordinates::new(1.5, -2.25)).unwrap();
        assert_eq!(json, r#"{"latitude":1.5,"longitude":-2.25}"#);
    }
}
