//! Observer Context Module
//!
//! Validates observer coordinates into an immutable query key and provides
//! the WGS84 geometry needed for apparent-horizon corrections.

use serde::Serialize;
use thiserror::Error;

// ===================== CONSTANTS =====================

/// WGS84 semi-major axis (equatorial radius) in meters
pub const A_EQUATOR: f64 = 6_378_137.0;

/// WGS84 semi-minor axis (polar radius) in meters
pub const B_POLAR: f64 = 6_356_752.314245;

// ===================== ERRORS =====================

/// Reasons an observer cannot be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ObserverError {
    #[error("latitude must be a finite number in [-90, 90], got {0}")]
    InvalidLatitude(f64),
    #[error("longitude must be a finite number, got {0}")]
    InvalidLongitude(f64),
    #[error("elevation must be a finite number of meters, got {0}")]
    InvalidElevation(f64),
}

// ===================== OBSERVER =====================

/// A validated observer location.
///
/// Fields are private so that every `Observer` in circulation has passed
/// validation; downstream samplers never need to re-check finiteness.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Observer {
    lat: f64,
    lon: f64,
    elevation_m: f64,
}

impl Observer {
    /// Validate raw coordinates into an observer.
    ///
    /// # Arguments
    /// * `lat` - Latitude in degrees (-90 to 90)
    /// * `lon` - Longitude in degrees (east positive)
    /// * `elevation_m` - Height above mean sea level in meters (may be negative)
    ///
    /// # Errors
    /// Returns [`ObserverError`] if any component is non-finite or the
    /// latitude lies outside [-90, 90].
    pub fn new(lat: f64, lon: f64, elevation_m: f64) -> Result<Self, ObserverError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(ObserverError::InvalidLatitude(lat));
        }
        if !lon.is_finite() {
            return Err(ObserverError::InvalidLongitude(lon));
        }
        if !elevation_m.is_finite() {
            return Err(ObserverError::InvalidElevation(elevation_m));
        }
        Ok(Self { lat, lon, elevation_m })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    pub fn elevation_m(&self) -> f64 {
        self.elevation_m
    }

    /// Key used by the yearly extremes cache: `"{year}-{lat:.4}-{lon:.4}"`.
    pub fn cache_key(&self, year: i32) -> String {
        format!("{}-{:.4}-{:.4}", year, self.lat, self.lon)
    }

    /// Earth radius under this observer (WGS84 ellipsoid), in meters.
    pub fn earth_radius_m(&self) -> f64 {
        let phi = self.lat.to_radians();
        let (sin, cos) = phi.sin_cos();
        let a2 = A_EQUATOR * A_EQUATOR;
        let b2 = B_POLAR * B_POLAR;
        let numerator = a2 * a2 * cos * cos + b2 * b2 * sin * sin;
        let denominator = (A_EQUATOR * cos).powi(2) + (B_POLAR * sin).powi(2);
        (numerator / denominator).sqrt()
    }

    /// Dip of the apparent horizon caused by the observer's elevation, in degrees.
    ///
    /// Positive above sea level, negative below it (Dead Sea shore).
    pub fn horizon_dip_deg(&self) -> f64 {
        let h = self.elevation_m;
        if h.abs() < 1e-5 {
            return 0.0;
        }
        let r = self.earth_radius_m();
        let dip = (r / (r + h.abs())).clamp(-1.0, 1.0).acos().to_degrees();
        if h > 0.0 { dip } else { -dip }
    }
}

// ===================== TESTS =====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_finite_coordinates() {
        assert!(matches!(Observer::new(f64::NAN, 0.0, 0.0), Err(ObserverError::InvalidLatitude(_))));
        assert!(matches!(Observer::new(10.0, f64::INFINITY, 0.0), Err(ObserverError::InvalidLongitude(_))));
        assert!(matches!(Observer::new(10.0, 20.0, f64::NAN), Err(ObserverError::InvalidElevation(_))));
        assert!(matches!(Observer::new(91.0, 20.0, 0.0), Err(ObserverError::InvalidLatitude(_))));
    }

    #[test]
    fn test_cache_key_uses_four_decimals() {
        let obs = Observer::new(31.78, 35.22, 750.0).unwrap();
        assert_eq!(obs.cache_key(2025), "2025-31.7800-35.2200");

        let obs = Observer::new(-33.868_82, 151.209_29, 0.0).unwrap();
        assert_eq!(obs.cache_key(2024), "2024--33.8688-151.2093");
    }

    #[test]
    fn test_earth_radius_reasonable() {
        let equator = Observer::new(0.0, 0.0, 0.0).unwrap().earth_radius_m();
        let pole = Observer::new(90.0, 0.0, 0.0).unwrap().earth_radius_m();

        assert!(equator > 6_370_000.0 && equator < 6_380_000.0);
        assert!(pole > 6_350_000.0 && pole < 6_360_000.0);
        assert!(equator > pole);
    }

    #[test]
    fn test_horizon_dip_sign_and_magnitude() {
        let sea = Observer::new(31.0, 35.4, 0.0).unwrap();
        let hill = Observer::new(31.0, 35.4, 1000.0).unwrap();
        let dead_sea = Observer::new(31.0, 35.4, -450.0).unwrap();

        assert!(sea.horizon_dip_deg().abs() < 1e-6);
        assert!(hill.horizon_dip_deg() > 0.5 && hill.horizon_dip_deg() < 1.2);
        assert!(dead_sea.horizon_dip_deg() < -0.4 && dead_sea.horizon_dip_deg() > -0.9);
    }
}
