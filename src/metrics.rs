//! Derived Metrics Module
//!
//! HUD values computed from live positions, the day path and the yearly
//! extremes. Every percentage is `None` rather than NaN/∞ when its range is
//! degenerate or an input is unavailable.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::extremes::{Extent, YearExtremes};
use crate::path::{PathPoint, altitude_range};

// ===================== CONSTANTS =====================

/// Solar constant (W/m²)
pub const SOLAR_CONSTANT: f64 = 1361.0;

/// Fraction of top-of-atmosphere irradiance assumed to reach the ground
pub const CLEAR_SKY_TRANSMITTANCE: f64 = 0.7;

/// Millions of km per astronomical unit
pub const AU_TO_MKM: f64 = 149.597_870_7;

/// Fixed lunar distance range used for the orbital percentage (km)
pub const MOON_PERIGEE_KM: f64 = 363_300.0;
pub const MOON_APOGEE_KM: f64 = 405_500.0;

pub const AIR_MASS_MAX: f64 = 38.0;

/// Sun altitude at which stars start to fade in
pub const STAR_FADE_START_DEG: f64 = -12.0;
/// Width of the star fade-in band below [`STAR_FADE_START_DEG`]
pub const STAR_FADE_SPAN_DEG: f64 = 6.0;

// ===================== NORMALIZATION =====================

/// Position of `value` within `[min, max]`, clamped to [0, 1].
///
/// # Returns
/// `None` if the range is empty or inverted, or any input is non-finite.
pub fn normalize(value: f64, min: f64, max: f64) -> Option<f64> {
    if !value.is_finite() || !min.is_finite() || !max.is_finite() {
        return None;
    }
    let range = max - min;
    if range <= 0.0 {
        return None;
    }
    Some(((value - min) / range).clamp(0.0, 1.0))
}

fn normalize_in(value: f64, extent: Option<Extent>) -> Option<f64> {
    extent.and_then(|e| normalize(value, e.min, e.max))
}

// ===================== SOLAR METRICS =====================

/// Current altitude within today's sampled altitude range.
pub fn day_climb(current_alt: f64, sun_path: &[PathPoint]) -> Option<f64> {
    let (lo, hi) = altitude_range(sun_path)?;
    normalize(current_alt, lo, hi)
}

/// Today's day length within the year's day-length range.
pub fn day_arc(
    rise: Option<DateTime<Utc>>,
    set: Option<DateTime<Utc>>,
    extremes: Option<&YearExtremes>,
) -> Option<f64> {
    let len_ms = (set? - rise?).num_milliseconds().max(0) as f64;
    normalize_in(len_ms, extremes?.day_length_ms)
}

/// Current altitude within the year's noon-altitude range.
pub fn year_height(current_alt: f64, extremes: Option<&YearExtremes>) -> Option<f64> {
    normalize_in(current_alt, extremes?.altitude_deg)
}

/// Earth's current Sun distance and its position in the yearly range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EarthOrbit {
    pub distance_mkm: f64,
    pub percent: Option<f64>,
}

pub fn earth_orbit(
    distance_au: Option<f64>,
    extremes: Option<&YearExtremes>,
) -> Option<EarthOrbit> {
    let d = distance_au.filter(|d| d.is_finite())?;
    let percent = extremes.and_then(|e| normalize_in(d, e.earth_distance_au));
    Some(EarthOrbit { distance_mkm: d * AU_TO_MKM, percent })
}

/// The Moon's current distance within the fixed perigee/apogee range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MoonOrbit {
    pub distance_km: f64,
    pub percent: Option<f64>,
}

pub fn moon_orbit(distance_au: Option<f64>) -> Option<MoonOrbit> {
    let km = distance_au.filter(|d| d.is_finite())? * AU_TO_MKM * 1e6;
    Some(MoonOrbit { distance_km: km, percent: normalize(km, MOON_PERIGEE_KM, MOON_APOGEE_KM) })
}

/// Relative optical path length through the atmosphere.
///
/// Plane-parallel `1 / cos(zenith)`, clamped to [1, 38]. `None` with the
/// Sun at or below the horizon.
pub fn air_mass(altitude_deg: f64) -> Option<f64> {
    if !altitude_deg.is_finite() || altitude_deg <= 0.0 {
        return None;
    }
    let zenith = (90.0 - altitude_deg).to_radians();
    Some((1.0 / zenith.cos()).clamp(1.0, AIR_MASS_MAX))
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Insolation {
    pub watts_per_m2: f64,
    pub fraction: f64,
}

/// Rough clear-sky ground irradiance on a horizontal surface.
pub fn insolation(altitude_deg: f64) -> Insolation {
    let factor = altitude_deg.to_radians().sin().max(0.0);
    let factor = if factor.is_finite() { factor } else { 0.0 };
    Insolation {
        watts_per_m2: SOLAR_CONSTANT * factor * CLEAR_SKY_TRANSMITTANCE,
        fraction: factor.clamp(0.0, 1.0),
    }
}

/// Format an equation-of-time value (minutes) as `±MM:SS`.
///
/// # Returns
/// `None` for a non-finite input
pub fn equation_of_time_label(minutes: f64) -> Option<String> {
    if !minutes.is_finite() {
        return None;
    }
    let total = (minutes * 60.0).round() as i64;
    let sign = if total >= 0 { '+' } else { '-' };
    let abs = total.unsigned_abs();
    Some(format!("{}{:02}:{:02}", sign, abs / 60, abs % 60))
}

/// Star opacity: 0 until the Sun is 12° down, fully visible at 18°.
pub fn star_visibility(sun_altitude_deg: f64) -> f64 {
    ((STAR_FADE_START_DEG - sun_altitude_deg) / STAR_FADE_SPAN_DEG).clamp(0.0, 1.0)
}

/// Opacity of the halo drawn around the Moon.
pub fn moon_glow(sun_altitude_deg: f64) -> f64 {
    if sun_altitude_deg < -6.0 { 0.35 } else { 0.05 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{Duration, TimeZone};

    fn extremes() -> YearExtremes {
        YearExtremes {
            altitude_deg: Some(Extent { min: 35.0, max: 82.0 }),
            day_length_ms: Some(Extent { min: 10.0 * 3.6e6, max: 14.0 * 3.6e6 }),
            earth_distance_au: Some(Extent { min: 0.9833, max: 1.0167 }),
        }
    }

    #[test]
    fn test_normalize_degenerate_ranges() {
        assert_eq!(normalize(5.0, 3.0, 3.0), None);
        assert_eq!(normalize(5.0, 4.0, 3.0), None);
        assert_eq!(normalize(f64::NAN, 0.0, 1.0), None);
        assert_eq!(normalize(1.0, f64::NEG_INFINITY, 1.0), None);
    }

    #[test]
    fn test_normalize_clamps() {
        assert_eq!(normalize(-1.0, 0.0, 10.0), Some(0.0));
        assert_eq!(normalize(11.0, 0.0, 10.0), Some(1.0));
        assert_relative_eq!(normalize(2.5, 0.0, 10.0).unwrap(), 0.25);
    }

    #[test]
    fn test_day_arc() {
        let rise = Utc.with_ymd_and_hms(2025, 3, 20, 4, 0, 0).unwrap();
        let set = rise + Duration::hours(12);
        assert_relative_eq!(day_arc(Some(rise), Some(set), Some(&extremes())).unwrap(), 0.5);
        assert_eq!(day_arc(None, Some(set), Some(&extremes())), None);
        assert_eq!(day_arc(Some(rise), Some(set), None), None);
        // Set before rise counts as zero length
        assert_eq!(day_arc(Some(set), Some(rise), Some(&extremes())), Some(0.0));
    }

    #[test]
    fn test_year_height_unavailable_extent() {
        let mut e = extremes();
        assert!(year_height(58.5, Some(&e)).is_some());
        e.altitude_deg = None;
        assert_eq!(year_height(58.5, Some(&e)), None);
        e.altitude_deg = Some(Extent { min: 40.0, max: 40.0 });
        assert_eq!(year_height(58.5, Some(&e)), None);
    }

    #[test]
    fn test_earth_orbit() {
        let o = earth_orbit(Some(1.0), Some(&extremes())).unwrap();
        assert_relative_eq!(o.distance_mkm, 149.597_870_7);
        assert!(o.percent.unwrap() > 0.4 && o.percent.unwrap() < 0.6);

        let no_cache = earth_orbit(Some(1.0), None).unwrap();
        assert_eq!(no_cache.percent, None);
        assert_eq!(earth_orbit(None, Some(&extremes())), None);
    }

    #[test]
    fn test_moon_orbit_uses_fixed_range() {
        let au = 384_400.0 / (AU_TO_MKM * 1e6);
        let o = moon_orbit(Some(au)).unwrap();
        assert_relative_eq!(o.distance_km, 384_400.0, epsilon = 1e-6);
        let expected = (384_400.0 - 363_300.0) / (405_500.0 - 363_300.0);
        assert_relative_eq!(o.percent.unwrap(), expected, epsilon = 1e-9);

        let far = moon_orbit(Some(0.003)).unwrap();
        assert_eq!(far.percent, Some(1.0));
    }

    #[test]
    fn test_air_mass() {
        assert_eq!(air_mass(0.0), None);
        assert_eq!(air_mass(-20.0), None);
        assert_relative_eq!(air_mass(90.0).unwrap(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(air_mass(30.0).unwrap(), 2.0, epsilon = 1e-9);
        assert_eq!(air_mass(0.5), Some(AIR_MASS_MAX));
    }

    #[test]
    fn test_insolation() {
        let below = insolation(-20.0);
        assert_eq!(below.fraction, 0.0);
        assert_eq!(below.watts_per_m2, 0.0);

        let zenith = insolation(90.0);
        assert_relative_eq!(zenith.fraction, 1.0, epsilon = 1e-12);
        assert_relative_eq!(zenith.watts_per_m2, 952.7, epsilon = 1e-9);
    }

    #[test]
    fn test_equation_of_time_label() {
        assert_eq!(equation_of_time_label(16.5).as_deref(), Some("+16:30"));
        assert_eq!(equation_of_time_label(-14.2).as_deref(), Some("-14:12"));
        assert_eq!(equation_of_time_label(0.0).as_deref(), Some("+00:00"));
        assert_eq!(equation_of_time_label(-0.004).as_deref(), Some("+00:00"));
    }

    #[test]
    fn test_equation_of_time_label_non_finite() {
        assert_eq!(equation_of_time_label(f64::NAN), None);
        assert_eq!(equation_of_time_label(f64::INFINITY), None);
        assert_eq!(equation_of_time_label(f64::NEG_INFINITY), None);
        // Saturates instead of overflowing on negation
        assert!(equation_of_time_label(-1e300).is_some_and(|l| l.starts_with('-')));
    }

    #[test]
    fn test_star_visibility() {
        assert_eq!(star_visibility(10.0), 0.0);
        assert_eq!(star_visibility(-12.0), 0.0);
        assert_relative_eq!(star_visibility(-15.0), 0.5);
        assert_eq!(star_visibility(-30.0), 1.0);
    }
}
