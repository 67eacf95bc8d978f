//! Built-in Solar Ephemeris Provider
//!
//! A Sun-only [`EphemerisProvider`] backed by the NREL SPA (Solar Position
//! Algorithm). Horizon crossings are found by bisection between solar
//! transit and the adjacent lower culminations, against a target altitude
//! that accounts for the solar semi-diameter and the observer's horizon dip.

use std::f64::consts::PI;

use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc};
use solar_positioning::{
    Horizon, spa,
    time::DeltaT,
    types::{RefractionCorrection, SunriseResult},
};

use crate::observer::Observer;
use crate::provider::{
    Body, Capabilities, EphemerisProvider, RawHorizontal, RiseSetDirection, Vector3,
};

// ===================== CONSTANTS =====================

/// Solar apparent radius in degrees (angular semi-diameter)
pub const SOLAR_RADIUS_DEG: f64 = 0.266;

/// Longest rise/set search window, in days
pub const MAX_SEARCH_DAYS: f64 = 370.0;

const SUN_ONLY: &[Body] = &[Body::Sun];

// ===================== SOLAR CALCULATION CONTEXT =====================

/// Context for solar position calculations at one observer.
///
/// Encapsulates everything needed for consistent SPA calls: location,
/// Delta-T, refraction model and the target elevation for root finding.
#[derive(Clone, Copy)]
pub struct SolarCalc {
    /// Observer latitude in degrees
    pub lat: f64,
    /// Observer longitude in degrees
    pub lon: f64,
    /// Observer altitude in meters
    pub alt: f64,
    /// Delta-T correction for TT-UT1 difference
    pub delta_t: f64,
    /// Atmospheric refraction correction
    pub refr: Option<RefractionCorrection>,
    /// Target sun elevation angle in degrees
    pub target: f64,
}

impl SolarCalc {
    /// Get the solar position at a given time.
    pub fn position(&self, t: DateTime<Utc>) -> Option<solar_positioning::SolarPosition> {
        spa::solar_position(t, self.lat, self.lon, self.alt, self.delta_t, self.refr).ok()
    }

    /// Difference between the sun elevation at `t` and the target.
    pub fn elevation_error(&self, t: DateTime<Utc>) -> Option<f64> {
        let e = self.position(t)?.elevation_angle() - self.target;
        e.is_finite().then_some(e)
    }

    /// Solve for the time when sun crosses target elevation using bisection.
    ///
    /// # Arguments
    /// * `a` - Start of search interval
    /// * `b` - End of search interval
    ///
    /// # Returns
    /// The crossing time, or None if the interval does not bracket a crossing
    pub fn solve_root(
        &self,
        mut a: DateTime<Utc>,
        mut b: DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        let mut fa = self.elevation_error(a)?;
        let fb = self.elevation_error(b)?;

        if fa.signum() == fb.signum() {
            return None;
        }

        for _ in 0..60 {
            let m = a + (b - a) / 2;
            let fm = self.elevation_error(m)?;

            if fm.abs() < 1e-7 {
                return Some(m);
            }

            if fm.signum() == fa.signum() {
                a = m;
                fa = fm;
            } else {
                b = m;
            }
        }

        Some(a)
    }

    /// Solar transit on the UTC calendar day of `date`.
    pub fn transit(&self, date: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let res = spa::sunrise_sunset_for_horizon(
            date,
            self.lat,
            self.lon,
            self.delta_t,
            Horizon::SunriseSunset,
        )
        .ok()?;
        Some(match res {
            SunriseResult::RegularDay { transit, .. } => transit,
            SunriseResult::AllDay { transit } => transit,
            SunriseResult::AllNight { transit } => transit,
        })
    }

    /// Rise and set around a given transit.
    pub fn solve_from_noon(
        &self,
        noon: DateTime<Utc>,
    ) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
        let span = Duration::hours(12);
        (self.solve_root(noon - span, noon), self.solve_root(noon, noon + span))
    }
}

// ===================== SPA PROVIDER =====================

/// Sun-only provider using SPA with standard refraction.
///
/// Also answers the Earth's heliocentric distance (Spencer eccentricity
/// series) and the equation of time, both derived from the Sun.
#[derive(Clone, Copy)]
pub struct SpaProvider {
    refraction: Option<RefractionCorrection>,
}

impl Default for SpaProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SpaProvider {
    pub fn new() -> Self {
        Self { refraction: Some(RefractionCorrection::standard()) }
    }

    fn calc(&self, observer: &Observer, at: DateTime<Utc>, target: f64) -> Option<SolarCalc> {
        let delta_t = DeltaT::estimate_from_date(at.year(), at.month()).ok()?;
        Some(SolarCalc {
            lat: observer.lat(),
            lon: observer.lon(),
            alt: observer.elevation_m(),
            delta_t,
            refr: self.refraction,
            target,
        })
    }

    /// Target altitude for sunrise/sunset: upper limb on the apparent horizon.
    fn horizon_target(observer: &Observer) -> f64 {
        -SOLAR_RADIUS_DEG - observer.horizon_dip_deg()
    }
}

/// Earth-Sun distance in AU from the Spencer (1971) eccentricity factor.
pub fn earth_sun_distance_au(day_of_year: u32) -> f64 {
    let b = 2.0 * PI * (day_of_year as f64 - 1.0) / 365.0;

    let eccentricity_correction = 1.000110
        + 0.034221 * b.cos()
        + 0.001280 * b.sin()
        + 0.000719 * (2.0 * b).cos()
        + 0.000077 * (2.0 * b).sin();

    // The factor is (r0 / r)^2
    1.0 / eccentricity_correction.sqrt()
}

impl EphemerisProvider for SpaProvider {
    fn capabilities(&self) -> Capabilities {
        Capabilities {
            bodies: SUN_ONLY,
            rise_set: true,
            hour_angle: true,
            heliocentric: true,
            equation_of_time: true,
            ..Capabilities::NONE
        }
    }

    fn horizontal(
        &self,
        body: Body,
        at: DateTime<Utc>,
        observer: &Observer,
    ) -> Option<RawHorizontal> {
        if body != Body::Sun {
            return None;
        }
        let pos = self.calc(observer, at, 0.0)?.position(at)?;
        Some(RawHorizontal { altitude_deg: pos.elevation_angle(), azimuth_deg: pos.azimuth() })
    }

    fn search_rise_set(
        &self,
        body: Body,
        observer: &Observer,
        direction: RiseSetDirection,
        start: DateTime<Utc>,
        limit_days: f64,
    ) -> Option<DateTime<Utc>> {
        if body != Body::Sun || !(limit_days > 0.0 && limit_days <= MAX_SEARCH_DAYS) {
            return None;
        }
        let end = start
            .checked_add_signed(Duration::milliseconds((limit_days * 86_400_000.0) as i64))?;
        let calc = self.calc(observer, start, Self::horizon_target(observer))?;

        // Transits one day either side cover events near the window edges
        (-1..=limit_days.ceil() as i64)
            .filter_map(|offset| {
                let noon = calc.transit(start.checked_add_signed(Duration::days(offset))?)?;
                let (rise, set) = calc.solve_from_noon(noon);
                match direction {
                    RiseSetDirection::Rise => rise,
                    RiseSetDirection::Set => set,
                }
            })
            .find(|t| *t > start && *t <= end)
    }

    fn search_hour_angle(
        &self,
        body: Body,
        observer: &Observer,
        hour_angle: f64,
        start: DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        // Only upper transit is supported
        if body != Body::Sun || hour_angle != 0.0 {
            return None;
        }
        let calc = self.calc(observer, start, 0.0)?;
        (0..=2)
            .filter_map(|offset| calc.transit(start + Duration::days(offset)))
            .find(|t| *t > start)
    }

    fn helio_vector(&self, body: Body, at: DateTime<Utc>) -> Option<Vector3> {
        if body != Body::Earth {
            return None;
        }
        let r = earth_sun_distance_au(at.ordinal());
        // Direction is not modelled; only the length is meaningful
        Some(Vector3 { x: r, y: 0.0, z: 0.0 })
    }

    fn equation_of_time(&self, at: DateTime<Utc>) -> Option<f64> {
        let greenwich = Observer::new(0.0, 0.0, 0.0).ok()?;
        let calc = self.calc(&greenwich, at, 0.0)?;
        let transit = calc.transit(at)?;
        let mean_noon = at.date_naive().and_time(NaiveTime::from_hms_opt(12, 0, 0)?).and_utc();
        Some((mean_noon - transit).num_milliseconds() as f64 / 60_000.0)
    }
}

// ===================== TESTS =====================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::TimeZone;

    fn midnight(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_dead_sea_sunrise_shift() {
        let sp = SpaProvider::new();
        let start = midnight(2025, 6, 30) + Duration::hours(21);
        let sea = Observer::new(31.0, 35.4, 0.0).unwrap();
        let dead_sea = Observer::new(31.0, 35.4, -450.0).unwrap();

        let sr0 = sp.search_rise_set(Body::Sun, &sea, RiseSetDirection::Rise, start, 1.0).unwrap();
        let sr_ds =
            sp.search_rise_set(Body::Sun, &dead_sea, RiseSetDirection::Rise, start, 1.0).unwrap();

        let shift = (sr_ds - sr0).num_seconds();

        // NOAA + JPL both show ~3–5 minutes later sunrise
        assert!(
            (180..=300).contains(&shift),
            "Dead Sea sunrise shift out of expected range: {} s",
            shift
        );
    }

    #[test]
    fn test_rise_set_respect_search_window() {
        let sp = SpaProvider::new();
        let obs = Observer::new(31.78, 35.22, 0.0).unwrap();
        let start = midnight(2025, 3, 20);

        let rise = sp.search_rise_set(Body::Sun, &obs, RiseSetDirection::Rise, start, 1.0).unwrap();
        let set = sp.search_rise_set(Body::Sun, &obs, RiseSetDirection::Set, rise, 1.0).unwrap();
        assert!(rise > start && rise - start < Duration::hours(24));
        let day = (set - rise).num_minutes();
        assert!((700..=760).contains(&day), "equinox day length {} min", day);

        // A window that closes before sunrise finds nothing
        assert!(sp.search_rise_set(Body::Sun, &obs, RiseSetDirection::Rise, start, 0.1).is_none());
    }

    #[test]
    fn test_rise_set_rejects_oversized_window() {
        let sp = SpaProvider::new();
        let obs = Observer::new(31.78, 35.22, 750.0).unwrap();
        let start = midnight(2025, 6, 21);
        let rise = |days| sp.search_rise_set(Body::Sun, &obs, RiseSetDirection::Rise, start, days);
        for days in [MAX_SEARCH_DAYS + 1.0, 1e12, f64::INFINITY, f64::NAN, 0.0] {
            assert_eq!(rise(days), None, "accepted {} days", days);
        }
        assert!(rise(MAX_SEARCH_DAYS).is_some());
    }

    #[test]
    fn test_equator_never_has_polar_night() {
        let sp = SpaProvider::new();
        let obs = Observer::new(0.0, 0.0, 0.0).unwrap();

        for month in 1..=12 {
            let start = midnight(2025, month, 1);
            let rise = sp.search_rise_set(Body::Sun, &obs, RiseSetDirection::Rise, start, 1.0);
            let set = sp.search_rise_set(Body::Sun, &obs, RiseSetDirection::Set, start, 1.0);
            assert!(
                rise.is_some() && set.is_some(),
                "Missing sunrise/sunset at equator in month {}",
                month
            );
        }
    }

    #[test]
    fn test_midnight_sun_has_no_sunset_in_tromso() {
        let sp = SpaProvider::new();
        let obs = Observer::new(69.6492, 18.9553, 0.0).unwrap();
        let start = midnight(2025, 6, 21);
        assert!(sp.search_rise_set(Body::Sun, &obs, RiseSetDirection::Set, start, 1.0).is_none());
        assert!(sp.horizontal(Body::Sun, start, &obs).unwrap().altitude_deg > 0.0);
    }

    #[test]
    fn test_solar_noon_is_highest() {
        let sp = SpaProvider::new();
        let obs = Observer::new(31.78, 35.22, 750.0).unwrap();
        let start = midnight(2025, 6, 21) - Duration::hours(3);
        let noon = sp.search_hour_angle(Body::Sun, &obs, 0.0, start).unwrap();

        let at = |t| sp.horizontal(Body::Sun, t, &obs).unwrap().altitude_deg;
        assert!(at(noon) > at(noon - Duration::minutes(20)));
        assert!(at(noon) > at(noon + Duration::minutes(20)));
        assert!(sp.search_hour_angle(Body::Sun, &obs, 6.0, start).is_none());
    }

    #[test]
    fn test_equation_of_time_sign() {
        let sp = SpaProvider::new();
        let nov = sp.equation_of_time(midnight(2025, 11, 3)).unwrap();
        let feb = sp.equation_of_time(midnight(2025, 2, 11)).unwrap();
        assert!((15.5..17.5).contains(&nov), "November EoT {}", nov);
        assert!((-15.0..-13.0).contains(&feb), "February EoT {}", feb);
    }

    #[test]
    fn test_earth_sun_distance() {
        assert_relative_eq!(earth_sun_distance_au(3), 0.9833, epsilon = 2e-3);
        assert_relative_eq!(earth_sun_distance_au(185), 1.0167, epsilon = 2e-3);

        let sp = SpaProvider::new();
        assert!(sp.helio_distance_au(Body::Earth, midnight(2025, 1, 3)).unwrap() < 1.0);
        assert!(sp.helio_distance_au(Body::Mars, midnight(2025, 1, 3)).is_none());
    }

    #[test]
    fn test_unsupported_queries() {
        let sp = SpaProvider::new();
        let obs = Observer::new(0.0, 0.0, 0.0).unwrap();
        let now = midnight(2025, 1, 1);
        assert!(sp.horizontal(Body::Moon, now, &obs).is_none());
        assert!(sp.illumination(Body::Moon, now).is_none());
        assert!(!sp.capabilities().supports_body(Body::Moon));
        assert!(!sp.capabilities().libration);
    }
}
