//! Day-Path Builder Module
//!
//! Samples a body across one local calendar day at a fixed step, starting at
//! local midnight in the caller's timezone.

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use log::debug;
use serde::Serialize;

use crate::observer::Observer;
use crate::provider::{Body, EphemerisProvider};
use crate::sampler::{sample_phase_fraction, sample_position};
use crate::time::start_of_local_day;

/// Default sampling step in minutes
pub const DEFAULT_STEP_MINUTES: u32 = 10;

const MINUTES_PER_DAY: u32 = 24 * 60;

/// One sample of a day path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PathPoint {
    pub time: DateTime<Utc>,
    pub altitude_deg: f64,
    pub azimuth_deg: f64,
    /// Illuminated fraction, Moon paths only
    pub phase_fraction: Option<f64>,
}

/// Number of samples in a full day path: 24 h inclusive of both ends.
pub fn samples_per_day(step_minutes: u32) -> usize {
    (MINUTES_PER_DAY / step_minutes.max(1)) as usize + 1
}

/// Build the day path of `body` for the local day containing `base`.
///
/// # Arguments
/// * `base` - Any instant of the day; truncated to local midnight
/// * `step_minutes` - Sampling step (the default of 10 gives 145 samples)
///
/// # Returns
/// Chronological samples. Instants the provider cannot answer are skipped,
/// so an unsupported body yields an empty path.
pub fn build_day_path<P: EphemerisProvider + ?Sized>(
    provider: &P,
    observer: &Observer,
    body: Body,
    base: DateTime<Tz>,
    step_minutes: u32,
) -> Vec<PathPoint> {
    let tz = base.timezone();
    let start = start_of_local_day(&tz, base.date_naive()).unwrap_or(base);
    let step = Duration::minutes(i64::from(step_minutes.max(1)));
    let with_phase = body == Body::Moon;

    let mut points = Vec::with_capacity(samples_per_day(step_minutes));
    let mut skipped = 0usize;
    for i in 0..samples_per_day(step_minutes) {
        let t = (start + step * i as i32).with_timezone(&Utc);
        let Some(pos) = sample_position(provider, body, t, observer) else {
            skipped += 1;
            continue;
        };
        let phase_fraction =
            if with_phase { sample_phase_fraction(provider, body, t) } else { None };
        points.push(PathPoint {
            time: t,
            altitude_deg: pos.altitude_deg,
            azimuth_deg: pos.azimuth_deg,
            phase_fraction,
        });
    }

    if skipped > 0 {
        debug!("{} day path from {}: skipped {} samples", body.name(), start, skipped);
    }
    points
}

/// Minimum and maximum altitude along a path.
pub fn altitude_range(points: &[PathPoint]) -> Option<(f64, f64)> {
    points.iter().map(|p| p.altitude_deg).fold(None, |acc, a| match acc {
        None => Some((a, a)),
        Some((lo, hi)) => Some((lo.min(a), hi.max(a))),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockProvider;
    use crate::provider::{Illumination, RawHorizontal};
    use chrono::{TimeZone, Timelike};
    use chrono_tz::Asia::Jerusalem;

    fn observer() -> Observer {
        Observer::new(31.78, 35.22, 750.0).unwrap()
    }

    fn sweeping_mock() -> MockProvider {
        MockProvider::new().with_horizontal(|_, t| {
            let minutes = f64::from(t.hour() * 60 + t.minute());
            RawHorizontal { altitude_deg: minutes / 16.0 - 45.0, azimuth_deg: minutes / 4.0 }
        })
    }

    #[test]
    fn test_default_day_has_145_samples() {
        assert_eq!(samples_per_day(DEFAULT_STEP_MINUTES), 145);
        let base = Jerusalem.with_ymd_and_hms(2025, 6, 21, 15, 37, 0).unwrap();
        let path = build_day_path(&sweeping_mock(), &observer(), Body::Sun, base, 10);
        assert_eq!(path.len(), 145);
    }

    #[test]
    fn test_path_starts_at_local_midnight_and_is_chronological() {
        let base = Jerusalem.with_ymd_and_hms(2025, 6, 21, 15, 37, 0).unwrap();
        let path = build_day_path(&sweeping_mock(), &observer(), Body::Sun, base, 10);

        let first = path[0].time.with_timezone(&Jerusalem);
        assert_eq!((first.hour(), first.minute()), (0, 0));
        assert!(path.windows(2).all(|w| w[0].time < w[1].time));
        assert_eq!(path[144].time - path[0].time, Duration::hours(24));
    }

    #[test]
    fn test_unsupported_body_gives_empty_path() {
        let mock = MockProvider::new().with_bodies(&[Body::Sun]);
        let base = Jerusalem.with_ymd_and_hms(2025, 6, 21, 12, 0, 0).unwrap();
        assert!(build_day_path(&mock, &observer(), Body::Moon, base, 10).is_empty());
    }

    #[test]
    fn test_moon_path_carries_phase() {
        let mock = sweeping_mock().with_illumination(|_, _| Illumination {
            phase_fraction: Some(0.42),
            phase_angle_deg: 0.0,
            magnitude: None,
        });
        let base = Jerusalem.with_ymd_and_hms(2025, 6, 21, 12, 0, 0).unwrap();

        let moon = build_day_path(&mock, &observer(), Body::Moon, base, 30);
        assert_eq!(moon.len(), 49);
        assert!(moon.iter().all(|p| p.phase_fraction == Some(0.42)));

        let sun = build_day_path(&mock, &observer(), Body::Sun, base, 30);
        assert!(sun.iter().all(|p| p.phase_fraction.is_none()));
    }

    #[test]
    fn test_altitude_range() {
        assert_eq!(altitude_range(&[]), None);
        let base = Jerusalem.with_ymd_and_hms(2025, 6, 21, 12, 0, 0).unwrap();
        let path = build_day_path(&sweeping_mock(), &observer(), Body::Sun, base, 10);
        let (lo, hi) = altitude_range(&path).unwrap();
        assert!(lo < hi);
    }
}
