//! Position Sampler Module
//!
//! Turns raw provider output into validated horizontal coordinates:
//! azimuth in [0, 360), altitude in [-90, 90], never NaN.

use chrono::{DateTime, Utc};
use log::debug;
use serde::Serialize;

use crate::observer::Observer;
use crate::provider::{Body, EphemerisProvider, RawHorizontal};

/// Altitude / azimuth pair that has passed normalization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HorizontalPosition {
    pub altitude_deg: f64,
    pub azimuth_deg: f64,
}

impl HorizontalPosition {
    /// Normalize a provider reading. `None` if either component is non-finite.
    pub fn from_raw(raw: RawHorizontal) -> Option<Self> {
        if !raw.altitude_deg.is_finite() || !raw.azimuth_deg.is_finite() {
            return None;
        }
        Some(Self {
            altitude_deg: raw.altitude_deg.clamp(-90.0, 90.0),
            azimuth_deg: normalize_azimuth(raw.azimuth_deg),
        })
    }
}

/// Wrap an azimuth into [0, 360).
pub fn normalize_azimuth(az: f64) -> f64 {
    let wrapped = az.rem_euclid(360.0);
    // rem_euclid of a tiny negative value rounds up to exactly 360.0
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Sample one body's horizontal position at one instant.
///
/// # Returns
/// `None` if the provider does not support `body`, reports nothing, or
/// reports non-finite numbers.
pub fn sample_position<P: EphemerisProvider + ?Sized>(
    provider: &P,
    body: Body,
    at: DateTime<Utc>,
    observer: &Observer,
) -> Option<HorizontalPosition> {
    if !provider.capabilities().supports_body(body) {
        return None;
    }
    let raw = provider.horizontal(body, at, observer)?;
    let pos = HorizontalPosition::from_raw(raw);
    if pos.is_none() {
        debug!("{} at {}: provider returned non-finite coordinates", body.name(), at);
    }
    pos
}

/// Sample a fixed point given in equatorial coordinates (a star).
pub fn sample_equatorial<P: EphemerisProvider + ?Sized>(
    provider: &P,
    at: DateTime<Utc>,
    observer: &Observer,
    ra_hours: f64,
    dec_deg: f64,
) -> Option<HorizontalPosition> {
    if !provider.capabilities().equatorial_transform {
        return None;
    }
    HorizontalPosition::from_raw(provider.horizontal_from_equatorial(
        at, observer, ra_hours, dec_deg,
    )?)
}

/// Illuminated fraction of a body's disc.
///
/// Uses the provider's fraction when present, otherwise derives it from the
/// phase angle as `(1 - cos angle) / 2`.
pub fn sample_phase_fraction<P: EphemerisProvider + ?Sized>(
    provider: &P,
    body: Body,
    at: DateTime<Utc>,
) -> Option<f64> {
    let caps = provider.capabilities();
    if !caps.illumination || !caps.supports_body(body) {
        return None;
    }
    let illum = provider.illumination(body, at)?;
    let fraction = match illum.phase_fraction {
        Some(f) => f,
        None => (1.0 - illum.phase_angle_deg.to_radians().cos()) / 2.0,
    };
    fraction.is_finite().then(|| fraction.clamp(0.0, 1.0))
}

// ===================== TESTS =====================
