//! Moon Phase Module
//!
//! Phase fraction, waxing/waning direction, phase label and the small
//! geometric hints (terminator shift, tilt) the panorama uses to draw the Moon.

use chrono::{DateTime, Duration, Utc};
use serde::{Serialize, Serializer};

use crate::provider::{Body, EphemerisProvider};
use crate::sampler::sample_phase_fraction;

/// Horizontal terminator displacement at new/full, in render units
pub const PHASE_SHIFT_SCALE: f64 = 16.0;

// Illuminated-fraction thresholds for the phase ladder
const NEW_BELOW: f64 = 0.03;
const CRESCENT_BELOW: f64 = 0.47;
const QUARTER_BELOW: f64 = 0.53;
const GIBBOUS_BELOW: f64 = 0.97;

/// Serialized as its display label, e.g. `"Waxing Crescent"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseName {
    NewMoon,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    FullMoon,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

impl PhaseName {
    pub fn classify(fraction: f64, waxing: bool) -> PhaseName {
        match (fraction, waxing) {
            (f, _) if f < NEW_BELOW => PhaseName::NewMoon,
            (f, true) if f < CRESCENT_BELOW => PhaseName::WaxingCrescent,
            (f, false) if f < CRESCENT_BELOW => PhaseName::WaningCrescent,
            (f, true) if f < QUARTER_BELOW => PhaseName::FirstQuarter,
            (f, false) if f < QUARTER_BELOW => PhaseName::LastQuarter,
            (f, true) if f < GIBBOUS_BELOW => PhaseName::WaxingGibbous,
            (f, false) if f < GIBBOUS_BELOW => PhaseName::WaningGibbous,
            _ => PhaseName::FullMoon,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PhaseName::NewMoon => "New Moon",
            PhaseName::WaxingCrescent => "Waxing Crescent",
            PhaseName::FirstQuarter => "First Quarter",
            PhaseName::WaxingGibbous => "Waxing Gibbous",
            PhaseName::FullMoon => "Full Moon",
            PhaseName::WaningGibbous => "Waning Gibbous",
            PhaseName::LastQuarter => "Last Quarter",
            PhaseName::WaningCrescent => "Waning Crescent",
        }
    }
}

impl Serialize for PhaseName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Phase of the Moon at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MoonPhase {
    /// Illuminated fraction in [0, 1]
    pub fraction: f64,
    /// Sun-Moon-Earth phase angle in degrees
    pub angle_deg: f64,
    pub waxing: bool,
    #[serde(rename = "label")]
    pub name: PhaseName,
}

impl MoonPhase {
    /// Query the provider for the Moon's phase at `at`.
    ///
    /// Waxing means the illuminated fraction is larger an hour later.
    pub fn compute<P: EphemerisProvider + ?Sized>(
        provider: &P,
        at: DateTime<Utc>,
    ) -> Option<Self> {
        let fraction = sample_phase_fraction(provider, Body::Moon, at)?;
        let angle_deg = provider.illumination(Body::Moon, at)?.phase_angle_deg;
        let later = sample_phase_fraction(provider, Body::Moon, at + Duration::hours(1))?;
        let waxing = later >= fraction;
        Some(Self { fraction, angle_deg, waxing, name: PhaseName::classify(fraction, waxing) })
    }

    pub fn label(&self) -> &'static str {
        self.name.label()
    }

    /// Horizontal offset of the terminator ellipse: `(f - 0.5) * 16`,
    /// mirrored while the Moon wanes.
    pub fn shift(&self) -> f64 {
        let s = (self.fraction - 0.5) * PHASE_SHIFT_SCALE;
        if self.waxing { s } else { -s }
    }
}

/// Cosmetic tilt of the lunar disc: the libration in ecliptic longitude.
pub fn moon_tilt<P: EphemerisProvider + ?Sized>(provider: &P, at: DateTime<Utc>) -> Option<f64> {
    if !provider.capabilities().libration {
        return None;
    }
    provider.libration(at).map(|l| l.elon_deg).filter(|d| d.is_finite())
}
