//! Zone Classification Module
//!
//! Two independent altitude scales for the Sun:
//! - [`Zone`]: the 3-way day / twilight / night split used to colour path segments
//! - [`SunlightBand`]: the civil / nautical / astronomical twilight ladder

use serde::Serialize;

// ===================== CONSTANTS =====================

/// Lowest altitude still classified as [`Zone::Day`]
pub const ZONE_DAY_MIN_DEG: f64 = 0.0;

/// Altitude at or below which the sky is [`Zone::Night`]
pub const ZONE_NIGHT_MAX_DEG: f64 = -12.0;

pub const CIVIL_TWILIGHT_DEG: f64 = -6.0;
pub const NAUTICAL_TWILIGHT_DEG: f64 = -12.0;
pub const ASTRONOMICAL_TWILIGHT_DEG: f64 = -18.0;

// ===================== ZONE =====================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Zone {
    Day,
    Twilight,
    Night,
}

impl Zone {
    /// Classify a solar altitude. The -12° boundary belongs to night.
    pub fn classify(altitude_deg: f64) -> Zone {
        if altitude_deg >= ZONE_DAY_MIN_DEG {
            Zone::Day
        } else if altitude_deg > ZONE_NIGHT_MAX_DEG {
            Zone::Twilight
        } else {
            Zone::Night
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Zone::Day => "day",
            Zone::Twilight => "twilight",
            Zone::Night => "night",
        }
    }
}

// ===================== SUNLIGHT BAND =====================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SunlightBand {
    Daylight,
    Civil,
    Nautical,
    Astronomical,
    Night,
}

impl SunlightBand {
    pub fn classify(altitude_deg: f64) -> SunlightBand {
        match altitude_deg {
            a if a >= 0.0 => SunlightBand::Daylight,
            a if a >= CIVIL_TWILIGHT_DEG => SunlightBand::Civil,
            a if a >= NAUTICAL_TWILIGHT_DEG => SunlightBand::Nautical,
            a if a >= ASTRONOMICAL_TWILIGHT_DEG => SunlightBand::Astronomical,
            _ => SunlightBand::Night,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SunlightBand::Daylight => "Daylight",
            SunlightBand::Civil => "Civil twilight",
            SunlightBand::Nautical => "Nautical twilight",
            SunlightBand::Astronomical => "Astronomical twilight",
            SunlightBand::Night => "Night",
        }
    }
}
