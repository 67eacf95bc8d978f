//! Sky Object Catalog
//!
//! Planets drawn on the panorama and the bright-star table (J2000 positions,
//! visual magnitudes, display colours).

use crate::provider::Body;

/// Magnitude reported for a planet whose brightness the provider cannot give
pub const UNKNOWN_MAGNITUDE: f64 = 99.0;

pub const PLANETS: [Body; 8] = [
    Body::Mercury,
    Body::Venus,
    Body::Mars,
    Body::Jupiter,
    Body::Saturn,
    Body::Uranus,
    Body::Neptune,
    Body::Pluto,
];

const DEFAULT_COLOR: &str = "#94a3b8";

/// Display colour for a body.
pub fn body_color(body: Body) -> &'static str {
    match body {
        Body::Mercury => "#cbd5f5",
        Body::Venus => "#f8fafc",
        Body::Mars => "#fb7185",
        Body::Jupiter => "#fde68a",
        Body::Saturn => "#fcd34d",
        Body::Uranus => "#5eead4",
        Body::Neptune => "#60a5fa",
        _ => DEFAULT_COLOR,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    pub name: &'static str,
    /// Right ascension in hours
    pub ra_hours: f64,
    /// Declination in degrees
    pub dec_deg: f64,
    pub magnitude: f64,
    pub color: &'static str,
}

const fn star(
    name: &'static str,
    ra_hours: f64,
    dec_deg: f64,
    magnitude: f64,
    color: &'static str,
) -> Star {
    Star { name, ra_hours, dec_deg, magnitude, color }
}

pub const BRIGHT_STARS: [Star; 31] = [
    star("Sirius", 6.7525, -16.7161, -1.46, "#bfdbff"),
    star("Canopus", 6.3992, -52.6957, -0.74, "#dbeafe"),
    star("Arcturus", 14.261, 19.1825, -0.05, "#fed7aa"),
    star("Vega", 18.6156, 38.7837, 0.03, "#bfdbff"),
    star("Capella", 5.2782, 45.998, 0.08, "#fef3c7"),
    star("Rigel", 5.2423, -8.2016, 0.18, "#bfdbff"),
    star("Procyon", 7.655, 5.225, 0.34, "#e2e8f0"),
    star("Betelgeuse", 5.9195, 7.4071, 0.42, "#fecaca"),
    star("Achernar", 1.6286, -57.2367, 0.46, "#bfdbff"),
    star("Hadar", 14.0637, -60.373, 0.61, "#dbeafe"),
    star("Altair", 19.8464, 8.8683, 0.77, "#bfdbff"),
    star("Acrux", 12.4433, -63.0991, 0.77, "#bfdbff"),
    star("Aldebaran", 4.5987, 16.5092, 0.85, "#fdba74"),
    star("Antares", 16.4901, -26.432, 1.06, "#fb7185"),
    star("Spica", 13.4199, -11.1614, 0.98, "#bfdbff"),
    star("Pollux", 7.7553, 28.0262, 1.14, "#fde68a"),
    star("Fomalhaut", 22.9608, -29.6222, 1.16, "#bfdbff"),
    star("Deneb", 20.6905, 45.2803, 1.25, "#bfdbff"),
    star("Regulus", 10.1395, 11.9672, 1.35, "#fde68a"),
    star("Adhara", 6.9771, -28.9721, 1.5, "#bfdbff"),
    star("Shaula", 17.5601, -37.1038, 1.62, "#fecaca"),
    star("Castor", 7.5767, 31.8883, 1.58, "#bfdbff"),
    star("Gacrux", 12.5194, -57.1132, 1.63, "#fed7aa"),
    star("Bellatrix", 5.4189, 6.3497, 1.64, "#bfdbff"),
    star("Elnath", 5.4382, 28.6075, 1.65, "#fde68a"),
    star("Miaplacidus", 9.2204, -69.7172, 1.67, "#bfdbff"),
    star("Alnilam", 5.6036, -1.2019, 1.69, "#bfdbff"),
    star("Alnair", 22.1372, -46.9609, 1.74, "#bfdbff"),
    star("Alioth", 12.9004, 55.9598, 1.76, "#fde68a"),
    star("Mirfak", 3.4054, 49.8611, 1.79, "#bfdbff"),
    star("Polaris", 2.5303, 89.2641, 1.97, "#ffffff"),
];
