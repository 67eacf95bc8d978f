//! Ephemeris Provider Interface
//!
//! The engine never does astronomy itself. Everything it needs from an
//! ephemeris library goes through [`EphemerisProvider`], and every provider
//! declares up front which queries it can answer via [`Capabilities`].
//!
//! All queries return `Option`: a provider that cannot answer (unsupported
//! body, search that found nothing, numerical failure) returns `None` and
//! the dependent metric degrades to "unavailable".

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::observer::Observer;

// ===================== BODIES =====================

/// Solar-system bodies the engine knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Body {
    Sun,
    Moon,
    Mercury,
    Venus,
    Earth,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
}

impl Body {
    pub const ALL: [Body; 11] = [
        Body::Sun,
        Body::Moon,
        Body::Mercury,
        Body::Venus,
        Body::Earth,
        Body::Mars,
        Body::Jupiter,
        Body::Saturn,
        Body::Uranus,
        Body::Neptune,
        Body::Pluto,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Body::Sun => "Sun",
            Body::Moon => "Moon",
            Body::Mercury => "Mercury",
            Body::Venus => "Venus",
            Body::Earth => "Earth",
            Body::Mars => "Mars",
            Body::Jupiter => "Jupiter",
            Body::Saturn => "Saturn",
            Body::Uranus => "Uranus",
            Body::Neptune => "Neptune",
            Body::Pluto => "Pluto",
        }
    }
}

// ===================== QUERY RESULTS =====================

/// Raw horizontal coordinates as a provider reports them.
///
/// Azimuth may be outside [0, 360); the sampler normalizes it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawHorizontal {
    pub altitude_deg: f64,
    pub azimuth_deg: f64,
}

/// Illumination of a body as seen from Earth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Illumination {
    /// Illuminated fraction of the disc (0..1), when the provider reports it
    pub phase_fraction: Option<f64>,
    /// Sun-body-Earth angle in degrees (180 = new, 0 = full)
    pub phase_angle_deg: f64,
    /// Visual magnitude, when known
    pub magnitude: Option<f64>,
}

/// Cartesian vector in astronomical units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

/// Lunar libration angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Libration {
    pub elon_deg: f64,
    pub elat_deg: f64,
}

/// Which horizon crossing to search for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiseSetDirection {
    Rise,
    Set,
}

// ===================== CAPABILITIES =====================

/// Static description of what a provider build supports.
///
/// The engine consults this before issuing a query so that an absent
/// capability is a documented "unavailable" rather than a failed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Bodies for which body-specific queries are answered
    pub bodies: &'static [Body],
    /// Right ascension / declination to horizontal (fixed stars)
    pub equatorial_transform: bool,
    pub illumination: bool,
    pub rise_set: bool,
    pub hour_angle: bool,
    pub heliocentric: bool,
    pub geocentric: bool,
    pub libration: bool,
    pub sidereal_time: bool,
    pub equation_of_time: bool,
}

impl Capabilities {
    /// A provider that answers nothing.
    pub const NONE: Capabilities = Capabilities {
        bodies: &[],
        equatorial_transform: false,
        illumination: false,
        rise_set: false,
        hour_angle: false,
        heliocentric: false,
        geocentric: false,
        libration: false,
        sidereal_time: false,
        equation_of_time: false,
    };

    pub fn supports_body(&self, body: Body) -> bool {
        self.bodies.contains(&body)
    }
}

// ===================== PROVIDER TRAIT =====================

/// Source of ephemeris data.
///
/// Only [`capabilities`](EphemerisProvider::capabilities) is required; every
/// query has a default implementation returning `None`, so a provider
/// overrides exactly what it declares.
pub trait EphemerisProvider {
    fn capabilities(&self) -> Capabilities;

    /// Apparent topocentric horizontal coordinates (refraction-corrected).
    fn horizontal(
        &self,
        _body: Body,
        _at: DateTime<Utc>,
        _observer: &Observer,
    ) -> Option<RawHorizontal> {
        None
    }

    /// Horizontal coordinates of a fixed point given in equatorial coordinates.
    ///
    /// # Arguments
    /// * `ra_hours` - Right ascension in sidereal hours
    /// * `dec_deg` - Declination in degrees
    fn horizontal_from_equatorial(
        &self,
        _at: DateTime<Utc>,
        _observer: &Observer,
        _ra_hours: f64,
        _dec_deg: f64,
    ) -> Option<RawHorizontal> {
        None
    }

    fn illumination(&self, _body: Body, _at: DateTime<Utc>) -> Option<Illumination> {
        None
    }

    /// First rise or set of `body` after `start`, within `limit_days`.
    fn search_rise_set(
        &self,
        _body: Body,
        _observer: &Observer,
        _direction: RiseSetDirection,
        _start: DateTime<Utc>,
        _limit_days: f64,
    ) -> Option<DateTime<Utc>> {
        None
    }

    /// First instant after `start` when `body` reaches the given local hour angle.
    ///
    /// Hour angle 0 is upper transit (solar noon for the Sun).
    fn search_hour_angle(
        &self,
        _body: Body,
        _observer: &Observer,
        _hour_angle: f64,
        _start: DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        None
    }

    fn helio_vector(&self, _body: Body, _at: DateTime<Utc>) -> Option<Vector3> {
        None
    }

    /// Heliocentric distance in AU.
    fn helio_distance_au(&self, body: Body, at: DateTime<Utc>) -> Option<f64> {
        self.helio_vector(body, at).map(|v| v.length())
    }

    fn geo_vector(&self, _body: Body, _at: DateTime<Utc>) -> Option<Vector3> {
        None
    }

    /// Geocentric distance in AU.
    fn geo_distance_au(&self, body: Body, at: DateTime<Utc>) -> Option<f64> {
        self.geo_vector(body, at).map(|v| v.length())
    }

    fn libration(&self, _at: DateTime<Utc>) -> Option<Libration> {
        None
    }

    /// Greenwich apparent sidereal time in hours.
    fn sidereal_time(&self, _at: DateTime<Utc>) -> Option<f64> {
        None
    }

    /// Equation of time in minutes (apparent minus mean solar time).
    fn equation_of_time(&self, _at: DateTime<Utc>) -> Option<f64> {
        None
    }
}

impl<P: EphemerisProvider + ?Sized> EphemerisProvider for &P {
    fn capabilities(&self) -> Capabilities {
        (**self).capabilities()
    }

    fn horizontal(
        &self,
        body: Body,
        at: DateTime<Utc>,
        observer: &Observer,
    ) -> Option<RawHorizontal> {
        (**self).horizontal(body, at, observer)
    }

    fn horizontal_from_equatorial(
        &self,
        at: DateTime<Utc>,
        observer: &Observer,
        ra_hours: f64,
        dec_deg: f64,
    ) -> Option<RawHorizontal> {
        (**self).horizontal_from_equatorial(at, observer, ra_hours, dec_deg)
    }

    fn illumination(&self, body: Body, at: DateTime<Utc>) -> Option<Illumination> {
        (**self).illumination(body, at)
    }

    fn search_rise_set(
        &self,
        body: Body,
        observer: &Observer,
        direction: RiseSetDirection,
        start: DateTime<Utc>,
        limit_days: f64,
    ) -> Option<DateTime<Utc>> {
        (**self).search_rise_set(body, observer, direction, start, limit_days)
    }

    fn search_hour_angle(
        &self,
        body: Body,
        observer: &Observer,
        hour_angle: f64,
        start: DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        (**self).search_hour_angle(body, observer, hour_angle, start)
    }

    fn helio_vector(&self, body: Body, at: DateTime<Utc>) -> Option<Vector3> {
        (**self).helio_vector(body, at)
    }

    fn helio_distance_au(&self, body: Body, at: DateTime<Utc>) -> Option<f64> {
        (**self).helio_distance_au(body, at)
    }

    fn geo_vector(&self, body: Body, at: DateTime<Utc>) -> Option<Vector3> {
        (**self).geo_vector(body, at)
    }

    fn geo_distance_au(&self, body: Body, at: DateTime<Utc>) -> Option<f64> {
        (**self).geo_distance_au(body, at)
    }

    fn libration(&self, at: DateTime<Utc>) -> Option<Libration> {
        (**self).libration(at)
    }

    fn sidereal_time(&self, at: DateTime<Utc>) -> Option<f64> {
        (**self).sidereal_time(at)
    }

    fn equation_of_time(&self, at: DateTime<Utc>) -> Option<f64> {
        (**self).equation_of_time(at)
    }
}

// ===================== TESTS =====================
