//! Scriptable ephemeris provider for tests.
//!
//! Each query is backed by an optional closure; a query without a closure is
//! reported as unsupported in [`Capabilities`]. Call counters let tests assert
//! how often the engine reached the provider.

use std::cell::Cell;

use chrono::{DateTime, Utc};

use crate::observer::Observer;
use crate::provider::{
    Body, Capabilities, EphemerisProvider, Illumination, Libration, RawHorizontal,
    RiseSetDirection, Vector3,
};

type HorizontalFn = Box<dyn Fn(Body, DateTime<Utc>) -> RawHorizontal>;
type EquatorialFn = Box<dyn Fn(f64, f64) -> RawHorizontal>;
type IlluminationFn = Box<dyn Fn(Body, DateTime<Utc>) -> Illumination>;
type RiseSetFn = Box<dyn Fn(RiseSetDirection, DateTime<Utc>) -> Option<DateTime<Utc>>>;
type InstantFn = Box<dyn Fn(DateTime<Utc>) -> Option<DateTime<Utc>>>;
type DistanceFn = Box<dyn Fn(Body, DateTime<Utc>) -> Option<f64>>;

pub struct MockProvider {
    bodies: &'static [Body],
    horizontal: Option<HorizontalFn>,
    equatorial: Option<EquatorialFn>,
    illumination: Option<IlluminationFn>,
    rise_set: Option<RiseSetFn>,
    transit: Option<InstantFn>,
    helio: Option<DistanceFn>,
    geo: Option<DistanceFn>,
    libration: Option<Libration>,
    sidereal_hours: Option<f64>,
    eot_minutes: Option<f64>,
    horizontal_calls: Cell<usize>,
    rise_set_calls: Cell<usize>,
    helio_calls: Cell<usize>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            bodies: &Body::ALL,
            horizontal: None,
            equatorial: None,
            illumination: None,
            rise_set: None,
            transit: None,
            helio: None,
            geo: None,
            libration: None,
            sidereal_hours: None,
            eot_minutes: None,
            horizontal_calls: Cell::new(0),
            rise_set_calls: Cell::new(0),
            helio_calls: Cell::new(0),
        }
    }

    pub fn with_bodies(mut self, bodies: &'static [Body]) -> Self {
        self.bodies = bodies;
        self
    }

    pub fn with_horizontal(
        mut self,
        f: impl Fn(Body, DateTime<Utc>) -> RawHorizontal + 'static,
    ) -> Self {
        self.horizontal = Some(Box::new(f));
        self
    }

    pub fn with_equatorial(mut self, f: impl Fn(f64, f64) -> RawHorizontal + 'static) -> Self {
        self.equatorial = Some(Box::new(f));
        self
    }

    pub fn with_illumination(
        mut self,
        f: impl Fn(Body, DateTime<Utc>) -> Illumination + 'static,
    ) -> Self {
        self.illumination = Some(Box::new(f));
        self
    }

    pub fn with_rise_set(
        mut self,
        f: impl Fn(RiseSetDirection, DateTime<Utc>) -> Option<DateTime<Utc>> + 'static,
    ) -> Self {
        self.rise_set = Some(Box::new(f));
        self
    }

    pub fn with_transit(
        mut self,
        f: impl Fn(DateTime<Utc>) -> Option<DateTime<Utc>> + 'static,
    ) -> Self {
        self.transit = Some(Box::new(f));
        self
    }

    pub fn with_helio_distance(
        mut self,
        f: impl Fn(Body, DateTime<Utc>) -> Option<f64> + 'static,
    ) -> Self {
        self.helio = Some(Box::new(f));
        self
    }

    pub fn with_geo_distance(
        mut self,
        f: impl Fn(Body, DateTime<Utc>) -> Option<f64> + 'static,
    ) -> Self {
        self.geo = Some(Box::new(f));
        self
    }

    pub fn with_libration(mut self, elon_deg: f64) -> Self {
        self.libration = Some(Libration { elon_deg, elat_deg: 0.0 });
        self
    }

    pub fn with_sidereal_time(mut self, hours: f64) -> Self {
        self.sidereal_hours = Some(hours);
        self
    }

    pub fn with_equation_of_time(mut self, minutes: f64) -> Self {
        self.eot_minutes = Some(minutes);
        self
    }

    pub fn horizontal_calls(&self) -> usize {
        self.horizontal_calls.get()
    }

    pub fn rise_set_calls(&self) -> usize {
        self.rise_set_calls.get()
    }

    pub fn helio_calls(&self) -> usize {
        self.helio_calls.get()
    }

    pub fn total_calls(&self) -> usize {
        self.horizontal_calls() + self.rise_set_calls() + self.helio_calls()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn bump(c: &Cell<usize>) {
    c.set(c.get() + 1);
}

fn along_x(d: f64) -> Vector3 {
    Vector3 { x: d, y: 0.0, z: 0.0 }
}

impl EphemerisProvider for MockProvider {
    fn capabilities(&self) -> Capabilities {
        Capabilities {
            bodies: self.bodies,
            equatorial_transform: self.equatorial.is_some(),
            illumination: self.illumination.is_some(),
            rise_set: self.rise_set.is_some(),
            hour_angle: self.transit.is_some(),
            heliocentric: self.helio.is_some(),
            geocentric: self.geo.is_some(),
            libration: self.libration.is_some(),
            sidereal_time: self.sidereal_hours.is_some(),
            equation_of_time: self.eot_minutes.is_some(),
        }
    }

    fn horizontal(
        &self,
        body: Body,
        at: DateTime<Utc>,
        _observer: &Observer,
    ) -> Option<RawHorizontal> {
        bump(&self.horizontal_calls);
        self.horizontal.as_ref().map(|f| f(body, at))
    }

    fn horizontal_from_equatorial(
        &self,
        _at: DateTime<Utc>,
        _observer: &Observer,
        ra_hours: f64,
        dec_deg: f64,
    ) -> Option<RawHorizontal> {
        self.equatorial.as_ref().map(|f| f(ra_hours, dec_deg))
    }

    fn illumination(&self, body: Body, at: DateTime<Utc>) -> Option<Illumination> {
        self.illumination.as_ref().map(|f| f(body, at))
    }

    fn search_rise_set(
        &self,
        _body: Body,
        _observer: &Observer,
        direction: RiseSetDirection,
        start: DateTime<Utc>,
        _limit_days: f64,
    ) -> Option<DateTime<Utc>> {
        bump(&self.rise_set_calls);
        self.rise_set.as_ref().and_then(|f| f(direction, start))
    }

    fn search_hour_angle(
        &self,
        _body: Body,
        _observer: &Observer,
        _hour_angle: f64,
        start: DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        self.transit.as_ref().and_then(|f| f(start))
    }

    fn helio_vector(&self, body: Body, at: DateTime<Utc>) -> Option<Vector3> {
        bump(&self.helio_calls);
        self.helio.as_ref().and_then(|f| f(body, at)).map(along_x)
    }

    fn geo_vector(&self, body: Body, at: DateTime<Utc>) -> Option<Vector3> {
        self.geo.as_ref().and_then(|f| f(body, at)).map(along_x)
    }

    fn libration(&self, _at: DateTime<Utc>) -> Option<Libration> {
        self.libration
    }

    fn sidereal_time(&self, _at: DateTime<Utc>) -> Option<f64> {
        self.sidereal_hours
    }

    fn equation_of_time(&self, _at: DateTime<Utc>) -> Option<f64> {
        self.eot_minutes
    }
}
