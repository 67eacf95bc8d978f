//! Sky Engine Module
//!
//! Runs the whole pipeline for one `(observer, instant)`: live positions,
//! day paths and their segments, rise/set events, yearly extremes and the
//! HUD metrics, collected into a serializable [`SkySnapshot`].

use chrono::{DateTime, Datelike, Utc};
use chrono_tz::Tz;
use log::{debug, warn};
use serde::Serialize;

use crate::catalog::{BRIGHT_STARS, PLANETS, UNKNOWN_MAGNITUDE, body_color};
use crate::config::{ConfigError, EngineConfig};
use crate::extremes::{YearExtremes, YearExtremesCache};
use crate::metrics::{self, EarthOrbit, Insolation, MoonOrbit};
use crate::moon::{MoonPhase, moon_tilt};
use crate::observer::Observer;
use crate::path::{PathPoint, build_day_path};
use crate::provider::{Body, EphemerisProvider, RiseSetDirection};
use crate::sampler::{HorizontalPosition, sample_equatorial, sample_position};
use crate::segment::{PathSegment, Viewport, segment_by_phase, segment_by_zone};
use crate::time::start_of_local_day;
use crate::zone::{SunlightBand, Zone};

// ===================== SNAPSHOT TYPES =====================

/// Next rise and set after local midnight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RiseSet {
    pub rise: Option<DateTime<Utc>>,
    pub set: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    Rise,
    Set,
}

/// Where on the horizon a rise or set happens.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiseSetMarker {
    pub body: Body,
    pub kind: MarkerKind,
    pub time: DateTime<Utc>,
    pub azimuth_deg: f64,
    pub altitude_deg: f64,
}

/// A planet or star above the visibility cut.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SkyObjectPoint {
    pub name: &'static str,
    pub azimuth_deg: f64,
    pub altitude_deg: f64,
    pub magnitude: f64,
    pub color: &'static str,
}

/// Derived values for the heads-up display. `None` means unavailable.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HudMetrics {
    pub day_climb: Option<f64>,
    pub day_arc: Option<f64>,
    pub year_height: Option<f64>,
    pub earth_orbit: Option<EarthOrbit>,
    pub moon_orbit: Option<MoonOrbit>,
    pub air_mass: Option<f64>,
    pub insolation: Option<Insolation>,
    pub moon_shift: Option<f64>,
    pub moon_tilt_deg: Option<f64>,
    pub moon_glow: Option<f64>,
    pub star_visibility: Option<f64>,
    pub equation_of_time_min: Option<f64>,
    pub equation_of_time_label: Option<String>,
    pub sidereal_time_hours: Option<f64>,
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkySnapshot {
    /// False when the observer was invalid; all other fields are then empty
    pub ready: bool,
    pub observer: Option<Observer>,
    pub at: Option<DateTime<Utc>>,
    pub timezone: Option<String>,
    pub viewport: Viewport,
    pub sun: Option<HorizontalPosition>,
    pub sun_zone: Option<Zone>,
    pub sunlight_band: Option<SunlightBand>,
    pub moon: Option<HorizontalPosition>,
    pub moon_phase: Option<MoonPhase>,
    pub sun_path: Vec<PathPoint>,
    pub moon_path: Vec<PathPoint>,
    pub sun_segments: Vec<PathSegment>,
    pub moon_segments: Vec<PathSegment>,
    pub planets: Vec<SkyObjectPoint>,
    pub stars: Vec<SkyObjectPoint>,
    pub sun_rise_set: Option<RiseSet>,
    pub moon_rise_set: Option<RiseSet>,
    pub solar_noon: Option<DateTime<Utc>>,
    pub markers: Vec<RiseSetMarker>,
    pub year_extremes: Option<YearExtremes>,
    pub metrics: HudMetrics,
}

impl SkySnapshot {
    pub fn not_ready(viewport: Viewport) -> Self {
        Self {
            ready: false,
            observer: None,
            at: None,
            timezone: None,
            viewport,
            sun: None,
            sun_zone: None,
            sunlight_band: None,
            moon: None,
            moon_phase: None,
            sun_path: Vec::new(),
            moon_path: Vec::new(),
            sun_segments: Vec::new(),
            moon_segments: Vec::new(),
            planets: Vec::new(),
            stars: Vec::new(),
            sun_rise_set: None,
            moon_rise_set: None,
            solar_noon: None,
            markers: Vec::new(),
            year_extremes: None,
            metrics: HudMetrics::default(),
        }
    }
}

// ===================== ENGINE =====================

/// Owns the provider, the configuration and the yearly extremes cache.
pub struct SkyEngine<P> {
    provider: P,
    config: EngineConfig,
    cache: YearExtremesCache,
}

impl<P: EphemerisProvider> SkyEngine<P> {
    pub fn new(provider: P) -> Self {
        Self { provider, config: EngineConfig::default(), cache: YearExtremesCache::new() }
    }

    /// # Errors
    /// Returns [`ConfigError::Invalid`] if `config` fails validation.
    pub fn with_config(provider: P, config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { provider, config, cache: YearExtremesCache::new() })
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn cache(&self) -> &YearExtremesCache {
        &self.cache
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Full recompute from raw coordinates.
    ///
    /// Invalid coordinates yield [`SkySnapshot::not_ready`] instead of an error.
    pub fn snapshot(
        &mut self,
        lat: f64,
        lon: f64,
        elevation_m: f64,
        at: DateTime<Tz>,
        viewport: Viewport,
    ) -> SkySnapshot {
        match Observer::new(lat, lon, elevation_m) {
            Ok(observer) => self.snapshot_for(&observer, at, viewport),
            Err(e) => {
                warn!("sky snapshot skipped: {}", e);
                SkySnapshot::not_ready(viewport)
            }
        }
    }

    /// Full recompute for a validated observer.
    pub fn snapshot_for(
        &mut self,
        observer: &Observer,
        at: DateTime<Tz>,
        viewport: Viewport,
    ) -> SkySnapshot {
        let tz = at.timezone();
        let now = at.with_timezone(&Utc);
        let caps = self.provider.capabilities();
        let cfg = self.config.clone();
        let p = &self.provider;

        let sun = sample_position(p, Body::Sun, now, observer);
        let moon = sample_position(p, Body::Moon, now, observer);
        let moon_phase = MoonPhase::compute(p, now);

        let sun_path = build_day_path(p, observer, Body::Sun, at, cfg.sample_step_minutes);
        let moon_path = build_day_path(p, observer, Body::Moon, at, cfg.sample_step_minutes);
        let sun_segments = segment_by_zone(&sun_path, &viewport, cfg.wrap_threshold_deg);
        let moon_segments = segment_by_phase(&moon_path, &viewport, cfg.wrap_threshold_deg);

        let midnight = start_of_local_day(&tz, at.date_naive()).unwrap_or(at).with_timezone(&Utc);
        let sun_rise_set = self.rise_set(Body::Sun, observer, midnight);
        let moon_rise_set = self.rise_set(Body::Moon, observer, midnight);
        let solar_noon = if caps.hour_angle {
            p.search_hour_angle(Body::Sun, observer, 0.0, midnight)
        } else {
            None
        };

        let mut markers = Vec::new();
        for (body, rs) in [(Body::Sun, sun_rise_set), (Body::Moon, moon_rise_set)] {
            let Some(rs) = rs else { continue };
            let events = [(MarkerKind::Rise, rs.rise), (MarkerKind::Set, rs.set)];
            for (kind, time) in events {
                if let Some(time) = time
                    && let Some(pos) = sample_position(p, body, time, observer)
                {
                    markers.push(RiseSetMarker {
                        body,
                        kind,
                        time,
                        azimuth_deg: pos.azimuth_deg,
                        altitude_deg: pos.altitude_deg,
                    });
                }
            }
        }

        let planets = self.visible_planets(observer, now);
        let stars = self.visible_stars(observer, now);

        let year = at.year();
        let year_extremes = Some(*self.cache.get_or_compute(&self.provider, observer, year, &tz));
        let p = &self.provider;

        let earth_distance = if caps.heliocentric {
            p.helio_distance_au(Body::Earth, now)
        } else {
            None
        };
        let moon_distance = if caps.geocentric && caps.supports_body(Body::Moon) {
            p.geo_distance_au(Body::Moon, now)
        } else {
            None
        };
        let eot = if caps.equation_of_time { p.equation_of_time(now) } else { None };
        let eot = eot.filter(|m| m.is_finite());
        let sidereal = if caps.sidereal_time { p.sidereal_time(now) } else { None };
        let sidereal = sidereal.filter(|h| h.is_finite());

        let sun_alt = sun.map(|s| s.altitude_deg);
        let ex = year_extremes.as_ref();
        let metrics = HudMetrics {
            day_climb: sun_alt.and_then(|a| metrics::day_climb(a, &sun_path)),
            day_arc: sun_rise_set.and_then(|rs| metrics::day_arc(rs.rise, rs.set, ex)),
            year_height: sun_alt.and_then(|a| metrics::year_height(a, ex)),
            earth_orbit: metrics::earth_orbit(earth_distance, ex),
            moon_orbit: metrics::moon_orbit(moon_distance),
            air_mass: sun_alt.and_then(metrics::air_mass),
            insolation: sun_alt.map(metrics::insolation),
            moon_shift: moon_phase.map(|m| m.shift()),
            moon_tilt_deg: moon_tilt(p, now),
            moon_glow: sun_alt.map(metrics::moon_glow),
            star_visibility: sun_alt.map(metrics::star_visibility),
            equation_of_time_min: eot,
            equation_of_time_label: eot.and_then(metrics::equation_of_time_label),
            sidereal_time_hours: sidereal,
        };

        debug!(
            "snapshot {} at {}: {} sun / {} moon segments, {} planets, {} stars",
            observer.cache_key(year),
            now,
            sun_segments.len(),
            moon_segments.len(),
            planets.len(),
            stars.len()
        );

        SkySnapshot {
            ready: true,
            observer: Some(*observer),
            at: Some(now),
            timezone: Some(tz.name().to_string()),
            viewport,
            sun,
            sun_zone: sun_alt.map(Zone::classify),
            sunlight_band: sun_alt.map(SunlightBand::classify),
            moon,
            moon_phase,
            sun_path,
            moon_path,
            sun_segments,
            moon_segments,
            planets,
            stars,
            sun_rise_set,
            moon_rise_set,
            solar_noon,
            markers,
            year_extremes,
            metrics,
        }
    }

    fn rise_set(&self, body: Body, observer: &Observer, from: DateTime<Utc>) -> Option<RiseSet> {
        let caps = self.provider.capabilities();
        if !caps.rise_set || !caps.supports_body(body) {
            return None;
        }
        let days = self.config.rise_set_search_days;
        let search = |dir| self.provider.search_rise_set(body, observer, dir, from, days);
        Some(RiseSet { rise: search(RiseSetDirection::Rise), set: search(RiseSetDirection::Set) })
    }

    fn visible_planets(&self, observer: &Observer, at: DateTime<Utc>) -> Vec<SkyObjectPoint> {
        let caps = self.provider.capabilities();
        PLANETS
            .iter()
            .filter_map(|&body| {
                let pos = sample_position(&self.provider, body, at, observer)?;
                let magnitude = if caps.illumination && body != Body::Pluto {
                    self.provider.illumination(body, at).and_then(|i| i.magnitude)
                } else {
                    None
                };
                Some(SkyObjectPoint {
                    name: body.name(),
                    azimuth_deg: pos.azimuth_deg,
                    altitude_deg: pos.altitude_deg,
                    magnitude: magnitude.unwrap_or(UNKNOWN_MAGNITUDE),
                    color: body_color(body),
                })
            })
            .filter(|o| {
                o.altitude_deg > self.config.min_visible_altitude_deg
                    && o.magnitude < self.config.max_planet_magnitude
            })
            .collect()
    }

    fn visible_stars(&self, observer: &Observer, at: DateTime<Utc>) -> Vec<SkyObjectPoint> {
        BRIGHT_STARS
            .iter()
            .filter_map(|star| {
                let pos =
                    sample_equatorial(&self.provider, at, observer, star.ra_hours, star.dec_deg)?;
                Some(SkyObjectPoint {
                    name: star.name,
                    azimuth_deg: pos.azimuth_deg,
                    altitude_deg: pos.altitude_deg,
                    magnitude: star.magnitude,
                    color: star.color,
                })
            })
            .filter(|o| o.altitude_deg > self.config.min_visible_altitude_deg)
            .collect()
    }
}

// ===================== TESTS =====================
