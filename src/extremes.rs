//! Yearly Extremes Module
//!
//! Samples the Sun on the 15th of every month to find the year's range of
//! noon altitude, day length and Earth-Sun distance for one location. The
//! results are memoized per `(year, lat, lon)` for the lifetime of the cache.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use log::debug;
use serde::Serialize;

use crate::observer::Observer;
use crate::provider::{Body, EphemerisProvider, RiseSetDirection};
use crate::sampler::sample_position;
use crate::time::{local_noon, start_of_local_day};

/// Search window for the monthly sunrise and sunset, in days
const MONTHLY_SEARCH_DAYS: f64 = 1.0;

// ===================== TYPES =====================

/// Closed range of observed values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Extent {
    pub min: f64,
    pub max: f64,
}

impl Extent {
    /// Widen an optional extent to include `value`.
    pub fn include(extent: Option<Extent>, value: f64) -> Option<Extent> {
        if !value.is_finite() {
            return extent;
        }
        Some(match extent {
            None => Extent { min: value, max: value },
            Some(e) => Extent { min: e.min.min(value), max: e.max.max(value) },
        })
    }
}

/// Yearly ranges for one location. Each extent is `None` until some month
/// contributed a value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct YearExtremes {
    /// Sun altitude at local noon
    pub altitude_deg: Option<Extent>,
    /// Sunrise-to-sunset length in milliseconds
    pub day_length_ms: Option<Extent>,
    /// Earth heliocentric distance
    pub earth_distance_au: Option<Extent>,
}

// ===================== COMPUTATION =====================

/// Compute the extremes for `year` with a fresh round of provider queries.
///
/// # Arguments
/// * `tz` - Timezone whose local noon and midnight anchor each month
pub fn compute_year_extremes<P: EphemerisProvider + ?Sized>(
    provider: &P,
    observer: &Observer,
    year: i32,
    tz: &Tz,
) -> YearExtremes {
    let caps = provider.capabilities();
    let mut ex = YearExtremes::default();

    for month in 1..=12 {
        let Some(date) = NaiveDate::from_ymd_opt(year, month, 15) else {
            continue;
        };
        let Some(noon) = local_noon(tz, date) else {
            debug!("{}: no local noon in {}", date, tz);
            continue;
        };
        let noon = noon.with_timezone(&Utc);

        if let Some(pos) = sample_position(provider, Body::Sun, noon, observer) {
            ex.altitude_deg = Extent::include(ex.altitude_deg, pos.altitude_deg);
        }

        if caps.rise_set
            && let Some(midnight) = start_of_local_day(tz, date)
        {
            let rise = provider.search_rise_set(
                Body::Sun,
                observer,
                RiseSetDirection::Rise,
                midnight.with_timezone(&Utc),
                MONTHLY_SEARCH_DAYS,
            );
            let set = rise.and_then(|r| {
                provider.search_rise_set(
                    Body::Sun,
                    observer,
                    RiseSetDirection::Set,
                    r,
                    MONTHLY_SEARCH_DAYS,
                )
            });
            if let (Some(r), Some(s)) = (rise, set) {
                let len_ms = (s - r).num_milliseconds();
                if len_ms > 0 {
                    ex.day_length_ms = Extent::include(ex.day_length_ms, len_ms as f64);
                }
            }
        }

        if caps.heliocentric
            && let Some(d) = provider.helio_distance_au(Body::Earth, noon)
        {
            ex.earth_distance_au = Extent::include(ex.earth_distance_au, d);
        }
    }
    ex
}

// ===================== CACHE =====================

/// Lazily filled map from `"{year}-{lat:.4}-{lon:.4}"` to [`YearExtremes`].
///
/// Entries are never evicted; [`clear`](Self::clear) drops them all.
#[derive(Debug, Default)]
pub struct YearExtremesCache {
    entries: HashMap<String, YearExtremes>,
}

impl YearExtremesCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached extremes for `(year, observer)`, computing them on
    /// first use. A hit makes no provider queries.
    pub fn get_or_compute<P: EphemerisProvider + ?Sized>(
        &mut self,
        provider: &P,
        observer: &Observer,
        year: i32,
        tz: &Tz,
    ) -> &YearExtremes {
        match self.entries.entry(observer.cache_key(year)) {
            Entry::Occupied(e) => {
                debug!("year extremes cache hit: {}", e.key());
                e.into_mut()
            }
            Entry::Vacant(e) => {
                debug!("year extremes cache miss: {}", e.key());
                e.insert(compute_year_extremes(provider, observer, year, tz))
            }
        }
    }

    pub fn get(&self, observer: &Observer, year: i32) -> Option<&YearExtremes> {
        self.entries.get(&observer.cache_key(year))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ===================== TESTS =====================
