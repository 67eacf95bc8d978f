//! Output Formatting Module
//!
//! Terminal rendering of a [`SkySnapshot`].

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use skypath::engine::{HudMetrics, RiseSet, SkyObjectPoint, SkySnapshot};
use skypath::extremes::YearExtremes;
use skypath::segment::{PathSegment, SegmentTag};
use skypath::time::format_hms;

fn local(t: DateTime<Utc>, tz: &Tz) -> String {
    t.with_timezone(tz).format("%H:%M:%S %Z").to_string()
}

fn percent(v: Option<f64>) -> String {
    v.map_or_else(|| "n/a".to_string(), |p| format!("{:5.1}%", p * 100.0))
}

// ===================== HEADER =====================

pub fn print_header(snap: &SkySnapshot, tz: &Tz) {
    if let Some(obs) = snap.observer {
        println!(
            "Location : lat={:.6}, lon={:.6}, elev={:.0} m",
            obs.lat(),
            obs.lon(),
            obs.elevation_m()
        );
    }
    println!("Timezone : {}", tz);
    if let Some(at) = snap.at {
        println!("Instant  : {}", at.with_timezone(tz).format("%Y-%m-%d %H:%M:%S%.f %Z"));
    }
    println!();
}

// ===================== SUN & MOON =====================

/// Print the Sun's live position and today's events.
///
/// # Arguments
/// * `snap` - Snapshot to print
/// * `tz` - Timezone used for clock times
pub fn print_sun(snap: &SkySnapshot, tz: &Tz) {
    let Some(sun) = snap.sun else {
        println!("Sun position unavailable.");
        return;
    };
    println!("Sun");
    println!("  Azimuth     : {:8.3}°", sun.azimuth_deg);
    println!("  Altitude    : {:8.3}°", sun.altitude_deg);
    if let (Some(zone), Some(band)) = (snap.sun_zone, snap.sunlight_band) {
        println!("  Zone        : {} ({})", zone.label(), band.label());
    }

    print_rise_set("  ", snap.sun_rise_set, tz);
    if let Some(noon) = snap.solar_noon {
        println!("  Solar noon  : {}", local(noon, tz));
    }
    if let Some(RiseSet { rise: Some(r), set: Some(s) }) = snap.sun_rise_set
        && s > r
    {
        println!("  Daylight    : {}", format_hms((s - r).num_seconds()));
    }
}

pub fn print_moon(snap: &SkySnapshot, tz: &Tz) {
    let Some(moon) = snap.moon else {
        return;
    };
    println!();
    println!("Moon");
    println!("  Azimuth     : {:8.3}°", moon.azimuth_deg);
    println!("  Altitude    : {:8.3}°", moon.altitude_deg);
    if let Some(phase) = snap.moon_phase {
        println!("  Phase       : {} ({:.1}% lit)", phase.label(), phase.fraction * 100.0);
    }
    print_rise_set("  ", snap.moon_rise_set, tz);
}

fn print_rise_set(indent: &str, rs: Option<RiseSet>, tz: &Tz) {
    let Some(rs) = rs else {
        return;
    };
    match rs.rise {
        Some(t) => println!("{}Rise        : {}", indent, local(t, tz)),
        None => println!("{}Rise        : none within search window", indent),
    }
    match rs.set {
        Some(t) => println!("{}Set         : {}", indent, local(t, tz)),
        None => println!("{}Set         : none within search window", indent),
    }
}

// ===================== PATHS =====================

fn segment_label(seg: &PathSegment) -> String {
    match seg.tag {
        SegmentTag::Zone { zone } => zone.label().to_string(),
        SegmentTag::Phase { average_phase: Some(f) } => format!("phase {:.2}", f),
        SegmentTag::Phase { average_phase: None } => "phase n/a".to_string(),
    }
}

/// Print a one-line summary per path segment.
pub fn print_segments(name: &str, segments: &[PathSegment], tz: &Tz) {
    if segments.is_empty() {
        return;
    }
    println!();
    println!("{} path ({} segments)", name, segments.len());
    for seg in segments {
        let (Some(first), Some(last)) = (seg.points.first(), seg.points.last()) else {
            continue;
        };
        println!(
            "  {:<10} {} - {}  {:3} pts  {} edge",
            segment_label(seg),
            first.time.with_timezone(tz).format("%H:%M"),
            last.time.with_timezone(tz).format("%H:%M"),
            seg.points.len(),
            seg.edge_count()
        );
    }
}

// ===================== SKY OBJECTS =====================

pub fn print_sky_objects(title: &str, objects: &[SkyObjectPoint]) {
    if objects.is_empty() {
        return;
    }
    println!();
    println!("{} above the horizon: {}", title, objects.len());
    for o in objects {
        println!(
            "  {:<12} Az: {:7.2}°  Alt: {:6.2}°  mag {:5.2}",
            o.name, o.azimuth_deg, o.altitude_deg, o.magnitude
        );
    }
}

// ===================== YEAR & METRICS =====================

pub fn print_year_extremes(year: i32, ex: &YearExtremes) {
    println!();
    println!("=== Year {} ===", year);
    if let Some(a) = ex.altitude_deg {
        println!("  Noon altitude : {:.2}° - {:.2}°", a.min, a.max);
    }
    if let Some(d) = ex.day_length_ms {
        println!(
            "  Day length    : {} - {}",
            format_hms((d.min / 1000.0) as i64),
            format_hms((d.max / 1000.0) as i64)
        );
    }
    if let Some(e) = ex.earth_distance_au {
        println!("  Sun distance  : {:.5} - {:.5} AU", e.min, e.max);
    }
}

/// Print the HUD metrics; unavailable values are skipped.
pub fn print_metrics(m: &HudMetrics) {
    println!();
    println!("=== Metrics ===");
    println!("  Day climb     : {}", percent(m.day_climb));
    println!("  Day arc       : {}", percent(m.day_arc));
    println!("  Year height   : {}", percent(m.year_height));
    if let Some(o) = m.earth_orbit {
        println!("  Earth orbit   : {:.3} Mkm ({})", o.distance_mkm, percent(o.percent));
    }
    if let Some(o) = m.moon_orbit {
        println!("  Moon orbit    : {:.0} km ({})", o.distance_km, percent(o.percent));
    }
    match m.air_mass {
        Some(am) => println!("  Air mass      : {:8.2}", am),
        None => println!("  Air mass      : n/a (Sun below horizon)"),
    }
    if let Some(i) = m.insolation {
        println!("  Insolation    : {:6.0} W/m² ({})", i.watts_per_m2, percent(Some(i.fraction)));
    }
    if let Some(label) = &m.equation_of_time_label {
        println!("  Eq. of time   : {}", label);
    }
    if let Some(st) = m.sidereal_time_hours {
        println!("  Sidereal time : {:.4} h", st);
    }
    if let Some(v) = m.star_visibility {
        println!("  Star opacity  : {:.2}", v);
    }
    if let Some(shift) = m.moon_shift {
        println!("  Moon shift    : {:+.2}", shift);
    }
    if let Some(tilt) = m.moon_tilt_deg {
        println!("  Moon tilt     : {:+.2}°", tilt);
    }
}
