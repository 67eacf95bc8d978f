use chrono::{DateTime, Datelike, Utc};
use chrono_english::{Dialect, parse_date_string};
use chrono_tz::Tz;
use clap::Parser;
use log::warn;

mod cli;
mod output;

use cli::Args;
use skypath::time::{local_noon, parse_time_ns, resolve_local, resolve_timezone, system_timezone};
use skypath::{EngineConfig, SkyEngine, SpaProvider, Viewport};

// ===================== MAIN =====================

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let tz = if args.utc {
        Tz::UTC
    } else {
        match args.timezone.as_str() {
            "system" => system_timezone(),
            "location" => resolve_timezone(args.longitude, args.latitude),
            other => other.parse().unwrap_or_else(|_| {
                warn!("unknown time zone {:?}, falling back to UTC", other);
                Tz::UTC
            }),
        }
    };

    // Anchor 'today' to the target timezone
    let anchor_time = Utc::now().with_timezone(&tz);
    let date = match &args.date {
        Some(s) => parse_date_string(s, anchor_time, Dialect::Us)?.with_timezone(&tz),
        None => anchor_time,
    };

    let at: DateTime<Tz> = match args.at.as_deref() {
        Some("now") => anchor_time,
        Some(at) => {
            let (h, m, s, ns) = parse_time_ns(at)?;
            let naive =
                date.date_naive().and_hms_nano_opt(h, m, s, ns).ok_or("Invalid time digits")?;
            resolve_local(&tz, naive).ok_or_else(|| {
                format!("The time {} does not exist on {} (DST gap).", at, date.date_naive())
            })?
        }
        // A date without a time renders local noon of that day
        None if args.date.is_some() => {
            local_noon(&tz, date.date_naive()).ok_or("No local noon on the requested date")?
        }
        None => anchor_time,
    };

    let config = match &args.config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };
    let mut engine = SkyEngine::with_config(SpaProvider::new(), config)?;
    let viewport = Viewport::new(args.width, args.height);

    let snap = engine.snapshot(args.latitude, args.longitude, args.elevation, at, viewport);
    if !snap.ready {
        return Err("Observer coordinates rejected; nothing to compute".into());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&snap)?);
        return Ok(());
    }

    output::print_header(&snap, &tz);
    output::print_sun(&snap, &tz);
    output::print_moon(&snap, &tz);
    output::print_segments("Sun", &snap.sun_segments, &tz);
    output::print_segments("Moon", &snap.moon_segments, &tz);
    output::print_sky_objects("Planets", &snap.planets);
    output::print_sky_objects("Stars", &snap.stars);
    if let Some(ex) = &snap.year_extremes {
        output::print_year_extremes(at.year(), ex);
    }
    output::print_metrics(&snap.metrics);

    Ok(())
}
