//! Command-Line Interface Module
//!
//! Handles argument parsing and validation for the skypath binary.

use clap::Parser;
use std::path::PathBuf;

// ===================== CLI =====================

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    /// Observer latitude in decimal degrees (-90 to 90)
    #[arg(long, allow_hyphen_values = true, value_parser = parse_latitude, env = "SKYPATH_LATITUDE")]
    pub latitude: f64,
    /// Observer longitude in decimal degrees (-180 to 180)
    #[arg(long, allow_hyphen_values = true, value_parser = parse_longitude, env = "SKYPATH_LONGITUDE")]
    pub longitude: f64,
    /// Observer elevation above mean sea level (meters, may be negative)
    #[arg(
        long,
        default_value_t = 0.0,
        allow_hyphen_values = true,
        value_parser = parse_elevation,
        env = "SKYPATH_ELEVATION"
    )]
    pub elevation: f64,
    /// Time zone to use ("system", "location", or IANA time zone name)
    #[arg(long, default_value = "system", env = "SKYPATH_TIMEZONE")]
    pub timezone: String,

    /// Date for calculations (e.g., "2024-12-25" or "today"); defaults to today
    #[arg(long)]
    pub date: Option<String>,
    /// Instant to render (HH:MM[:SS[.fffffffff]] or "now"); defaults to now
    #[arg(long)]
    pub at: Option<String>,
    /// Use UTC time zone
    #[arg(long)]
    pub utc: bool,

    /// Viewport width used to project path strings
    #[arg(long, default_value_t = 1440.0, value_parser = parse_positive_f64)]
    pub width: f64,
    /// Viewport height used to project path strings
    #[arg(long, default_value_t = 360.0, value_parser = parse_positive_f64)]
    pub height: f64,

    /// Print the full snapshot as JSON
    #[arg(long)]
    pub json: bool,
    /// Engine tuning file (TOML)
    #[arg(long, env = "SKYPATH_CONFIG")]
    pub config: Option<PathBuf>,
}

// ===================== CLI VALUE PARSERS =====================

fn parse_latitude(s: &str) -> Result<f64, String> {
    let v: f64 = s.parse().map_err(|_| format!("Invalid number: {}", s))?;
    if !(-90.0..=90.0).contains(&v) {
        return Err(format!("Latitude must be between -90 and 90, got {}", v));
    }
    Ok(v)
}

fn parse_longitude(s: &str) -> Result<f64, String> {
    let v: f64 = s.parse().map_err(|_| format!("Invalid number: {}", s))?;
    if !(-180.0..=180.0).contains(&v) {
        return Err(format!("Longitude must be between -180 and 180, got {}", v));
    }
    Ok(v)
}

fn parse_elevation(s: &str) -> Result<f64, String> {
    let v: f64 = s.parse().map_err(|_| format!("Invalid number: {}", s))?;
    if !v.is_finite() {
        return Err(format!("Elevation must be finite, got {}", v));
    }
    Ok(v)
}

fn parse_positive_f64(s: &str) -> Result<f64, String> {
    let v: f64 = s.parse().map_err(|_| format!("Invalid number: {}", s))?;
    if !(v.is_finite() && v > 0.0) {
        return Err(format!("Value must be positive, got {}", v));
    }
    Ok(v)
}
