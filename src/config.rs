//! Engine Configuration Module
//!
//! Tuning knobs for the engine, loadable from a TOML file. Every key is
//! optional; missing keys take their defaults.
//!
//! ```toml
//! sample_step_minutes = 10
//! wrap_threshold_deg = 300.0
//! rise_set_search_days = 1.0
//! min_visible_altitude_deg = -5.0
//! max_planet_magnitude = 5.0
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::path::DEFAULT_STEP_MINUTES;
use crate::segment::DEFAULT_WRAP_THRESHOLD_DEG;
use crate::solar::MAX_SEARCH_DAYS;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid value for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

fn invalid(key: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid { key, reason: reason.into() }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Day-path sampling step; must divide a day evenly
    pub sample_step_minutes: u32,
    /// Azimuth jump treated as a 360° wraparound
    pub wrap_threshold_deg: f64,
    /// How far ahead the daily rise/set search looks, in days (at most 370)
    pub rise_set_search_days: f64,
    /// Planets and stars below this altitude are not reported
    pub min_visible_altitude_deg: f64,
    /// Planets fainter than this magnitude are not reported
    pub max_planet_magnitude: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_step_minutes: DEFAULT_STEP_MINUTES,
            wrap_threshold_deg: DEFAULT_WRAP_THRESHOLD_DEG,
            rise_set_search_days: 1.0,
            min_visible_altitude_deg: -5.0,
            max_planet_magnitude: 5.0,
        }
    }
}

impl EngineConfig {
    /// Load and validate configuration from a TOML file.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if the file cannot be read, is not valid TOML,
    /// or holds an out-of-range value.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let step = self.sample_step_minutes;
        if !(1..=60).contains(&step) || 1440 % step != 0 {
            return Err(invalid(
                "sample_step_minutes",
                format!("{} must be 1-60 and divide 1440", step),
            ));
        }

        let wrap = self.wrap_threshold_deg;
        if !(wrap > 180.0 && wrap < 360.0) {
            return Err(invalid("wrap_threshold_deg", format!("{} must lie in (180, 360)", wrap)));
        }

        let days = self.rise_set_search_days;
        if !(days > 0.0 && days <= MAX_SEARCH_DAYS) {
            return Err(invalid(
                "rise_set_search_days",
                format!("{} must lie in (0, {}]", days, MAX_SEARCH_DAYS),
            ));
        }

        if !self.min_visible_altitude_deg.is_finite()
            || !(-90.0..=90.0).contains(&self.min_visible_altitude_deg)
        {
            return Err(invalid("min_visible_altitude_deg", "must be within [-90, 90]"));
        }
        if !self.max_planet_magnitude.is_finite() {
            return Err(invalid("max_planet_magnitude", "must be finite"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let c = EngineConfig::default();
        assert!(c.validate().is_ok());
        assert_eq!(c.sample_step_minutes, 10);
        assert_eq!(c.wrap_threshold_deg, 300.0);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let c = EngineConfig::from_toml_str("sample_step_minutes = 15\n").unwrap();
        assert_eq!(c.sample_step_minutes, 15);
        assert_eq!(c.max_planet_magnitude, 5.0);
        assert_eq!(EngineConfig::from_toml_str("").unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_rejects_bad_values() {
        for toml in [
            "sample_step_minutes = 7",
            "sample_step_minutes = 0",
            "sample_step_minutes = 120",
            "wrap_threshold_deg = 180.0",
            "wrap_threshold_deg = 360.0",
            "rise_set_search_days = 0.0",
            "rise_set_search_days = 1e12",
            "rise_set_search_days = 370.5",
            "rise_set_search_days = nan",
            "min_visible_altitude_deg = -95.0",
        ] {
            assert!(
                matches!(EngineConfig::from_toml_str(toml), Err(ConfigError::Invalid { .. })),
                "accepted {}",
                toml
            );
        }
    }

    #[test]
    fn test_search_window_upper_bound() {
        let c = EngineConfig::from_toml_str("rise_set_search_days = 370.0").unwrap();
        assert_eq!(c.rise_set_search_days, MAX_SEARCH_DAYS);
        let err = EngineConfig::from_toml_str("rise_set_search_days = 1e12").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "rise_set_search_days", .. }));
    }

    #[test]
    fn test_rejects_unknown_keys_and_bad_syntax() {
        assert!(matches!(EngineConfig::from_toml_str("step = 10"), Err(ConfigError::Parse(_))));
        assert!(matches!(EngineConfig::from_toml_str("= ="), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file() {
        let err = EngineConfig::from_file("/nonexistent/skypath.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
