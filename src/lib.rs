//! skypath
//!
//! Computes what a sky panorama needs for one observer and instant: horizontal
//! positions of the Sun, Moon, planets and bright stars, sampled day paths,
//! render-safe path segments that never draw across the 360°/0° azimuth seam,
//! rise/set events, yearly extremes and the derived HUD metrics.
//!
//! Ephemeris data comes from an [`EphemerisProvider`]; [`SpaProvider`] is the
//! built-in Sun-only implementation.

pub mod catalog;
pub mod config;
pub mod engine;
pub mod extremes;
pub mod metrics;
pub mod moon;
pub mod observer;
pub mod path;
pub mod provider;
pub mod sampler;
pub mod segment;
pub mod solar;
pub mod time;
pub mod zone;

#[cfg(test)]
mod mock;

pub use config::{ConfigError, EngineConfig};
pub use engine::{SkyEngine, SkySnapshot};
pub use observer::{Observer, ObserverError};
pub use provider::{Body, Capabilities, EphemerisProvider};
pub use segment::Viewport;
pub use solar::SpaProvider;
pub use zone::{SunlightBand, Zone};
