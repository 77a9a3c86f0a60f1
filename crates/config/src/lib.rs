//! Engine tunables, validated at construction (spec §9: "they must be
//! validated at construction so that `parking_radius > visual_radius +
//! safety_margin + collision_radius`").
//!
//! Adapted from the teacher's `solar_config` crate, which parses
//! YAML/TOML manifests into validated structs with `thiserror`-wrapped
//! errors; this crate keeps that shape (serde + TOML + explicit
//! validation pass) but carries the engine's own tunables instead of
//! vehicle/propulsion catalogs.

mod parking;
mod search;

use std::path::Path;

pub use parking::{ParkingBodyConfig, ParkingConfigError};
pub use search::SearchConfig;
use serde::Deserialize;
use thiserror::Error;

/// Top-level engine configuration: one [`ParkingBodyConfig`] per body plus
/// the [`SearchConfig`] tunables for the launch-window search.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    pub earth: ParkingBodyConfig,
    pub mars: ParkingBodyConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid parking configuration for {body}: {source}")]
    Parking {
        body: &'static str,
        #[source]
        source: ParkingConfigError,
    },
}

impl EngineConfig {
    /// Default tunables matching spec.md's worked constants and §9's
    /// engineering-choice notes (Δv budget, clearance refinement trigger).
    pub fn defaults() -> Self {
        Self {
            earth: parking::earth_defaults(),
            mars: parking::mars_defaults(),
            search: SearchConfig::default(),
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config: EngineConfig = toml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.earth.validate().map_err(|source| ConfigError::Parking {
            body: "earth",
            source,
        })?;
        self.mars.validate().map_err(|source| ConfigError::Parking {
            body: "mars",
            source,
        })?;
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(EngineConfig::defaults().validate().is_ok());
    }

    #[test]
    fn rejects_parking_radius_inside_exclusion_zone() {
        let mut cfg = EngineConfig::defaults();
        cfg.earth.parking_radius_au = 1e-9;
        assert!(cfg.validate().is_err());
    }
}
