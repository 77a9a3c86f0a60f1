use serde::Deserialize;
use thiserror::Error;

/// Per-body radii and nominal parking period feeding the clearance checker
/// (spec §4.6) and the parking-orbit model (spec §4.7).
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ParkingBodyConfig {
    /// Planet's visual/physical radius, AU.
    pub visual_radius_au: f64,
    /// Safety margin added on top of the visual radius, AU.
    pub safety_margin_au: f64,
    /// Spacecraft collision radius, AU.
    pub spacecraft_collision_radius_au: f64,
    /// Radius of the circular parking orbit around this body, AU.
    pub parking_radius_au: f64,
    /// Nominal parking-orbit period before the §4.7 integer-revolution fit, days.
    pub nominal_parking_period_days: f64,
}

#[derive(Debug, Error, PartialEq)]
pub enum ParkingConfigError {
    #[error(
        "parking_radius_au ({parking_radius}) must exceed the exclusion radius \
         visual+margin+collision ({exclusion})"
    )]
    ParkingRadiusInsideExclusionZone { parking_radius: f64, exclusion: f64 },
    #[error("nominal_parking_period_days must be positive, got {0}")]
    NonPositivePeriod(f64),
}

impl ParkingBodyConfig {
    /// Exclusion radius used by the clearance checker: visual + margin + collision.
    pub fn exclusion_radius_au(&self) -> f64 {
        self.visual_radius_au + self.safety_margin_au + self.spacecraft_collision_radius_au
    }

    pub fn validate(&self) -> Result<(), ParkingConfigError> {
        let exclusion = self.exclusion_radius_au();
        if self.parking_radius_au <= exclusion {
            return Err(ParkingConfigError::ParkingRadiusInsideExclusionZone {
                parking_radius: self.parking_radius_au,
                exclusion,
            });
        }
        if self.nominal_parking_period_days <= 0.0 {
            return Err(ParkingConfigError::NonPositivePeriod(
                self.nominal_parking_period_days,
            ));
        }
        Ok(())
    }
}

/// Earth's physical radius is ~6371 km; Mars's is ~3389.5 km.
const AU_KM: f64 = 149_597_870.7;

pub fn earth_defaults() -> ParkingBodyConfig {
    ParkingBodyConfig {
        visual_radius_au: 6371.0 / AU_KM,
        safety_margin_au: 2.0e-4,
        spacecraft_collision_radius_au: 1.0e-5,
        parking_radius_au: 0.01,
        nominal_parking_period_days: 1.0,
    }
}

pub fn mars_defaults() -> ParkingBodyConfig {
    ParkingBodyConfig {
        visual_radius_au: 3389.5 / AU_KM,
        safety_margin_au: 2.0e-4,
        spacecraft_collision_radius_au: 1.0e-5,
        parking_radius_au: 0.008,
        nominal_parking_period_days: 1.2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_exclusion_radius_is_smaller_than_parking_radius() {
        let earth = earth_defaults();
        assert!(earth.parking_radius_au > earth.exclusion_radius_au());
        let mars = mars_defaults();
        assert!(mars.parking_radius_au > mars.exclusion_radius_au());
    }
}
