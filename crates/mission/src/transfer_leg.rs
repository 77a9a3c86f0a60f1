//! A single impulsive transfer leg between two parking orbits (spec §4.5).

use mission_config::EngineConfig;
use mission_core::vector::distance;
use mission_core::{Vector3, MU_SUN};
use mission_ephemeris::Ephemeris;
use thiserror::Error;

use crate::parking::outer_parking_point;

#[derive(Debug, Error, PartialEq)]
pub enum LegError {
    #[error("ephemeris lookup failed: {0}")]
    Ephemeris(#[from] mission_ephemeris::EphemerisError),
    #[error("lambert solve failed: {0}")]
    Lambert(#[from] mission_lambert::LambertError),
    #[error(
        "propagated arrival position misses the target by {miss_au} AU, \
         exceeding the 1e-4 AU tolerance"
    )]
    ArrivalMiss { miss_au: f64 },
}

/// An impulsive transfer from `source`'s outer parking point to `target`'s,
/// departing at `t_depart` and arriving at `t_arrive`.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferLeg {
    pub source: String,
    pub target: String,
    pub t_depart: f64,
    pub t_arrive: f64,
    pub r1: Vector3,
    pub v1: Vector3,
    pub r2: Vector3,
    pub v2: Vector3,
    pub prograde: bool,
    pub long_way: bool,
}

impl TransferLeg {
    pub fn duration(&self) -> f64 {
        self.t_arrive - self.t_depart
    }
}

const ARRIVAL_TOLERANCE_AU: f64 = 1e-4;

/// Build and verify a transfer leg from `source` to `target`, departing at
/// `t_dep` with time of flight `dt`. The solved Lambert velocities are
/// re-propagated with the universal-variable two-body propagator and
/// checked against the Lambert-predicted arrival point, per spec §4.5's
/// "the propagator double-checks the Lambert solution" requirement.
pub fn make_leg(
    ephemeris: &Ephemeris,
    config: &EngineConfig,
    source: &str,
    target: &str,
    t_dep: f64,
    dt: f64,
    prograde: bool,
    long_way: bool,
) -> Result<TransferLeg, LegError> {
    let source_radius = parking_radius_for(config, source);
    let target_radius = parking_radius_for(config, target);

    let r1 = outer_parking_point(ephemeris, source, t_dep, source_radius)?;
    let t_arr = t_dep + dt;
    let r2 = outer_parking_point(ephemeris, target, t_arr, target_radius)?;

    let sol = mission_lambert::solve(r1, r2, dt, prograde, long_way, MU_SUN)?;

    let (r2_check, _v2_check) = mission_propagator::propagate(r1, sol.v1, dt, MU_SUN);
    let miss_au = distance(&r2_check, &r2);
    if miss_au > ARRIVAL_TOLERANCE_AU {
        return Err(LegError::ArrivalMiss { miss_au });
    }

    Ok(TransferLeg {
        source: source.to_string(),
        target: target.to_string(),
        t_depart: t_dep,
        t_arrive: t_arr,
        r1,
        v1: sol.v1,
        r2,
        v2: sol.v2,
        prograde,
        long_way,
    })
}

fn parking_radius_for(config: &EngineConfig, planet: &str) -> f64 {
    match planet.to_ascii_lowercase().as_str() {
        "mars" => config.mars.parking_radius_au,
        _ => config.earth.parking_radius_au,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn earth_to_mars_leg_arrives_near_the_predicted_point() {
        let eph = Ephemeris::new();
        let config = EngineConfig::defaults();
        let t_dep = 45.0;
        let dt = 260.0;
        let leg = make_leg(&eph, &config, "earth", "mars", t_dep, dt, true, false).unwrap();
        assert_eq!(leg.t_depart, t_dep);
        assert_eq!(leg.t_arrive, t_dep + dt);
        assert!(leg.duration() > 0.0);
    }
}
