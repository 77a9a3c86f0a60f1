//! Clearance checking: does a transfer leg pass too close to a planet's
//! exclusion zone along the way (spec §4.6)?

use mission_config::EngineConfig;
use mission_core::vector::distance;
use mission_core::MU_SUN;
use mission_ephemeris::Ephemeris;

use crate::transfer_leg::TransferLeg;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClearanceReport {
    /// Smallest signed margin observed: distance to the nearer exclusion
    /// zone minus that zone's radius. Negative means the leg intrudes.
    pub min_margin_au: f64,
    /// Epoch at which the minimum margin occurred.
    pub t_min_margin: f64,
    pub clears: bool,
}

/// Sample a transfer leg at `search.clearance_step_days` along its duration,
/// propagating the departure state forward under the Sun's gravity and
/// comparing against both planets' exclusion radii. If the margin dips
/// below `clearance_confirm_threshold_au` without going negative, a second
/// finer pass confirms the margin isn't a sampling artifact (spec §4.6 /
/// §9's two-pass refinement note).
pub fn clearance_check(
    leg: &TransferLeg,
    ephemeris: &Ephemeris,
    config: &EngineConfig,
) -> ClearanceReport {
    let search = &config.search;
    let coarse = scan(leg, ephemeris, config, search.clearance_step_days);

    if coarse.min_margin_au >= 0.0 && coarse.min_margin_au < search.clearance_confirm_threshold_au
    {
        let fine_step = search.clearance_step_days / search.clearance_confirm_step_divisor;
        let fine = scan(leg, ephemeris, config, fine_step);
        return fine;
    }
    coarse
}

fn scan(
    leg: &TransferLeg,
    ephemeris: &Ephemeris,
    config: &EngineConfig,
    step_days: f64,
) -> ClearanceReport {
    let earth_exclusion = config.earth.exclusion_radius_au();
    let mars_exclusion = config.mars.exclusion_radius_au();

    let duration = leg.duration();
    let steps = (duration / step_days).ceil().max(1.0) as u64;

    let mut min_margin = f64::INFINITY;
    let mut t_min_margin = leg.t_depart;

    for i in 0..=steps {
        let dt = (i as f64 * step_days).min(duration);
        let t = leg.t_depart + dt;
        let (r, _v) = mission_propagator::propagate(leg.r1, leg.v1, dt, MU_SUN);

        let margins = [
            margin_to_planet(ephemeris, "earth", t, &r, earth_exclusion),
            margin_to_planet(ephemeris, "mars", t, &r, mars_exclusion),
        ];
        for margin in margins.into_iter().flatten() {
            if margin < min_margin {
                min_margin = margin;
                t_min_margin = t;
            }
        }
    }

    ClearanceReport {
        min_margin_au: min_margin,
        t_min_margin,
        clears: min_margin >= 0.0,
    }
}

fn margin_to_planet(
    ephemeris: &Ephemeris,
    planet: &str,
    t: f64,
    spacecraft_pos: &mission_core::Vector3,
    exclusion_radius_au: f64,
) -> Option<f64> {
    let planet_pos = ephemeris.position(planet, t).ok()?;
    Some(distance(spacecraft_pos, &planet_pos) - exclusion_radius_au)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_sane_earth_mars_leg_clears_both_exclusion_zones() {
        let eph = Ephemeris::new();
        let config = EngineConfig::defaults();
        let leg = crate::transfer_leg::make_leg(&eph, &config, "earth", "mars", 45.0, 260.0, true, false)
            .expect("leg should solve");
        let report = clearance_check(&leg, &eph, &config);
        assert!(report.clears, "min_margin_au={}", report.min_margin_au);
    }
}
