//! Launch-window search: find the next departure epoch and time of flight
//! from `source` to `target` that satisfies the Δv budget and clears both
//! planets' exclusion zones (spec §4.8).

use mission_config::EngineConfig;
use mission_core::vector::{norm, sub};
use mission_ephemeris::Ephemeris;
use thiserror::Error;

use crate::clearance::{clearance_check, ClearanceReport};
use crate::transfer_leg::{make_leg, LegError, TransferLeg};

#[derive(Debug, Error, PartialEq)]
pub enum SearchError {
    #[error("could not bracket a phase-alignment root within the scan horizon")]
    NoPhaseRoot,
    #[error("no candidate transfer within the dv budget and clearance constraints was found")]
    NoCandidate,
    #[error("leg construction failed during search: {0}")]
    Leg(#[from] LegError),
}

/// The best departure window found for a source/target pair.
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchWindowSearch {
    pub leg: TransferLeg,
    pub dv_au_per_day: f64,
    pub clearance: ClearanceReport,
}

/// Synodic period of two bodies given their sidereal periods, in days.
pub fn synodic_period_days(period_a_days: f64, period_b_days: f64) -> f64 {
    (1.0 / period_a_days - 1.0 / period_b_days).abs().recip()
}

/// Search for the next viable launch window from `source` to `target` no
/// earlier than `earliest`, within `search.scan_horizon_days`. If the
/// window found at the first phase-alignment root fails the budget or
/// clearance constraints, the search retries starting one synodic period
/// later, as many times as fit within the horizon.
pub fn search(
    ephemeris: &Ephemeris,
    config: &EngineConfig,
    source: &str,
    target: &str,
    earliest: f64,
) -> Result<LaunchWindowSearch, SearchError> {
    let search_cfg = &config.search;
    let period_source = ephemeris
        .period_days(source)
        .map_err(|_| SearchError::NoPhaseRoot)?;
    let period_target = ephemeris
        .period_days(target)
        .map_err(|_| SearchError::NoPhaseRoot)?;
    let synodic = synodic_period_days(period_source, period_target);

    let dt_guess = mission_lambert::hohmann_time_of_flight_guess(
        semi_major_guess(ephemeris, source, earliest),
        semi_major_guess(ephemeris, target, earliest),
        mission_core::MU_SUN,
    );

    let mut horizon_start = earliest;
    let horizon_end = earliest + search_cfg.scan_horizon_days;

    while horizon_start < horizon_end {
        let root = find_phase_root(
            ephemeris,
            source,
            target,
            horizon_start,
            horizon_end,
            dt_guess,
            search_cfg.coarse_phase_scan_step_days,
            search_cfg.phase_root_bisection_iterations,
            search_cfg.phase_root_tolerance_days,
        );

        if let Some(t_root) = root {
            if let Some(found) = refine_near(
                ephemeris,
                config,
                source,
                target,
                t_root,
                dt_guess,
            ) {
                return Ok(found);
            }
        }

        horizon_start += synodic.max(1.0);
    }

    Err(SearchError::NoCandidate)
}

/// Rough circular-orbit semi-major-axis guess from the body's heliocentric
/// distance at `t`, used only to warm-start the Hohmann time-of-flight seed.
fn semi_major_guess(ephemeris: &Ephemeris, planet: &str, t: f64) -> f64 {
    ephemeris
        .position(planet, t)
        .map(|p| norm(&p))
        .unwrap_or(1.0)
}

/// The phase-alignment condition: the target should sit `pi` radians ahead
/// of the source, by the time the spacecraft (departing `source` at `t`)
/// would arrive after `dt_guess` days of flight. `phase_error` is the
/// signed angular difference between the target's actual polar angle at
/// `t + dt_guess` and that ideal, both measured as the xy polar angle
/// `atan2(y, x)` of each body's heliocentric position (spec §4.8 step 1).
fn phase_error(ephemeris: &Ephemeris, source: &str, target: &str, t: f64, dt_guess: f64) -> Option<f64> {
    let source_pos = ephemeris.position(source, t).ok()?;
    let target_pos = ephemeris.position(target, t + dt_guess).ok()?;

    let theta_source = source_pos[1].atan2(source_pos[0]);
    let theta_target = target_pos[1].atan2(target_pos[0]);

    Some(wrap_to_pi(theta_target - (theta_source + std::f64::consts::PI)))
}

fn wrap_to_pi(angle: f64) -> f64 {
    let two_pi = 2.0 * std::f64::consts::PI;
    let mut a = angle % two_pi;
    if a > std::f64::consts::PI {
        a -= two_pi;
    } else if a < -std::f64::consts::PI {
        a += two_pi;
    }
    a
}

#[allow(clippy::too_many_arguments)]
fn find_phase_root(
    ephemeris: &Ephemeris,
    source: &str,
    target: &str,
    t_start: f64,
    t_end: f64,
    dt_guess: f64,
    coarse_step: f64,
    bisection_iterations: u32,
    tolerance: f64,
) -> Option<f64> {
    let mut t_prev = t_start;
    let mut e_prev = phase_error(ephemeris, source, target, t_prev, dt_guess)?;

    let mut t = t_start + coarse_step;
    while t <= t_end {
        let e = phase_error(ephemeris, source, target, t, dt_guess)?;
        if e_prev.signum() != e.signum() && (e - e_prev).abs() < std::f64::consts::PI {
            return Some(bisect_phase_root(
                ephemeris,
                source,
                target,
                t_prev,
                t,
                dt_guess,
                bisection_iterations,
                tolerance,
            ));
        }
        t_prev = t;
        e_prev = e;
        t += coarse_step;
    }
    None
}

#[allow(clippy::too_many_arguments)]
fn bisect_phase_root(
    ephemeris: &Ephemeris,
    source: &str,
    target: &str,
    mut lo: f64,
    mut hi: f64,
    dt_guess: f64,
    iterations: u32,
    tolerance: f64,
) -> f64 {
    for _ in 0..iterations {
        if (hi - lo).abs() < tolerance {
            break;
        }
        let mid = 0.5 * (lo + hi);
        let Some(e_mid) = phase_error(ephemeris, source, target, mid, dt_guess) else {
            break;
        };
        let Some(e_lo) = phase_error(ephemeris, source, target, lo, dt_guess) else {
            break;
        };
        if e_lo.signum() == e_mid.signum() {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    0.5 * (lo + hi)
}

/// Δv-proxy grid search over departure epoch × time of flight around the
/// phase root, returning the lowest-Δv candidate that meets the budget and
/// clears both exclusion zones.
fn refine_near(
    ephemeris: &Ephemeris,
    config: &EngineConfig,
    source: &str,
    target: &str,
    t_root: f64,
    dt_guess: f64,
) -> Option<LaunchWindowSearch> {
    let search_cfg = &config.search;
    let mut best: Option<LaunchWindowSearch> = None;

    let dep_half = search_cfg.departure_refine_half_window_days;
    let dep_step = search_cfg.departure_refine_step_days.max(0.1);
    let tof_half = search_cfg.tof_half_window_days;
    let tof_step = search_cfg.tof_grid_step_days.max(0.1);

    let long_way_options: &[bool] = if search_cfg.try_long_way {
        &[false, true]
    } else {
        &[false]
    };

    let mut t_dep = t_root - dep_half;
    while t_dep <= t_root + dep_half {
        let mut dt = (dt_guess - tof_half).max(search_cfg.tof_grid_min_days);
        let dt_max = (dt_guess + tof_half).min(search_cfg.tof_grid_max_days);

        while dt <= dt_max {
            for &long_way in long_way_options {
                if let Ok(leg) = make_leg(ephemeris, config, source, target, t_dep, dt, true, long_way) {
                    let dv = dv_proxy(ephemeris, &leg);
                    if dv <= search_cfg.dv_budget_au_per_day {
                        let report = clearance_check(&leg, ephemeris, config);
                        if report.clears {
                            let candidate = LaunchWindowSearch {
                                leg,
                                dv_au_per_day: dv,
                                clearance: report,
                            };
                            best = Some(match best {
                                Some(b) if b.dv_au_per_day <= candidate.dv_au_per_day => b,
                                _ => candidate,
                            });
                        }
                    }
                }
            }
            dt += tof_step;
        }
        t_dep += dep_step;
    }

    best
}

/// Δv proxy: the sum of the magnitudes of the departure and arrival
/// velocity changes relative to the departing/arriving planet's own
/// heliocentric velocity (spec §4.8's "Δv-proxy" search metric).
fn dv_proxy(ephemeris: &Ephemeris, leg: &TransferLeg) -> f64 {
    let Ok(v_source) = ephemeris.velocity(&leg.source, leg.t_depart) else {
        return f64::INFINITY;
    };
    let Ok(v_target) = ephemeris.velocity(&leg.target, leg.t_arrive) else {
        return f64::INFINITY;
    };
    norm(&sub(&leg.v1, &v_source)) + norm(&sub(&leg.v2, &v_target))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synodic_period_of_earth_and_mars_is_about_780_days() {
        let days = synodic_period_days(365.25636, 686.97959);
        assert!((days - 780.0).abs() < 20.0, "got {days}");
    }

    #[test]
    fn search_finds_a_viable_earth_mars_window_within_the_horizon() {
        let eph = Ephemeris::new();
        let config = EngineConfig::defaults();
        let result = search(&eph, &config, "earth", "mars", 0.0);
        assert!(result.is_ok(), "{result:?}");
        let found = result.unwrap();
        assert!(found.clearance.clears);
    }
}
