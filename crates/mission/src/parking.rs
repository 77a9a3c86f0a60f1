//! Parking-orbit model (spec §4.7): an analytic circle around a planet
//! whose period is fit so an integer number of revolutions exactly fills
//! the wait interval, handing off smoothly at φ = 0.

use mission_core::vector::{add, dot, scale, unit, Vector3};
use mission_ephemeris::{Ephemeris, EphemerisError};

/// Spacecraft position at the φ = 0 point of the parking circle: the
/// handoff position used by the transfer-leg builder (spec §4.5), and the
/// position the spacecraft sits at the instant a wait interval begins.
pub fn outer_parking_point(
    ephemeris: &Ephemeris,
    planet: &str,
    t: f64,
    parking_radius_au: f64,
) -> Result<Vector3, EphemerisError> {
    let planet_pos = ephemeris.position(planet, t)?;
    let r_hat = radial_unit(&planet_pos);
    Ok(add(&planet_pos, &scale(&r_hat, parking_radius_au)))
}

/// Spacecraft position while parked around `planet` during the wait window
/// `[t_start, t_end)`, evaluated at time `t`.
pub fn parking_position(
    ephemeris: &Ephemeris,
    planet: &str,
    t: f64,
    t_start: f64,
    t_end: f64,
    parking_radius_au: f64,
    nominal_period_days: f64,
) -> Result<Vector3, EphemerisError> {
    let wait_duration = (t_end - t_start).max(f64::EPSILON);
    let revolutions = (wait_duration / nominal_period_days).round().max(1.0);
    let period_fit = wait_duration / revolutions;
    let phi = 2.0 * std::f64::consts::PI * (t - t_start) / period_fit;

    let planet_pos = ephemeris.position(planet, t)?;
    let planet_vel = ephemeris.velocity(planet, t)?;

    let r_hat = radial_unit(&planet_pos);
    let t_hat = prograde_tangent(&r_hat, &planet_vel);

    let offset = add(
        &scale(&r_hat, parking_radius_au * phi.cos()),
        &scale(&t_hat, parking_radius_au * phi.sin()),
    );
    Ok(add(&planet_pos, &offset))
}

fn radial_unit(planet_pos: &Vector3) -> Vector3 {
    unit(&[planet_pos[0], planet_pos[1], 0.0])
}

/// 90-degree rotation of `r_hat`, oriented to agree with the planet's
/// actual (prograde) velocity direction in the xy-projection.
fn prograde_tangent(r_hat: &Vector3, planet_vel: &Vector3) -> Vector3 {
    let candidate = [-r_hat[1], r_hat[0], 0.0];
    let vel_xy = [planet_vel[0], planet_vel[1], 0.0];
    if dot(&candidate, &vel_xy) >= 0.0 {
        candidate
    } else {
        scale(&candidate, -1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outer_point_is_radius_away_from_planet() {
        let eph = Ephemeris::new();
        let p = ephemeris_position(&eph, "earth", 0.0);
        let point = outer_parking_point(&eph, "earth", 0.0, 0.01).unwrap();
        let dist = mission_core::vector::distance(&p, &point);
        assert!((dist - 0.01).abs() < 1e-9);
    }

    #[test]
    fn parking_position_returns_to_outer_point_at_start_of_wait() {
        let eph = Ephemeris::new();
        let t_start = 10.0;
        let t_end = 15.0;
        let at_start = parking_position(&eph, "earth", t_start, t_start, t_end, 0.01, 1.0).unwrap();
        let outer = outer_parking_point(&eph, "earth", t_start, 0.01).unwrap();
        assert!(mission_core::vector::distance(&at_start, &outer) < 1e-9);
    }

    #[test]
    fn integer_revolutions_fill_the_wait_window_exactly() {
        let eph = Ephemeris::new();
        let t_start = 0.0;
        let t_end = 5.0;
        let at_start = parking_position(&eph, "earth", t_start, t_start, t_end, 0.01, 1.0).unwrap();
        let at_end = parking_position(&eph, "earth", t_end, t_start, t_end, 0.01, 1.0).unwrap();
        // phi(t_end) is an integer multiple of 2*pi by construction, so the
        // orbital phase (but not the planet's own motion) matches t_start's.
        assert!(mission_core::vector::distance(&at_start, &at_end) < 1e-6);
    }

    fn ephemeris_position(eph: &Ephemeris, planet: &str, t: f64) -> Vector3 {
        eph.position(planet, t).unwrap()
    }
}
