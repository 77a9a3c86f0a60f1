//! Universal-variable two-body Kepler propagator (spec §4.4).
//!
//! New crate relative to the teacher: `solar_travel_calculator` never
//! propagates state forward in time, it only samples SPICE at requested
//! epochs. The clearance checker and the transfer-leg builder both need to
//! march a spacecraft's (r, v) forward under the Sun's gravity, so this is
//! grounded directly on spec §4.4 rather than adapted from teacher code.

use mission_core::stumpff::{c, derivatives, s};
use mission_core::vector::{add, dot, norm, scale};
use mission_core::Vector3;

const MAX_ITERATIONS: u32 = 60;
const TOLERANCE: f64 = 1e-9;

/// Advance `(r0, v0)` by `dt` under a central body of gravitational
/// parameter `mu`. If the Newton iteration on the universal anomaly
/// diverges to a non-finite value, the input state is returned unchanged
/// (spec §4.4, §9: used only as a fallback signal, never a NaN).
pub fn propagate(r0: Vector3, v0: Vector3, dt: f64, mu: f64) -> (Vector3, Vector3) {
    let r0n = norm(&r0);
    let v0n = norm(&v0);
    let alpha = 2.0 / r0n - v0n * v0n / mu;
    let r0v0 = dot(&r0, &v0);
    let sqrt_mu = mu.sqrt();

    let mut chi = sqrt_mu * dt / r0n;

    for _ in 0..MAX_ITERATIONS {
        let z = alpha * chi * chi;
        let cz = c(z);
        let sz = s(z);
        let (dc, ds) = derivatives(z);

        let f = (chi.powi(3) * sz + (r0v0 / sqrt_mu) * chi * chi * cz
            + r0n * chi * (1.0 - z * sz))
            / sqrt_mu
            - dt;

        let dz_dchi = 2.0 * alpha * chi;
        let df = (3.0 * chi * chi * sz
            + chi.powi(3) * ds * dz_dchi
            + (r0v0 / sqrt_mu) * (2.0 * chi * cz + chi * chi * dc * dz_dchi)
            + r0n * (1.0 - z * sz)
            + r0n * chi * (-dz_dchi * sz - z * ds * dz_dchi))
            / sqrt_mu;

        if df.abs() < 1e-300 {
            break;
        }
        let step = f / df;
        let next = chi - step;
        if !next.is_finite() {
            return (r0, v0);
        }
        chi = next;
        if step.abs() < TOLERANCE {
            break;
        }
    }

    if !chi.is_finite() {
        return (r0, v0);
    }

    let z = alpha * chi * chi;
    let cz = c(z);
    let sz = s(z);

    let f_lag = 1.0 - (chi * chi / r0n) * cz;
    let g_lag = dt - (chi.powi(3) / sqrt_mu) * sz;

    let r = add(&scale(&r0, f_lag), &scale(&v0, g_lag));
    let rn = norm(&r);
    if rn < 1e-15 || !r.iter().all(|x| x.is_finite()) {
        return (r0, v0);
    }

    let fdot_lag = (sqrt_mu / (rn * r0n)) * (z * sz - 1.0) * chi;
    let gdot_lag = 1.0 - (chi * chi / rn) * cz;

    let v = add(&scale(&r0, fdot_lag), &scale(&v0, gdot_lag));

    if r.iter().chain(v.iter()).all(|x| x.is_finite()) {
        (r, v)
    } else {
        (r0, v0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MU_SUN: f64 = 2.9591220828559115e-4;

    #[test]
    fn circular_orbit_returns_to_start_after_one_period() {
        let r0 = [1.0, 0.0, 0.0];
        let v_circ = (MU_SUN / 1.0f64).sqrt();
        let v0 = [0.0, v_circ, 0.0];
        let period = 2.0 * std::f64::consts::PI * (1.0f64.powi(3) / MU_SUN).sqrt();

        let (r, v) = propagate(r0, v0, period, MU_SUN);
        assert!((norm(&[r[0] - r0[0], r[1] - r0[1], r[2] - r0[2]])) < 1e-6);
        assert!((norm(&[v[0] - v0[0], v[1] - v0[1], v[2] - v0[2]])) < 1e-6);
    }

    #[test]
    fn quarter_period_moves_to_perpendicular_position() {
        let r0 = [1.0, 0.0, 0.0];
        let v_circ = (MU_SUN / 1.0f64).sqrt();
        let v0 = [0.0, v_circ, 0.0];
        let quarter = 0.5 * std::f64::consts::PI * (1.0f64.powi(3) / MU_SUN).sqrt();

        let (r, _v) = propagate(r0, v0, quarter, MU_SUN);
        assert!((r[0]).abs() < 1e-5);
        assert!((r[1] - 1.0).abs() < 1e-5);
    }

    #[test]
    fn energy_is_conserved_along_an_elliptical_arc() {
        let r0 = [1.2, 0.0, 0.0];
        let v0 = [0.0, 1.05 * (MU_SUN / 1.2f64).sqrt(), 0.1];
        let energy = |r: &Vector3, v: &Vector3| 0.5 * dot(v, v) - mu_over_r(r, MU_SUN);

        let e0 = energy(&r0, &v0);
        let (r, v) = propagate(r0, v0, 137.0, MU_SUN);
        let e1 = energy(&r, &v);
        assert!((e0 - e1).abs() < 1e-8, "e0={e0} e1={e1}");
    }

    fn mu_over_r(r: &Vector3, mu: f64) -> f64 {
        mu / norm(r)
    }
}
