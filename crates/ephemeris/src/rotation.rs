//! The standard 3-1-3 Euler rotation `R_z(Ω) · R_x(i) · R_z(ω)` that carries
//! a perifocal in-plane vector into the heliocentric inertial frame.

use mission_core::vector::Vector3;

use crate::elements::OrbitalElements;

pub fn perifocal_to_heliocentric(in_plane: &Vector3, el: &OrbitalElements) -> Vector3 {
    let p = rotate_z(in_plane, el.arg_periapsis_deg.to_radians());
    let p = rotate_x(&p, el.i_deg.to_radians());
    rotate_z(&p, el.raan_deg.to_radians())
}

fn rotate_z(v: &Vector3, theta: f64) -> Vector3 {
    let (s, c) = theta.sin_cos();
    [v[0] * c - v[1] * s, v[0] * s + v[1] * c, v[2]]
}

fn rotate_x(v: &Vector3, theta: f64) -> Vector3 {
    let (s, c) = theta.sin_cos();
    [v[0], v[1] * c - v[2] * s, v[1] * s + v[2] * c]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_inclination_and_nodes_is_identity_in_xy() {
        let el = OrbitalElements {
            a: 1.0,
            e: 0.0,
            i_deg: 0.0,
            arg_periapsis_deg: 0.0,
            raan_deg: 0.0,
            mean_anomaly_at_epoch_deg: 0.0,
            period_days: 1.0,
        };
        let p = perifocal_to_heliocentric(&[1.0, 2.0, 0.0], &el);
        assert!((p[0] - 1.0).abs() < 1e-12);
        assert!((p[1] - 2.0).abs() < 1e-12);
        assert!(p[2].abs() < 1e-12);
    }
}
