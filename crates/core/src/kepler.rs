//! Newton-iterated solver for Kepler's equation `M = E - e*sin(E)`.

const TOLERANCE: f64 = 1e-10;
const MAX_ITERATIONS: u32 = 100;

/// Solve `E - e*sin(E) = m` for the eccentric anomaly `E`, both in radians.
///
/// Initial guess `E = M`; for the small eccentricities of the planets
/// modelled here (`e < 0.1`) this converges well within `MAX_ITERATIONS`.
pub fn solve_eccentric_anomaly(m: f64, e: f64) -> f64 {
    let mut ecc_anomaly = m;
    for _ in 0..MAX_ITERATIONS {
        let f = ecc_anomaly - e * ecc_anomaly.sin() - m;
        let f_prime = 1.0 - e * ecc_anomaly.cos();
        let delta = f / f_prime;
        ecc_anomaly -= delta;
        if delta.abs() < TOLERANCE {
            break;
        }
    }
    ecc_anomaly
}

/// True anomaly (radians) from the eccentric anomaly and eccentricity.
pub fn true_anomaly(ecc_anomaly: f64, e: f64) -> f64 {
    let half = ecc_anomaly / 2.0;
    2.0 * ((1.0 + e).sqrt() * half.sin()).atan2((1.0 - e).sqrt() * half.cos())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_mean_anomaly() {
        let e = 0.0167;
        for m_deg in [0.0f64, 30.0, 90.0, 180.0, 270.0, 357.5] {
            let m = m_deg.to_radians();
            let ecc = solve_eccentric_anomaly(m, e);
            let recovered = ecc - e * ecc.sin();
            assert!((recovered - m).abs() < 1e-9, "m={m_deg}");
        }
    }

    #[test]
    fn true_anomaly_matches_mean_anomaly_at_periapsis_and_apoapsis() {
        let e = 0.05;
        assert!(true_anomaly(0.0, e).abs() < 1e-12);
        assert!((true_anomaly(std::f64::consts::PI, e) - std::f64::consts::PI).abs() < 1e-9);
    }
}
