//! Stumpff functions `C(z)` and `S(z)`, the entire functions underlying
//! universal-variable orbital mechanics (Lambert solver, Kepler propagator).
//!
//! `dC/dz = (1 - z*S(z) - 2*C(z)) / (2z)` and `dS/dz = (C(z) - 3*S(z)) / (2z)`
//! are used by the Newton steps in `mission_lambert` and `mission_propagator`;
//! both identities hold even through the z=0 series branch below.

const SERIES_THRESHOLD: f64 = 1e-8;

/// `C(z)`: closed form for `z != 0`, 4-term Taylor series near zero.
pub fn c(z: f64) -> f64 {
    if z > SERIES_THRESHOLD {
        let sz = z.sqrt();
        (1.0 - sz.cos()) / z
    } else if z < -SERIES_THRESHOLD {
        let sz = (-z).sqrt();
        (sz.cosh() - 1.0) / (-z)
    } else {
        // 1/2! - z/4! + z^2/6! - z^3/8!
        1.0 / 2.0 - z / 24.0 + z * z / 720.0 - z * z * z / 40_320.0
    }
}

/// `S(z)`: closed form for `z != 0`, 4-term Taylor series near zero.
pub fn s(z: f64) -> f64 {
    if z > SERIES_THRESHOLD {
        let sz = z.sqrt();
        (sz - sz.sin()) / (sz * sz * sz)
    } else if z < -SERIES_THRESHOLD {
        let sz = (-z).sqrt();
        (sz.sinh() - sz) / (sz * sz * sz)
    } else {
        // 1/3! - z/5! + z^2/7! - z^3/9!
        1.0 / 6.0 - z / 120.0 + z * z / 5_040.0 - z * z * z / 362_880.0
    }
}

/// `(dC/dz, dS/dz)`, per the identities in the module docs. Near `z = 0`
/// the identities divide by `z`; the derivatives of the Taylor series used
/// by [`c`]/[`s`] are used instead.
pub fn derivatives(z: f64) -> (f64, f64) {
    if z.abs() > SERIES_THRESHOLD {
        let cz = c(z);
        let sz = s(z);
        let dc = (1.0 - z * sz - 2.0 * cz) / (2.0 * z);
        let ds = (cz - 3.0 * sz) / (2.0 * z);
        (dc, ds)
    } else {
        let dc = -1.0 / 24.0 + z / 360.0 - z * z / 13_440.0;
        let ds = -1.0 / 120.0 + z / 2_520.0 - z * z / 120_960.0;
        (dc, ds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn c_and_s_agree_across_the_series_boundary() {
        for &z in &[-1e-7, -1e-9, 0.0, 1e-9, 1e-7] {
            assert!(c(z).is_finite());
            assert!(s(z).is_finite());
        }
    }

    #[test]
    fn known_values_at_zero() {
        assert!((c(0.0) - 0.5).abs() < 1e-12);
        assert!((s(0.0) - 1.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn positive_and_negative_branches_are_continuous_near_threshold() {
        let eps = 1e-6;
        assert!((c(SERIES_THRESHOLD + eps) - c(SERIES_THRESHOLD - eps)).abs() < 1e-4);
        assert!((s(SERIES_THRESHOLD + eps) - s(SERIES_THRESHOLD - eps)).abs() < 1e-4);
    }

    #[test]
    fn derivatives_match_finite_difference() {
        for &z in &[-30.0, -1.0, -1e-7, 1e-7, 1.0, 10.0, 30.0] {
            let h = 1e-6;
            let (dc, ds) = derivatives(z);
            let dc_fd = (c(z + h) - c(z - h)) / (2.0 * h);
            let ds_fd = (s(z + h) - s(z - h)) / (2.0 * h);
            assert!((dc - dc_fd).abs() < 1e-4, "z={z} dc={dc} fd={dc_fd}");
            assert!((ds - ds_fd).abs() < 1e-4, "z={z} ds={ds} fd={ds_fd}");
        }
    }

    #[test]
    fn stumpff_identity_holds_over_a_wide_range() {
        // z*S(z) + C(z) == 1 for all finite z (a standard Stumpff identity).
        for i in -50..=50 {
            let z = i as f64;
            let lhs = z * s(z) + c(z);
            assert!((lhs - 1.0).abs() < 1e-9, "z={z} lhs={lhs}");
        }
    }
}
