//! Hohmann-transfer time-of-flight estimate, used only to seed the initial
//! Δt guess for the launch-window search (glossary: Hohmann transfer).

/// Time of flight (days) of the coplanar circular Hohmann transfer between
/// radii `r1` and `r2` (AU) around a body with gravitational parameter `mu`
/// (AU^3/day^2). For Earth–Mars this comes out to roughly 259 days.
pub fn hohmann_time_of_flight_guess(r1: f64, r2: f64, mu: f64) -> f64 {
    let a_transfer = 0.5 * (r1 + r2);
    std::f64::consts::PI * (a_transfer.powi(3) / mu).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn earth_mars_guess_is_roughly_259_days() {
        const MU_SUN: f64 = 2.9591220828559115e-4;
        let guess = hohmann_time_of_flight_guess(1.0, 1.524, MU_SUN);
        assert!((guess - 259.0).abs() < 15.0, "guess={guess}");
    }
}
