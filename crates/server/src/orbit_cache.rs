//! Orbit-shape point clouds for the 3D renderer's static orbit lines (spec
//! §6, `/api/orbit/{planet}?num_points=N`). The 360-point sample each
//! planet's full ellipse is built once at startup and reused; any other
//! point count is sampled fresh per request.

use std::collections::HashMap;

use mission_core::Vector3;
use mission_ephemeris::{Ephemeris, EphemerisError};

/// The only point count precomputed and cached at startup.
pub const ORBIT_SAMPLE_COUNT: usize = 360;

/// A `planet name -> ordered point cloud` cache for [`ORBIT_SAMPLE_COUNT`],
/// plus the ephemeris needed to sample any other count on demand.
#[derive(Debug, Clone)]
pub struct OrbitCache {
    ephemeris: Ephemeris,
    cached: HashMap<String, Vec<Vector3>>,
}

impl OrbitCache {
    pub fn build(ephemeris: &Ephemeris, planets: &[&str]) -> Result<Self, EphemerisError> {
        let mut cached = HashMap::new();
        for &planet in planets {
            cached.insert(
                planet.to_ascii_lowercase(),
                sample_orbit(ephemeris, planet, ORBIT_SAMPLE_COUNT)?,
            );
        }
        Ok(Self {
            ephemeris: ephemeris.clone(),
            cached,
        })
    }

    /// `num_points` points sampled evenly around `planet`'s full period.
    /// Served from the precomputed cache when `num_points ==
    /// ORBIT_SAMPLE_COUNT`; computed fresh otherwise.
    pub fn points(&self, planet: &str, num_points: usize) -> Result<Vec<Vector3>, EphemerisError> {
        if num_points == ORBIT_SAMPLE_COUNT {
            if let Some(cached) = self.cached.get(&planet.to_ascii_lowercase()) {
                return Ok(cached.clone());
            }
        }
        sample_orbit(&self.ephemeris, planet, num_points)
    }
}

fn sample_orbit(
    ephemeris: &Ephemeris,
    planet: &str,
    num_points: usize,
) -> Result<Vec<Vector3>, EphemerisError> {
    let period = ephemeris.period_days(planet)?;
    let mut points = Vec::with_capacity(num_points);
    for i in 0..num_points {
        let t = period * (i as f64) / (num_points as f64);
        points.push(ephemeris.position(planet, t)?);
    }
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caches_both_planets_with_the_expected_point_count() {
        let eph = Ephemeris::new();
        let cache = OrbitCache::build(&eph, &["earth", "mars"]).unwrap();
        assert_eq!(
            cache.points("earth", ORBIT_SAMPLE_COUNT).unwrap().len(),
            ORBIT_SAMPLE_COUNT
        );
        assert_eq!(
            cache.points("EARTH", ORBIT_SAMPLE_COUNT).unwrap().len(),
            ORBIT_SAMPLE_COUNT
        );
        assert!(cache.points("pluto", ORBIT_SAMPLE_COUNT).is_err());
    }

    #[test]
    fn samples_an_uncached_point_count_on_demand() {
        let eph = Ephemeris::new();
        let cache = OrbitCache::build(&eph, &["earth", "mars"]).unwrap();
        assert_eq!(cache.points("mars", 12).unwrap().len(), 12);
    }
}
