//! Closed-form heliocentric ephemeris for Earth and Mars.
//!
//! Replaces the teacher's SPICE-kernel lookup (`solar_ephem_spice`, built on
//! the CSPICE toolkit via FFI) with the fixed-Keplerian-element model this
//! engine is specified against: no kernel files, no network fetch, positions
//! are a pure function of epoch and the elements below.

mod elements;
mod rotation;

use std::collections::HashMap;

use mission_core::kepler::{solve_eccentric_anomaly, true_anomaly};
use mission_core::vector::{add, scale, Vector3};
use thiserror::Error;

pub use elements::OrbitalElements;

/// Step used for the forward-difference velocity estimate, in days.
const VELOCITY_STEP_DAYS: f64 = 1e-2;

/// Position (AU) and velocity (AU/day) of a body in the heliocentric frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EphemerisState {
    pub position: Vector3,
    pub velocity: Vector3,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EphemerisError {
    #[error("unknown-planet: {0}")]
    UnknownPlanet(String),
}

/// A small registry of named [`OrbitalElements`], queried by planet name.
///
/// Planet names are matched case-insensitively; the default registry ships
/// Earth and Mars, the only two bodies this mission engine needs.
#[derive(Debug, Clone)]
pub struct Ephemeris {
    bodies: HashMap<String, OrbitalElements>,
}

impl Default for Ephemeris {
    fn default() -> Self {
        let mut bodies = HashMap::new();
        bodies.insert("earth".to_string(), elements::earth());
        bodies.insert("mars".to_string(), elements::mars());
        Self { bodies }
    }
}

impl Ephemeris {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or override the elements for a named planet.
    pub fn with_body(mut self, name: &str, elements: OrbitalElements) -> Self {
        self.bodies.insert(name.to_ascii_lowercase(), elements);
        self
    }

    fn lookup(&self, planet: &str) -> Result<&OrbitalElements, EphemerisError> {
        self.bodies
            .get(&planet.to_ascii_lowercase())
            .ok_or_else(|| EphemerisError::UnknownPlanet(planet.to_string()))
    }

    /// Raw orbital elements for a named planet, used by callers that need
    /// `a`/`e`/`i`/period directly rather than a derived position or
    /// velocity (the `/api/planets` wire shape, for instance).
    pub fn elements(&self, planet: &str) -> Result<&OrbitalElements, EphemerisError> {
        self.lookup(planet)
    }

    /// Heliocentric position at epoch `t_days`, in AU.
    pub fn position(&self, planet: &str, t_days: f64) -> Result<Vector3, EphemerisError> {
        let el = self.lookup(planet)?;
        Ok(position_from_elements(el, t_days))
    }

    /// Heliocentric velocity at epoch `t_days`, in AU/day, by forward
    /// finite difference (step `VELOCITY_STEP_DAYS`); positions are smooth
    /// enough that this is adequate for the clearance and Δv checks.
    pub fn velocity(&self, planet: &str, t_days: f64) -> Result<Vector3, EphemerisError> {
        let el = self.lookup(planet)?;
        Ok(velocity_from_elements(el, t_days))
    }

    /// Full state (position + velocity) at epoch `t_days`.
    pub fn state(&self, planet: &str, t_days: f64) -> Result<EphemerisState, EphemerisError> {
        let el = self.lookup(planet)?;
        Ok(EphemerisState {
            position: position_from_elements(el, t_days),
            velocity: velocity_from_elements(el, t_days),
        })
    }

    /// Orbital period of a named planet, in days (used by the parking-orbit
    /// model and the synodic-period fallback in the launch-window search).
    pub fn period_days(&self, planet: &str) -> Result<f64, EphemerisError> {
        Ok(self.lookup(planet)?.period_days)
    }
}

/// Position at epoch `t_days` directly from [`OrbitalElements`] (spec §4.1).
pub fn position_from_elements(el: &OrbitalElements, t_days: f64) -> Vector3 {
    let mean_anomaly = mean_anomaly_at(el, t_days);
    let ecc_anomaly = solve_eccentric_anomaly(mean_anomaly, el.e);
    let nu = true_anomaly(ecc_anomaly, el.e);
    let r = el.a * (1.0 - el.e * ecc_anomaly.cos());
    let in_plane = [r * nu.cos(), r * nu.sin(), 0.0];
    rotation::perifocal_to_heliocentric(&in_plane, el)
}

fn velocity_from_elements(el: &OrbitalElements, t_days: f64) -> Vector3 {
    let p0 = position_from_elements(el, t_days);
    let p1 = position_from_elements(el, t_days + VELOCITY_STEP_DAYS);
    scale(&add(&p1, &scale(&p0, -1.0)), 1.0 / VELOCITY_STEP_DAYS)
}

fn mean_anomaly_at(el: &OrbitalElements, t_days: f64) -> f64 {
    let m_deg = (el.mean_anomaly_at_epoch_deg + 360.0 * t_days / el.period_days).rem_euclid(360.0);
    m_deg.to_radians()
}
