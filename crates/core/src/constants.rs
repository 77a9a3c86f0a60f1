//! Physical constants for the heliocentric frame used throughout the engine.
//!
//! All distances are in astronomical units (AU) and all times in days unless
//! noted otherwise, matching the frame the ephemeris and Lambert solver work
//! in directly (no km/s conversion layer, unlike the SPICE-based teacher).

/// Heliocentric gravitational parameter, AU^3/day^2.
pub const MU_SUN: f64 = 2.9591220828559115e-4;

/// Kilometres per astronomical unit, kept for display/telemetry conversions.
pub const AU_KM: f64 = 149_597_870.7;

/// Seconds per day, used by crates that talk to wall-clock tick rates.
pub const SECONDS_PER_DAY: f64 = 86_400.0;
