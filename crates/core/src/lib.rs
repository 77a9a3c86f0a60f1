//! Math kernel shared by every crate in the mission trajectory engine:
//! vector algebra, physical constants, Stumpff functions, and the Kepler
//! equation solver used by the ephemeris and the universal-variable solvers.

pub mod constants;
pub mod kepler;
pub mod stumpff;
pub mod vector;

pub use constants::MU_SUN;
pub use vector::Vector3;

