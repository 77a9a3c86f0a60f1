//! Mission planning: transfer-leg construction, clearance checking, the
//! parking-orbit model, the launch-window search, the lazy mission
//! schedule, and the state aggregator (spec §§4.5-4.10).
//!
//! Grounded on the teacher's `solar_transfer` crate, which orchestrates a
//! mission as a sequence of phases (departure/cruise/arrival) built from
//! the lower-level ephemeris and impulsive-transfer crates; the phase
//! sequence here is the engine's own (parking -> transfer -> parking ->
//! transfer) rather than the teacher's one-way departure/cruise/arrival.

mod aggregator;
mod clearance;
mod parking;
mod schedule;
mod search;
mod transfer_leg;

pub use aggregator::{schedule_preview, summarize, MissionInfo, MissionSummary, MissionTimeline, Phase};
pub use clearance::{clearance_check, ClearanceReport};
pub use parking::{outer_parking_point, parking_position};
pub use schedule::{Mission, MissionSchedule, MissionScheduleEntry};
pub use search::{search, synodic_period_days, LaunchWindowSearch, SearchError};
pub use transfer_leg::{make_leg, LegError, TransferLeg};
