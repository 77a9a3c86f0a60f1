//! State aggregator: folds the mission schedule, the ephemeris, and the
//! parking-orbit model into the snapshots the realtime server streams out
//! (spec §4.10, §6).

use serde::Serialize;

use mission_config::EngineConfig;
use mission_core::vector::distance;
use mission_core::{Vector3, MU_SUN};
use mission_ephemeris::Ephemeris;

use crate::parking::parking_position;
use crate::schedule::{Mission, MissionSchedule};
use crate::search::SearchError;

/// What the spacecraft is doing at a given epoch, named per spec §4.9's
/// state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    EarthOrbitStay,
    TransferToMars,
    MarsOrbitStay,
    TransferToEarth,
}

/// One mission's timeline: the four leg-boundary epochs, the mission start,
/// and the wait/transfer durations and Δv derived from them.
#[derive(Debug, Clone, Serialize)]
pub struct MissionTimeline {
    pub mission_number: usize,
    pub t_start: f64,
    pub t_depart_earth: f64,
    pub t_arrive_mars: f64,
    pub t_depart_mars: f64,
    pub t_arrive_earth: f64,
    pub earth_wait_days: f64,
    pub mars_wait_days: f64,
    pub transfer_out_days: f64,
    pub transfer_in_days: f64,
    pub dv_outbound_au_per_day: f64,
    pub dv_inbound_au_per_day: f64,
}

fn mission_timeline(mission: &Mission) -> MissionTimeline {
    MissionTimeline {
        mission_number: mission.mission_number,
        t_start: mission.t_start,
        t_depart_earth: mission.leg_outbound.t_depart,
        t_arrive_mars: mission.leg_outbound.t_arrive,
        t_depart_mars: mission.leg_inbound.t_depart,
        t_arrive_earth: mission.leg_inbound.t_arrive,
        earth_wait_days: mission.earth_wait_days(),
        mars_wait_days: mission.mars_wait_days(),
        transfer_out_days: mission.leg_outbound.duration(),
        transfer_in_days: mission.leg_inbound.duration(),
        dv_outbound_au_per_day: mission.dv_outbound_au_per_day,
        dv_inbound_au_per_day: mission.dv_inbound_au_per_day,
    }
}

fn phase_for(mission: &Mission, t: f64) -> Phase {
    if t < mission.leg_outbound.t_depart {
        Phase::EarthOrbitStay
    } else if t < mission.leg_outbound.t_arrive {
        Phase::TransferToMars
    } else if t < mission.leg_inbound.t_depart {
        Phase::MarsOrbitStay
    } else {
        Phase::TransferToEarth
    }
}

/// The first `count` missions, starting from mission 0, independent of the
/// current simulation time: the `schedule_preview` used by
/// `/api/mission/info`.
pub fn schedule_preview(
    schedule: &mut MissionSchedule,
    count: usize,
) -> Result<Vec<MissionTimeline>, SearchError> {
    schedule.ensure_missions(count)?;
    Ok((0..count)
        .filter_map(|k| schedule.mission(k))
        .map(|mission| mission_timeline(&mission))
        .collect())
}

/// The static facts served once at startup via `/api/mission/info`: the
/// renderer model, `μ_sun`, and a preview of the upcoming missions.
#[derive(Debug, Clone, Serialize)]
pub struct MissionInfo {
    /// `"gateway-core-nasa"` if the validated GLB asset is present,
    /// `"procedural"` if the renderer should fall back to a generated model.
    pub model: String,
    pub mu_sun: f64,
    pub schedule_preview: Vec<MissionTimeline>,
    pub timeline_horizon_end: f64,
}

impl MissionInfo {
    pub fn build(
        schedule: &mut MissionSchedule,
        model_present: bool,
        preview_count: usize,
    ) -> Result<Self, SearchError> {
        let schedule_preview = schedule_preview(schedule, preview_count)?;
        let timeline_horizon_end = schedule.horizon_end().unwrap_or(0.0);
        Ok(Self {
            model: if model_present {
                "gateway-core-nasa".to_string()
            } else {
                "procedural".to_string()
            },
            mu_sun: MU_SUN,
            schedule_preview,
            timeline_horizon_end,
        })
    }
}

/// A full state snapshot at one epoch (spec §4.10's `mission_info(t)`),
/// served by `/api/snapshot` and streamed over `/ws`.
#[derive(Debug, Clone, Serialize)]
pub struct MissionSummary {
    pub time_days: f64,
    pub mission_number: usize,
    pub phase: Phase,
    pub time_in_mission: f64,
    pub mission_duration: f64,
    pub mission_schedule: MissionTimeline,
    pub timeline_horizon_end: f64,
    pub earth_position: Vector3,
    pub earth_velocity: Vector3,
    pub mars_position: Vector3,
    pub mars_velocity: Vector3,
    pub spacecraft_position: Vector3,
    pub earth_mars_distance: f64,
    pub progress: f64,
}

/// Produce a snapshot at epoch `t`, growing `schedule` as needed so the
/// mission containing `t` and `lookahead` missions beyond it are known
/// (spec §4.9's `ensure_coverage(t, lookahead)`).
pub fn summarize(
    schedule: &mut MissionSchedule,
    ephemeris: &Ephemeris,
    config: &EngineConfig,
    t: f64,
    lookahead: usize,
) -> Result<MissionSummary, SearchError> {
    schedule.ensure_coverage(t, lookahead)?;
    let mission = schedule
        .mission_for_time(t)?
        .ok_or(SearchError::NoCandidate)?;

    let phase = phase_for(&mission, t);
    let spacecraft_position = match phase {
        Phase::TransferToMars => {
            let leg = &mission.leg_outbound;
            let dt = t - leg.t_depart;
            let (r, _v) = mission_propagator::propagate(leg.r1, leg.v1, dt, MU_SUN);
            r
        }
        Phase::TransferToEarth => {
            let leg = &mission.leg_inbound;
            let dt = t - leg.t_depart;
            let (r, _v) = mission_propagator::propagate(leg.r1, leg.v1, dt, MU_SUN);
            r
        }
        Phase::EarthOrbitStay => {
            let radius = config.earth.parking_radius_au;
            let period = config.earth.nominal_parking_period_days;
            parking_position(
                ephemeris,
                "earth",
                t,
                mission.t_start,
                mission.leg_outbound.t_depart,
                radius,
                period,
            )
            .unwrap_or([0.0, 0.0, 0.0])
        }
        Phase::MarsOrbitStay => {
            let radius = config.mars.parking_radius_au;
            let period = config.mars.nominal_parking_period_days;
            parking_position(
                ephemeris,
                "mars",
                t,
                mission.leg_outbound.t_arrive,
                mission.leg_inbound.t_depart,
                radius,
                period,
            )
            .unwrap_or([0.0, 0.0, 0.0])
        }
    };

    let earth_state = ephemeris.state("earth", t).ok();
    let mars_state = ephemeris.state("mars", t).ok();
    let earth_position = earth_state.map(|s| s.position).unwrap_or([0.0, 0.0, 0.0]);
    let earth_velocity = earth_state.map(|s| s.velocity).unwrap_or([0.0, 0.0, 0.0]);
    let mars_position = mars_state.map(|s| s.position).unwrap_or([0.0, 0.0, 0.0]);
    let mars_velocity = mars_state.map(|s| s.velocity).unwrap_or([0.0, 0.0, 0.0]);

    let time_in_mission = t - mission.t_start;
    let mission_duration = mission.duration();
    let progress = if mission_duration > 0.0 {
        (time_in_mission / mission_duration).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let timeline_horizon_end = schedule.horizon_end().unwrap_or(mission.leg_inbound.t_arrive);

    Ok(MissionSummary {
        time_days: t,
        mission_number: mission.mission_number,
        phase,
        time_in_mission,
        mission_duration,
        mission_schedule: mission_timeline(&mission),
        timeline_horizon_end,
        earth_position,
        earth_velocity,
        mars_position,
        mars_velocity,
        spacecraft_position,
        earth_mars_distance: distance(&earth_position, &mars_position),
        progress,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_at_epoch_zero_starts_mission_zero_in_an_earth_or_transfer_phase() {
        let mut schedule = MissionSchedule::new(Ephemeris::new(), EngineConfig::defaults());
        let ephemeris = Ephemeris::new();
        let config = EngineConfig::defaults();
        let summary = summarize(&mut schedule, &ephemeris, &config, 0.0, 2).unwrap();
        assert_eq!(summary.mission_number, 0);
        assert!(matches!(
            summary.phase,
            Phase::EarthOrbitStay | Phase::TransferToMars
        ));
        assert!((0.0..=1.0).contains(&summary.progress));
    }

    #[test]
    fn summary_mid_transfer_reports_transfer_to_mars() {
        let mut schedule = MissionSchedule::new(Ephemeris::new(), EngineConfig::defaults());
        let ephemeris = Ephemeris::new();
        let config = EngineConfig::defaults();
        schedule.ensure_coverage(0.0, 1).unwrap();
        let leg = schedule.entries()[0].leg.clone();
        let mid = 0.5 * (leg.t_depart + leg.t_arrive);
        let summary = summarize(&mut schedule, &ephemeris, &config, mid, 1).unwrap();
        assert_eq!(summary.phase, Phase::TransferToMars);
    }

    #[test]
    fn schedule_preview_lists_missions_in_departure_order() {
        let mut schedule = MissionSchedule::new(Ephemeris::new(), EngineConfig::defaults());
        let preview = schedule_preview(&mut schedule, 3).unwrap();
        assert_eq!(preview.len(), 3);
        let mut last_start = f64::NEG_INFINITY;
        for mission in &preview {
            assert!(mission.t_start >= last_start);
            last_start = mission.t_start;
        }
    }
}
