//! Lazy, append-only mission schedule: alternating Earth->Mars and
//! Mars->Earth legs, grown on demand as the simulation clock advances
//! (spec §4.9).

use mission_config::EngineConfig;
use mission_ephemeris::Ephemeris;

use crate::search::{search, LaunchWindowSearch, SearchError};
use crate::transfer_leg::TransferLeg;

/// One scheduled leg, together with the search result that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct MissionScheduleEntry {
    pub leg: TransferLeg,
    pub dv_au_per_day: f64,
    pub sequence_index: usize,
}

/// A lazily-extended sequence of transfer legs. Legs are appended only as
/// needed (see [`MissionSchedule::ensure_coverage`]), alternating Earth and
/// Mars as source/target; lookups are `O(log n)` via binary search over the
/// cumulative arrival times.
#[derive(Debug, Clone)]
pub struct MissionSchedule {
    ephemeris: Ephemeris,
    config: EngineConfig,
    entries: Vec<MissionScheduleEntry>,
    end_times: Vec<f64>,
}

impl MissionSchedule {
    pub fn new(ephemeris: Ephemeris, config: EngineConfig) -> Self {
        Self {
            ephemeris,
            config,
            entries: Vec::new(),
            end_times: Vec::new(),
        }
    }

    pub fn entries(&self) -> &[MissionScheduleEntry] {
        &self.entries
    }

    /// Append the next leg in the alternating Earth/Mars sequence, starting
    /// from the last leg's arrival epoch (or epoch 0.0 for the first leg).
    pub fn append_next(&mut self) -> Result<(), SearchError> {
        let (source, target, earliest) = match self.entries.last() {
            None => ("earth", "mars", 0.0),
            Some(last) if last.leg.target == "mars" => ("mars", "earth", last.leg.t_arrive),
            Some(last) => ("earth", "mars", last.leg.t_arrive),
        };

        let LaunchWindowSearch {
            leg,
            dv_au_per_day,
            ..
        } = search(&self.ephemeris, &self.config, source, target, earliest)?;

        let sequence_index = self.entries.len();
        self.end_times.push(leg.t_arrive);
        self.entries.push(MissionScheduleEntry {
            leg,
            dv_au_per_day,
            sequence_index,
        });
        Ok(())
    }

    /// Grow the schedule until both (i) the last scheduled arrival is past
    /// `t` and (ii) at least `lookahead` complete missions sit beyond the
    /// mission containing `t` (spec §4.9). Re-derives the mission index
    /// containing `t` after every append, since that index can only be
    /// known once the schedule reaches far enough to cover `t` at all.
    pub fn ensure_coverage(&mut self, t: f64, lookahead: usize) -> Result<(), SearchError> {
        loop {
            let last_end = self.end_times.last().copied().unwrap_or(f64::NEG_INFINITY);
            if last_end > t {
                if let Some(entry) = self.schedule_for_time(t) {
                    let mission_index = entry.sequence_index / 2;
                    if self.mission_count() >= mission_index + lookahead + 1 {
                        return Ok(());
                    }
                }
            }
            self.append_next()?;
        }
    }

    /// The schedule entry whose leg is either in progress at `t`, or whose
    /// arrival is the first one at or after `t`. Returns `None` if `t` is
    /// past every leg the schedule has computed so far — call
    /// [`Self::ensure_coverage`] first.
    pub fn schedule_for_time(&self, t: f64) -> Option<&MissionScheduleEntry> {
        let idx = self.end_times.partition_point(|&end| end < t);
        self.entries.get(idx)
    }

    /// How many complete round trips (outbound leg + inbound leg) have been
    /// computed so far.
    pub fn mission_count(&self) -> usize {
        self.entries.len() / 2
    }

    /// Grow the schedule until at least `count` complete missions exist.
    pub fn ensure_missions(&mut self, count: usize) -> Result<(), SearchError> {
        while self.entries.len() < count * 2 {
            self.append_next()?;
        }
        Ok(())
    }

    /// Mission `mission_number` (0-indexed), if its two legs have already
    /// been computed. Call [`Self::ensure_missions`] first to guarantee it.
    pub fn mission(&self, mission_number: usize) -> Option<Mission> {
        let outbound = self.entries.get(mission_number * 2)?;
        let inbound = self.entries.get(mission_number * 2 + 1)?;
        let t_start = if mission_number == 0 {
            0.0
        } else {
            self.entries[mission_number * 2 - 1].leg.t_arrive
        };
        Some(Mission {
            mission_number,
            t_start,
            leg_outbound: outbound.leg.clone(),
            dv_outbound_au_per_day: outbound.dv_au_per_day,
            leg_inbound: inbound.leg.clone(),
            dv_inbound_au_per_day: inbound.dv_au_per_day,
        })
    }

    /// The mission epoch `t` falls within, growing the schedule as needed so
    /// both of that mission's legs are computed.
    pub fn mission_for_time(&mut self, t: f64) -> Result<Option<Mission>, SearchError> {
        let Some(entry) = self.schedule_for_time(t) else {
            return Ok(None);
        };
        let mission_number = entry.sequence_index / 2;
        self.ensure_missions(mission_number + 1)?;
        Ok(self.mission(mission_number))
    }

    /// The arrival epoch of the last fully-computed mission's inbound leg
    /// (`end_times[last]` in spec terms), or `None` if no mission has
    /// completed yet.
    pub fn horizon_end(&self) -> Option<f64> {
        let complete_missions = self.mission_count();
        if complete_missions == 0 {
            return None;
        }
        self.end_times.get(complete_missions * 2 - 1).copied()
    }
}

/// One round trip: an outbound Earth->Mars leg and the matching inbound
/// Mars->Earth leg, together with the epoch the spacecraft left its Earth
/// parking orbit for this mission (spec §4.9).
#[derive(Debug, Clone, PartialEq)]
pub struct Mission {
    pub mission_number: usize,
    pub t_start: f64,
    pub leg_outbound: TransferLeg,
    pub dv_outbound_au_per_day: f64,
    pub leg_inbound: TransferLeg,
    pub dv_inbound_au_per_day: f64,
}

impl Mission {
    /// Total mission length: from leaving Earth orbit to returning to it.
    pub fn duration(&self) -> f64 {
        self.leg_inbound.t_arrive - self.t_start
    }

    /// Days spent parked at Earth before departure.
    pub fn earth_wait_days(&self) -> f64 {
        self.leg_outbound.t_depart - self.t_start
    }

    /// Days spent parked at Mars between the outbound arrival and the
    /// inbound departure.
    pub fn mars_wait_days(&self) -> f64 {
        self.leg_inbound.t_depart - self.leg_outbound.t_arrive
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_grows_lazily_and_alternates_bodies() {
        let mut schedule = MissionSchedule::new(Ephemeris::new(), EngineConfig::defaults());
        schedule.ensure_coverage(0.0, 2).unwrap();
        assert!(schedule.entries().len() >= 2);
        assert_eq!(schedule.entries()[0].leg.source, "earth");
        assert_eq!(schedule.entries()[0].leg.target, "mars");
        assert_eq!(schedule.entries()[1].leg.source, "mars");
        assert_eq!(schedule.entries()[1].leg.target, "earth");
    }

    #[test]
    fn ensure_coverage_grows_lookahead_missions_beyond_the_one_containing_t() {
        let mut schedule = MissionSchedule::new(Ephemeris::new(), EngineConfig::defaults());
        schedule.ensure_coverage(0.0, 2).unwrap();
        let entry = schedule.schedule_for_time(0.0).unwrap();
        let mission_index = entry.sequence_index / 2;
        assert!(schedule.mission_count() >= mission_index + 2 + 1);
    }

    #[test]
    fn ensure_coverage_is_idempotent() {
        let mut schedule = MissionSchedule::new(Ephemeris::new(), EngineConfig::defaults());
        schedule.ensure_coverage(0.0, 2).unwrap();
        let count_after_first = schedule.mission_count();
        schedule.ensure_coverage(0.0, 2).unwrap();
        assert_eq!(schedule.mission_count(), count_after_first);
    }

    #[test]
    fn mission_zero_starts_at_epoch_zero_and_pairs_its_two_legs() {
        let mut schedule = MissionSchedule::new(Ephemeris::new(), EngineConfig::defaults());
        schedule.ensure_missions(1).unwrap();
        let mission = schedule.mission(0).unwrap();
        assert_eq!(mission.mission_number, 0);
        assert_eq!(mission.t_start, 0.0);
        assert_eq!(mission.leg_outbound.source, "earth");
        assert_eq!(mission.leg_outbound.target, "mars");
        assert_eq!(mission.leg_inbound.source, "mars");
        assert_eq!(mission.leg_inbound.target, "earth");
        assert!(mission.duration() > 0.0);
        assert!(mission.earth_wait_days() >= 0.0);
        assert!(mission.mars_wait_days() >= 0.0);
    }

    #[test]
    fn mission_two_starts_where_mission_one_ended() {
        let mut schedule = MissionSchedule::new(Ephemeris::new(), EngineConfig::defaults());
        schedule.ensure_missions(2).unwrap();
        let first = schedule.mission(0).unwrap();
        let second = schedule.mission(1).unwrap();
        assert_eq!(second.t_start, first.leg_inbound.t_arrive);
        assert_eq!(schedule.horizon_end(), Some(second.leg_inbound.t_arrive));
    }

    #[test]
    fn mission_for_time_grows_the_schedule_as_needed() {
        let mut schedule = MissionSchedule::new(Ephemeris::new(), EngineConfig::defaults());
        let mission = schedule.mission_for_time(0.0).unwrap().unwrap();
        assert_eq!(mission.mission_number, 0);
    }
}
