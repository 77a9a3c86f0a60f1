//! The realtime simulation clock: a single virtual-time source advanced by
//! one tick loop and fanned out to every connected subscriber, plus the
//! `start`/`pause`/`stop`/`set_speed`/`set_time` command surface the `/ws`
//! protocol drives it through (spec §5, §6).

use std::sync::Arc;
use std::time::{Duration, Instant};

use mission_config::EngineConfig;
use mission_core::Vector3;
use mission_ephemeris::{Ephemeris, EphemerisError, OrbitalElements};
use mission_planner::{summarize, MissionInfo, MissionSchedule, MissionSummary, SearchError};
use serde::Serialize;
use tokio::sync::{broadcast, RwLock};

use crate::orbit_cache::OrbitCache;

/// Wall-clock period between simulation ticks (~20 Hz).
pub const TICK_PERIOD: Duration = Duration::from_millis(50);

/// How many simulated days pass per wall-clock second, by default.
pub const DEFAULT_TIME_SCALE_DAYS_PER_SECOND: f64 = 0.5;

/// Missions kept scheduled beyond the one containing the current time, per
/// spec §5's "growth is amortized (lookahead=2)".
const SCHEDULE_LOOKAHEAD_MISSIONS: usize = 2;
const MISSION_INFO_PREVIEW_COUNT: usize = 3;

/// Capacity of the broadcast channel each WebSocket subscriber drains from.
const BROADCAST_CAPACITY: usize = 64;

struct ClockState {
    sim_time_days: f64,
    time_scale_days_per_second: f64,
    paused: bool,
    is_running: bool,
}

/// Snapshot of the clock alone: the shape of `/api/state` and the
/// `simulation` field of every WebSocket envelope (spec §6).
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SimulationStatus {
    pub is_running: bool,
    pub time_speed: f64,
    pub paused: bool,
}

/// A mission snapshot paired with the clock status at the moment it was
/// produced; this is what the broadcast channel carries to subscribers.
#[derive(Debug, Clone)]
pub struct SimulationSnapshot {
    pub mission: MissionSummary,
    pub simulation: SimulationStatus,
}

/// Shared simulation state: the virtual clock, the lazily-grown mission
/// schedule, and the subscriber fan-out channel. One instance is held
/// behind an `Arc` for the lifetime of the server process.
pub struct SimulationState {
    ephemeris: Ephemeris,
    config: EngineConfig,
    pub mission_info: MissionInfo,
    orbit_cache: OrbitCache,
    schedule: RwLock<MissionSchedule>,
    clock: RwLock<ClockState>,
    tx: broadcast::Sender<SimulationSnapshot>,
}

impl SimulationState {
    pub fn new(
        ephemeris: Ephemeris,
        config: EngineConfig,
        model_present: bool,
    ) -> Result<Arc<Self>, SearchError> {
        let orbit_cache = OrbitCache::build(&ephemeris, &["earth", "mars"])
            .map_err(|_| SearchError::NoCandidate)?;
        let mut schedule = MissionSchedule::new(ephemeris.clone(), config.clone());
        let mission_info = MissionInfo::build(&mut schedule, model_present, MISSION_INFO_PREVIEW_COUNT)?;
        let (tx, _rx) = broadcast::channel(BROADCAST_CAPACITY);

        Ok(Arc::new(Self {
            ephemeris,
            config,
            mission_info,
            orbit_cache,
            schedule: RwLock::new(schedule),
            clock: RwLock::new(ClockState {
                sim_time_days: 0.0,
                time_scale_days_per_second: DEFAULT_TIME_SCALE_DAYS_PER_SECOND,
                paused: false,
                is_running: false,
            }),
            tx,
        }))
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SimulationSnapshot> {
        self.tx.subscribe()
    }

    /// Raw orbital elements for a named planet (the `/api/planets` shape).
    pub fn planet_elements(&self, planet: &str) -> Result<&OrbitalElements, EphemerisError> {
        self.ephemeris.elements(planet)
    }

    /// The cached `num_points == ORBIT_SAMPLE_COUNT` orbit shape for
    /// `planet`, used to seed a WebSocket `init` message with a ready-to-draw
    /// orbit line without waiting on a follow-up `/api/orbit` request.
    pub fn cached_orbit(&self, planet: &str) -> Result<Vec<Vector3>, EphemerisError> {
        self.orbit_cache.points(planet, crate::orbit_cache::ORBIT_SAMPLE_COUNT)
    }

    /// `num_points` orbit-shape points for `planet` (the `/api/orbit`
    /// shape); `num_points == 360` is served from a precomputed cache.
    pub fn orbit_points(&self, planet: &str, num_points: usize) -> Result<Vec<Vector3>, EphemerisError> {
        self.orbit_cache.points(planet, num_points)
    }

    pub async fn current_time_days(&self) -> f64 {
        self.clock.read().await.sim_time_days
    }

    pub async fn status(&self) -> SimulationStatus {
        let clock = self.clock.read().await;
        SimulationStatus {
            is_running: clock.is_running,
            time_speed: clock.time_scale_days_per_second,
            paused: clock.paused,
        }
    }

    /// `start` command: begins (or resumes) the simulation and broadcasts
    /// immediately, so subscribers see `is_running` flip without waiting
    /// for the next tick.
    pub async fn start(&self) -> Result<(), SearchError> {
        {
            let mut clock = self.clock.write().await;
            clock.is_running = true;
            clock.paused = false;
        }
        self.broadcast_update().await
    }

    /// `pause` command: toggles the paused flag, leaving `is_running` set.
    pub async fn toggle_pause(&self) -> Result<(), SearchError> {
        {
            let mut clock = self.clock.write().await;
            clock.paused = !clock.paused;
        }
        self.broadcast_update().await
    }

    /// `stop` command: halts the simulation and resets the clock to the
    /// start of mission 0.
    pub async fn stop(&self) -> Result<(), SearchError> {
        {
            let mut clock = self.clock.write().await;
            clock.is_running = false;
            clock.paused = false;
            clock.sim_time_days = 0.0;
        }
        self.broadcast_update().await
    }

    /// `set_speed` command: simulated days per wall-clock second, clamped
    /// to non-negative (spec §8's boundary behavior).
    pub async fn set_speed(&self, days_per_second: f64) -> Result<(), SearchError> {
        {
            self.clock.write().await.time_scale_days_per_second = days_per_second.max(0.0);
        }
        self.broadcast_update().await
    }

    /// `set_time` command: jumps the clock directly, clamped to
    /// non-negative.
    pub async fn set_time(&self, t_days: f64) -> Result<(), SearchError> {
        {
            self.clock.write().await.sim_time_days = t_days.max(0.0);
        }
        self.broadcast_update().await
    }

    /// Advance the clock by `dt_seconds` of wall-clock time, if running and
    /// unpaused, and broadcast a fresh snapshot to every subscriber.
    pub async fn tick(&self, dt_seconds: f64) {
        let should_advance = {
            let mut clock = self.clock.write().await;
            if clock.is_running && !clock.paused {
                clock.sim_time_days += clock.time_scale_days_per_second * dt_seconds;
                true
            } else {
                false
            }
        };

        if should_advance {
            if let Err(error) = self.broadcast_update().await {
                tracing::warn!(%error, "failed to extend mission schedule during tick");
            }
        }
    }

    pub async fn snapshot(&self) -> Result<MissionSummary, SearchError> {
        let t = self.current_time_days().await;
        self.compute_summary(t).await
    }

    async fn broadcast_update(&self) -> Result<(), SearchError> {
        let t = self.current_time_days().await;
        let mission = self.compute_summary(t).await?;
        let simulation = self.status().await;
        // A send error only means there are currently no subscribers.
        let _ = self.tx.send(SimulationSnapshot { mission, simulation });
        Ok(())
    }

    async fn compute_summary(&self, t: f64) -> Result<MissionSummary, SearchError> {
        let mut schedule = self.schedule.write().await;
        summarize(&mut schedule, &self.ephemeris, &self.config, t, SCHEDULE_LOOKAHEAD_MISSIONS)
    }
}

/// Drive the simulation clock forever, ticking at [`TICK_PERIOD`]. Intended
/// to be spawned as its own task for the life of the process.
pub async fn run_clock(state: Arc<SimulationState>) {
    let mut interval = tokio::time::interval(TICK_PERIOD);
    let mut last = Instant::now();
    loop {
        interval.tick().await;
        let now = Instant::now();
        let dt_seconds = now.duration_since(last).as_secs_f64();
        last = now;
        state.tick(dt_seconds).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ticking_without_starting_leaves_the_clock_untouched() {
        let state =
            SimulationState::new(Ephemeris::new(), EngineConfig::defaults(), false).unwrap();
        let before = state.current_time_days().await;
        state.tick(5.0).await;
        let after = state.current_time_days().await;
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn starting_lets_the_clock_advance_on_tick() {
        let state =
            SimulationState::new(Ephemeris::new(), EngineConfig::defaults(), false).unwrap();
        state.start().await.unwrap();
        let before = state.current_time_days().await;
        state.tick(2.0).await;
        let after = state.current_time_days().await;
        assert!(after > before);
    }

    #[tokio::test]
    async fn pausing_stops_the_clock_from_advancing() {
        let state =
            SimulationState::new(Ephemeris::new(), EngineConfig::defaults(), false).unwrap();
        state.start().await.unwrap();
        state.toggle_pause().await.unwrap();
        let before = state.current_time_days().await;
        state.tick(5.0).await;
        let after = state.current_time_days().await;
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn set_speed_zero_freezes_time_but_leaves_is_running_true() {
        let state =
            SimulationState::new(Ephemeris::new(), EngineConfig::defaults(), false).unwrap();
        state.start().await.unwrap();
        state.set_speed(0.0).await.unwrap();
        let before = state.current_time_days().await;
        state.tick(5.0).await;
        assert_eq!(before, state.current_time_days().await);
        assert!(state.status().await.is_running);
    }

    #[tokio::test]
    async fn stop_resets_the_clock_to_the_start_of_mission_zero() {
        let state =
            SimulationState::new(Ephemeris::new(), EngineConfig::defaults(), false).unwrap();
        state.start().await.unwrap();
        state.set_time(100.0).await.unwrap();
        state.stop().await.unwrap();
        assert_eq!(state.current_time_days().await, 0.0);
        assert!(!state.status().await.is_running);
    }

    #[tokio::test]
    async fn set_time_clamps_negative_input_to_zero() {
        let state =
            SimulationState::new(Ephemeris::new(), EngineConfig::defaults(), false).unwrap();
        state.set_time(-50.0).await.unwrap();
        assert_eq!(state.current_time_days().await, 0.0);
    }
}
