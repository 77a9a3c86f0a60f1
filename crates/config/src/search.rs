use serde::Deserialize;

/// Tunables for the launch-window search (spec §4.8) and the clearance
/// checker's sampling step (spec §4.6). All fields are independently
/// configurable, per spec §9's "Configuration" design note.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// How far past `earliest` the phase-alignment scan is willing to look, days.
    pub scan_horizon_days: f64,
    /// Coarse step for the phase-alignment sign-change scan, days.
    pub coarse_phase_scan_step_days: f64,
    /// Bisection iterations refining the phase-alignment root.
    pub phase_root_bisection_iterations: u32,
    /// Convergence tolerance for the phase-alignment root, days.
    pub phase_root_tolerance_days: f64,
    /// Half-window around the phase root searched for departure epochs, days.
    pub departure_refine_half_window_days: f64,
    /// Step between candidate departure epochs within the refine window, days.
    pub departure_refine_step_days: f64,
    /// Minimum time of flight considered in the Δt grid, days.
    pub tof_grid_min_days: f64,
    /// Maximum time of flight considered in the Δt grid, days.
    pub tof_grid_max_days: f64,
    /// Step between candidate times of flight, days.
    pub tof_grid_step_days: f64,
    /// Half-window around the warm-started Δt guess searched, days.
    pub tof_half_window_days: f64,
    /// Δv budget for a single leg (departure + arrival Δv), AU/day.
    pub dv_budget_au_per_day: f64,
    /// Whether to also try the long-way transfer angle at each candidate.
    pub try_long_way: bool,
    /// Sample step for the clearance checker, days.
    pub clearance_step_days: f64,
    /// Margin below which the clearance checker re-samples at finer resolution, AU.
    pub clearance_confirm_threshold_au: f64,
    /// Divisor applied to the clearance step during the confirmation pass.
    pub clearance_confirm_step_divisor: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            scan_horizon_days: 1400.0,
            coarse_phase_scan_step_days: 10.0,
            phase_root_bisection_iterations: 60,
            phase_root_tolerance_days: 1e-8,
            departure_refine_half_window_days: 80.0,
            departure_refine_step_days: 2.0,
            tof_grid_min_days: 180.0,
            tof_grid_max_days: 450.0,
            tof_grid_step_days: 5.0,
            tof_half_window_days: 80.0,
            dv_budget_au_per_day: 0.006,
            try_long_way: false,
            clearance_step_days: 0.25,
            clearance_confirm_threshold_au: 5e-3,
            clearance_confirm_step_divisor: 5.0,
        }
    }
}
