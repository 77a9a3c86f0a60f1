use mission_config::EngineConfig;
use mission_ephemeris::Ephemeris;
use mission_planner::MissionSchedule;

#[test]
fn a_round_trip_schedule_alternates_earth_and_mars_and_respects_the_dv_budget() {
    let mut schedule = MissionSchedule::new(Ephemeris::new(), EngineConfig::defaults());
    schedule.ensure_coverage(0.0, 3).expect("schedule should extend");

    assert!(schedule.entries().len() >= 2);
    let budget = EngineConfig::defaults().search.dv_budget_au_per_day;
    for (i, entry) in schedule.entries().iter().enumerate() {
        let expect_source = if i % 2 == 0 { "earth" } else { "mars" };
        let expect_target = if i % 2 == 0 { "mars" } else { "earth" };
        assert_eq!(entry.leg.source, expect_source);
        assert_eq!(entry.leg.target, expect_target);
        assert!(entry.dv_au_per_day <= budget + 1e-9);
    }
}

#[test]
fn snapshot_schedule_preview_lists_upcoming_missions_in_departure_order() {
    let mut schedule = MissionSchedule::new(Ephemeris::new(), EngineConfig::defaults());
    let ephemeris = Ephemeris::new();
    let config = EngineConfig::defaults();

    let summary = mission_planner::summarize(&mut schedule, &ephemeris, &config, 0.0, 2)
        .expect("summary should compute");

    assert_eq!(summary.mission_number, 0);
    let preview = mission_planner::schedule_preview(&mut schedule, 3).expect("preview should compute");
    let mut last_start = f64::NEG_INFINITY;
    for mission in &preview {
        assert!(mission.t_start >= last_start);
        last_start = mission.t_start;
    }
}
