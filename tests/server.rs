use mission_config::EngineConfig;
use mission_ephemeris::Ephemeris;
use mission_planner::Phase;
use mission_server::SimulationState;

#[tokio::test]
async fn ticking_a_running_simulation_reaches_subscribers() {
    let state = SimulationState::new(Ephemeris::new(), EngineConfig::defaults(), false)
        .expect("simulation state should build");
    let mut rx = state.subscribe();
    state.start().await.expect("start should succeed");
    // `start` broadcasts immediately; drain that before the tick under test.
    let _ = tokio::time::timeout(std::time::Duration::from_secs(1), rx.recv()).await;

    state.tick(1.0).await;

    let snapshot = tokio::time::timeout(std::time::Duration::from_secs(1), rx.recv())
        .await
        .expect("broadcast should not time out")
        .expect("broadcast channel should not be closed");

    assert!(snapshot.mission.time_days > 0.0);
    assert!(snapshot.simulation.is_running);
}

#[tokio::test]
async fn snapshot_before_any_tick_is_at_mission_zero_epoch_zero() {
    let state = SimulationState::new(Ephemeris::new(), EngineConfig::defaults(), false)
        .expect("simulation state should build");
    let summary = state.snapshot().await.expect("snapshot should compute");
    assert_eq!(summary.time_days, 0.0);
    assert_eq!(summary.mission_number, 0);
    assert!(matches!(summary.phase, Phase::EarthOrbitStay | Phase::TransferToMars));
}
