use mission_ephemeris::Ephemeris;

#[test]
fn earth_and_mars_stay_on_their_own_apsides_bounds() {
    let eph = Ephemeris::new();
    for (planet, a, e) in [("earth", 1.00000011, 0.01671022), ("mars", 1.52366231, 0.09341233)] {
        let r_min = a * (1.0 - e);
        let r_max = a * (1.0 + e);
        for day in (0..1400).step_by(53) {
            let pos = eph.position(planet, day as f64).unwrap();
            let r = (pos[0] * pos[0] + pos[1] * pos[1] + pos[2] * pos[2]).sqrt();
            assert!(r >= r_min - 1e-6 && r <= r_max + 1e-6, "{planet} day={day} r={r}");
        }
    }
}

#[test]
fn mars_period_is_about_687_days() {
    let eph = Ephemeris::new();
    let period = eph.period_days("mars").unwrap();
    assert!((period - 686.97959).abs() < 1e-3);
}
