//! Whole-pipeline runs over the scenario files in `scenarios/`.

use std::path::PathBuf;

use medroute_structs::{
    scenario::Scenario,
    selection::{ChargeStrategy, RouteStrategy},
};

use crate::pipeline::{load_scenario, run_mission, MissionReport};

fn scenario(name: &str) -> Scenario {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../scenarios")
        .join(name);
    load_scenario(&path).unwrap()
}

fn run(name: &str, route: RouteStrategy, charge: ChargeStrategy) -> MissionReport {
    let mut s = scenario(name);
    s.selection.route_strategy = route;
    s.selection.charge_strategy = charge;
    run_mission(&s).unwrap()
}

struct Expected {
    missions: usize,
    segments: usize,
    minutes: u32,
    energy_ah: f64,
}

fn check(report: &MissionReport, expected: &Expected) {
    let charge = &report.charge;
    assert_eq!(charge.missions.len(), expected.missions);
    assert_eq!(charge.total_segments, expected.segments);
    assert_eq!(charge.total_minutes_flown, expected.minutes);
    assert!(
        (charge.total_energy_consumed_ah - expected.energy_ah).abs() < 1e-9,
        "{} != {}",
        charge.total_energy_consumed_ah,
        expected.energy_ah
    );
}

#[test]
fn every_scenario_file_runs() {
    let _ = env_logger::try_init();
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../scenarios");
    let mut count = 0;
    for entry in std::fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.extension().is_some_and(|e| e == "json") {
            let s = load_scenario(&path).unwrap();
            let report = run_mission(&s).unwrap();
            assert!(report.failures.is_empty(), "{}", path.display());
            for leg in report.charge.missions.iter() {
                assert!(leg.distance_km <= 3.6, "{} in {}", leg, path.display());
            }
            count += 1;
        }
    }
    assert!(count >= 2);
}

#[test]
fn bristol_routes() {
    let _ = env_logger::try_init();
    for strategy in [RouteStrategy::AStar, RouteStrategy::Dijkstra] {
        let report = run("bristol.json", strategy, ChargeStrategy::A);
        let stops = report
            .routes
            .iter()
            .map(|r| r.stops.join(" -> "))
            .collect::<Vec<_>>();
        assert_eq!(
            stops,
            vec![
                "NHS Blood Centre (Filton) -> Southmead Hospital -> Montpelier Health Centre -> Eastville Medical Centre -> Fishponds Primary Care Centre",
                "UWE Health Tech Hub -> Southmead Hospital -> Montpelier Health Centre -> Eastville Medical Centre -> Fishponds Primary Care Centre",
            ]
        );
        assert!((report.routes[0].total_distance_km - 10.89).abs() < 1e-9);
        assert!((report.routes[1].total_distance_km - 10.59).abs() < 1e-9);
        assert_eq!(report.legs.len(), 8);
        assert_eq!(report.average_payload_kg, 4.5);
    }
}

#[test]
fn bristol_strategy_a() {
    let report = run("bristol.json", RouteStrategy::AStar, ChargeStrategy::A);
    check(
        &report,
        &Expected {
            missions: 22,
            segments: 22,
            minutes: 232,
            energy_ah: 31.868819521755,
        },
    );
    // The detour after the first origin's last leg leads to the next origin.
    assert_eq!(
        report.charge.missions[11].to_string(),
        "Charge station -> UWE Health Tech Hub: 1.34 km"
    );
}

#[test]
fn bristol_strategy_b() {
    let report = run("bristol.json", RouteStrategy::Dijkstra, ChargeStrategy::B);
    check(
        &report,
        &Expected {
            missions: 14,
            segments: 14,
            minutes: 174,
            energy_ah: 23.901614641316257,
        },
    );
    assert_eq!(
        report.charge.missions[2].to_string(),
        "Montpelier Health Centre -> Charge station: 1.61 km"
    );
}

#[test]
fn long_legs_strategy_a() {
    let report = run("filton_long_legs.json", RouteStrategy::Dijkstra, ChargeStrategy::A);
    assert_eq!(report.charge.truncations, 2);
    // Truncations are counted on top of the split legs.
    check(
        &report,
        &Expected {
            missions: 10,
            segments: 12,
            minutes: 105,
            energy_ah: 15.433804773281704,
        },
    );
}

#[test]
fn long_legs_strategy_b() {
    let report = run("filton_long_legs.json", RouteStrategy::AStar, ChargeStrategy::B);
    check(
        &report,
        &Expected {
            missions: 6,
            segments: 6,
            minutes: 65,
            energy_ah: 9.554260097745821,
        },
    );
    assert_eq!(
        report.charge.mission_lines(),
        vec![
            "NHS Blood Centre (Filton) -> Charge spot 1: 3.60 km",
            "Charge spot 1 -> Fishponds Primary Care Centre: 1.46 km",
            "Fishponds Primary Care Centre -> Charge station: 0.73 km",
            "Charge station -> Fishponds Primary Care Centre: 0.73 km",
            "Fishponds Primary Care Centre -> Charge spot 2: 3.60 km",
            "Charge spot 2 -> Montpelier Health Centre: 0.96 km",
        ]
    );
}
