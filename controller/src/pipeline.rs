use std::{fs::File, io::BufReader, path::Path};

use log::{info, warn};
use medroute_planner::{flatten_legs, optimize_routes, total_distance, DistanceGraph, Route};
use medroute_sim::{charging::ChargeReport, degradation::temperature_degradation, ChargingEngine, Degradation};
use medroute_structs::{
    limits,
    scenario::Scenario,
    selection::{total_payload, RouteStrategy},
    Error, Leg,
};
use serde::Serialize;

use crate::error::ControllerError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteFailure {
    pub origin: String,
    pub reason: String,
}

/// Everything produced by one planning run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissionReport {
    pub route_strategy: RouteStrategy,
    pub routes: Vec<Route>,
    pub failures: Vec<RouteFailure>,
    pub total_distance_km: f64,
    /// All route edges, origin after origin, before charging detours are added.
    pub legs: Vec<Leg>,
    pub average_payload_kg: f64,
    pub degradation: Degradation,
    pub charge: ChargeReport,
}

pub fn load_scenario(path: &Path) -> Result<Scenario, ControllerError> {
    let display = path.display().to_string();
    let file = File::open(path).map_err(ControllerError::io(display.clone()))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| ControllerError::Scenario {
        path: display,
        source,
    })
}

/// Checks the aggregate payload rules. Too much payload at the origins is
/// fatal, too much at the tasks only deserves a warning.
fn check_aggregate_payload(scenario: &Scenario) -> Result<(), Error> {
    let origins = total_payload(&scenario.selection.origins);
    Error::check_range(
        "total origin payload (kg)",
        origins,
        0.0,
        limits::MAX_AGGREGATE_PAYLOAD_KG,
    )?;

    let tasks = total_payload(&scenario.selection.tasks);
    if tasks > limits::MAX_AGGREGATE_PAYLOAD_KG {
        warn!(
            "Total task payload {:.2} kg exceeds the {} kg limit, routes may be affected",
            tasks,
            limits::MAX_AGGREGATE_PAYLOAD_KG
        );
    }
    Ok(())
}

pub fn run_mission(scenario: &Scenario) -> Result<MissionReport, Error> {
    let selection = &scenario.selection;
    selection.validate()?;
    scenario.drone.validate()?;
    check_aggregate_payload(scenario)?;

    let graph = DistanceGraph::build(&scenario.distances)?;
    let results = optimize_routes(
        selection.route_strategy,
        &graph,
        &selection.origin_names(),
        &selection.task_names(),
    );
    let total_distance_km = total_distance(&results);

    let mut routes = Vec::new();
    let mut failures = Vec::new();
    for (origin, result) in selection.origins.iter().zip(results) {
        match result {
            Ok(route) => {
                if !route.unreached.is_empty() {
                    warn!("{} cannot reach {:?}", origin.name, route.unreached);
                }
                routes.push(route);
            }
            Err(e) => {
                warn!("No route from {}: {}", origin.name, e);
                failures.push(RouteFailure {
                    origin: origin.name.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }
    info!(
        "Planned {} of {} routes with {}, {:.2} km in total",
        routes.len(),
        selection.origins.len(),
        selection.route_strategy,
        total_distance_km
    );

    let legs = flatten_legs(&routes);
    let average_payload_kg = scenario.payload_basis.average_payload(selection)?;
    let temperature = temperature_degradation(selection.temperature_c)?;
    let engine = ChargingEngine::new(scenario.drone.clone(), average_payload_kg, temperature)?;
    let charge = engine.run(&legs, selection.charge_strategy)?;

    Ok(MissionReport {
        route_strategy: selection.route_strategy,
        routes,
        failures,
        total_distance_km,
        legs,
        average_payload_kg,
        degradation: engine.degradation,
        charge,
    })
}
