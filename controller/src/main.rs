use std::{fs::File, io::BufWriter, path::PathBuf};

use clap::Parser;
use error::ControllerError;
use log::info;
use medroute_structs::{scenario::Scenario, selection::total_payload};
use pipeline::MissionReport;

pub mod error;
pub mod export;
pub mod pipeline;

#[cfg(test)]
mod regression;

/// Plans delivery routes and charging stops for one scenario file.
#[derive(Parser, Debug)]
#[command(name = "medroute", version, about)]
struct Args {
    /// Scenario JSON file
    scenario: PathBuf,

    /// Write the full mission report as JSON
    #[arg(long)]
    json: Option<PathBuf>,

    /// Write the charged mission list as CSV
    #[arg(long)]
    csv: Option<PathBuf>,
}

fn print_selection(scenario: &Scenario) {
    let selection = &scenario.selection;
    println!("\n=== Selection ===");
    println!("Origins and payloads:");
    for p in selection.origins.iter() {
        println!("  {} - {} kg", p.name, p.payload_kg);
    }
    println!("  total {:.2} kg", total_payload(&selection.origins));
    println!("\nTasks and payloads:");
    for p in selection.tasks.iter() {
        println!("  {} - {} kg", p.name, p.payload_kg);
    }
    println!("  total {:.2} kg", total_payload(&selection.tasks));
    println!("\nRoute strategy: {}", selection.route_strategy);
    println!("Charge strategy: {}", selection.charge_strategy);
    println!("Temperature: {} °C", selection.temperature_c);
}

fn print_report(report: &MissionReport) {
    println!("\n=== Route planning ({}) ===", report.route_strategy);
    for route in report.routes.iter() {
        println!("\nPath for start point: {}", route.origin);
        println!("Optimal Path:");
        println!("{}", route.stops.join(" -> "));
        println!("Total Distance: {:.2} km", route.total_distance_km);
        if !route.unreached.is_empty() {
            println!("Unreached: {}", route.unreached.join(", "));
        }
        println!("Path Segment Distances:");
        for leg in route.edges.iter() {
            println!("  {}", leg);
        }
    }
    for failure in report.failures.iter() {
        println!("\nNo route for start point {}: {}", failure.origin, failure.reason);
    }

    let charge = &report.charge;
    println!("\n=== Charge simulation (strategy {}) ===", charge.strategy);
    println!(
        "Average payload {:.2} kg, degradation factor {:.3}",
        report.average_payload_kg,
        report.degradation.factor()
    );
    println!("Charged missions:");
    for leg in charge.missions.iter() {
        println!("  {}", leg);
    }
    println!("\nTotal flight time: {} minutes", charge.total_minutes_flown);
    println!("Total energy consumed: {:.2} Ah", charge.total_energy_consumed_ah);
    println!("Total segments: {}", charge.total_segments);
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let scenario = pipeline::load_scenario(&args.scenario)?;
    info!("Loaded scenario {}", args.scenario.display());
    print_selection(&scenario);

    let report = pipeline::run_mission(&scenario).map_err(ControllerError::from)?;
    print_report(&report);

    if let Some(path) = args.json {
        let file = File::create(&path).map_err(ControllerError::io(path.display().to_string()))?;
        export::write_json(&report, BufWriter::new(file))?;
        info!("Wrote {}", path.display());
    }
    if let Some(path) = args.csv {
        let file = File::create(&path).map_err(ControllerError::io(path.display().to_string()))?;
        export::write_csv(&report.charge.missions, file)?;
        info!("Wrote {}", path.display());
    }
    Ok(())
}
