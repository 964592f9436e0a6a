pub mod charging;
pub mod degradation;
pub mod flight;

pub use charging::{ChargeReport, ChargingEngine};
pub use degradation::Degradation;
pub use flight::{simulate_flight, FlightOutcome, FlightSimulation, FlightState};
