use medroute_structs::{drone::DroneParams, limits, Error};
use serde::{Deserialize, Serialize};

use crate::degradation::Degradation;

/// Battery and position at one simulated minute.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlightState {
    pub minute: u32,
    pub energy_used_ah: f64,
    pub energy_remaining_ah: f64,
    /// Minutes left until the battery is empty at the nominal current.
    pub minutes_remaining: f64,
    pub distance_flown_km: f64,
    pub distance_remaining_km: f64,
}

/// Final state of a simulated leg.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlightOutcome {
    pub minutes_flown: u32,
    pub minutes_remaining: f64,
    pub energy_remaining_ah: f64,
}

impl From<FlightState> for FlightOutcome {
    fn from(s: FlightState) -> Self {
        FlightOutcome {
            minutes_flown: s.minute,
            minutes_remaining: s.minutes_remaining,
            energy_remaining_ah: s.energy_remaining_ah,
        }
    }
}

/// Minute-by-minute discharge of a single leg.
///
/// The clock runs from minute 0 up to and including the whole number of
/// minutes needed to cover the distance, and stops early at the first minute
/// where the target is reached or the battery is empty.
#[derive(Debug, Clone)]
pub struct FlightSimulation<'a> {
    params: &'a DroneParams,
    distance_km: f64,
    capacity_ah: f64,
    factor: f64,
    total_minutes: u32,
}

impl<'a> FlightSimulation<'a> {
    pub fn new(
        params: &'a DroneParams,
        payload_kg: f64,
        distance_km: f64,
        capacity_ah: f64,
        degradation: Degradation,
    ) -> Result<FlightSimulation<'a>, Error> {
        Error::check_range("payload (kg)", payload_kg, 0.0, limits::MAX_PAYLOAD_KG)?;
        Error::check_range("distance (km)", distance_km, 0.0, limits::MAX_RANGE_KM)?;
        Error::check_range("battery capacity (Ah)", capacity_ah, 0.0, limits::MAX_BATTERY_AH)?;
        params.validate()?;
        let speed = params.speed_km_per_min();

        Ok(FlightSimulation {
            params,
            distance_km,
            capacity_ah,
            factor: degradation.factor(),
            total_minutes: (distance_km / speed).ceil() as u32,
        })
    }

    /// Whole minutes needed to cover the distance at cruise speed.
    pub fn required_minutes(&self) -> u32 {
        self.total_minutes
    }

    pub fn state_at(&self, minute: u32) -> FlightState {
        let current = self.params.discharge_current_a;
        let energy_used = current * minute as f64 / 60.0 * self.factor;
        let energy_remaining = (self.capacity_ah - energy_used).max(0.0);

        let minutes_remaining = if energy_remaining > 0.0 && current > 0.0 {
            energy_remaining * 60.0 / current
        } else {
            0.0
        };

        let distance_flown = if minute == self.total_minutes {
            self.distance_km
        } else {
            (self.params.speed_km_per_min() * minute as f64).min(self.distance_km)
        };

        FlightState {
            minute,
            energy_used_ah: energy_used,
            energy_remaining_ah: energy_remaining,
            minutes_remaining,
            distance_flown_km: distance_flown,
            distance_remaining_km: (self.distance_km - distance_flown).max(0.0),
        }
    }

    fn is_final(&self, state: &FlightState) -> bool {
        state.distance_flown_km >= self.distance_km || state.energy_remaining_ah <= 0.0
    }

    /// The discharge curve, ending with the state the leg finishes in.
    pub fn states(&self) -> impl Iterator<Item = FlightState> + '_ {
        let mut finished = false;
        (0..=self.total_minutes)
            .map(move |t| self.state_at(t))
            .take_while(move |s| {
                if finished {
                    return false;
                }
                finished = self.is_final(s);
                true
            })
    }

    pub fn final_state(&self) -> FlightState {
        self.states().last().unwrap_or_else(|| self.state_at(0))
    }

    pub fn outcome(&self) -> FlightOutcome {
        self.final_state().into()
    }
}

/// Simulates one leg and returns minutes flown, minutes of battery left and
/// the remaining charge in Ah.
pub fn simulate_flight(
    params: &DroneParams,
    payload_kg: f64,
    distance_km: f64,
    capacity_ah: f64,
    payload_coeff: f64,
    temperature_coeff: f64,
) -> Result<FlightOutcome, Error> {
    let degradation = Degradation {
        payload: payload_coeff,
        temperature: temperature_coeff,
    };
    Ok(FlightSimulation::new(params, payload_kg, distance_km, capacity_ah, degradation)?.outcome())
}
