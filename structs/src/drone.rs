use serde::{Deserialize, Serialize};

use crate::{limits, Error};

/// Performance figures of the delivery drone. The defaults describe the
/// reference airframe; scenarios may override any of them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DroneParams {
    pub cruise_speed_kmh: f64,
    pub discharge_current_a: f64,
    pub battery_capacity_ah: f64,
    /// Payload carried on every simulated leg, independent of the mission payload.
    pub leg_payload_kg: f64,
    pub missions_per_charge: u32,
}

impl Default for DroneParams {
    fn default() -> Self {
        DroneParams {
            cruise_speed_kmh: 10.8,
            discharge_current_a: 5.68,
            battery_capacity_ah: limits::MAX_BATTERY_AH,
            leg_payload_kg: 1.0,
            missions_per_charge: 2,
        }
    }
}

impl DroneParams {
    /// Rejects overrides the flight model cannot work with.
    pub fn validate(&self) -> Result<(), Error> {
        Error::check_range("cruise speed (km/h)", self.cruise_speed_kmh, f64::MIN_POSITIVE, f64::MAX)?;
        Error::check_range(
            "discharge current (A)",
            self.discharge_current_a,
            f64::MIN_POSITIVE,
            f64::MAX,
        )?;
        Error::check_range(
            "battery capacity (Ah)",
            self.battery_capacity_ah,
            f64::MIN_POSITIVE,
            limits::MAX_BATTERY_AH,
        )?;
        Error::check_range("leg payload (kg)", self.leg_payload_kg, 0.0, limits::MAX_PAYLOAD_KG)?;
        Ok(())
    }

    pub fn speed_km_per_min(&self) -> f64 {
        self.cruise_speed_kmh / 60.0
    }

    /// Ah drawn per minute of flight before degradation.
    pub fn current_ah_per_min(&self) -> f64 {
        self.discharge_current_a / 60.0
    }
}
