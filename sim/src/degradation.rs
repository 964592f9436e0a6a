//! Fitted battery degradation models.
//!
//! Both models return a dimensionless increment over the baseline discharge;
//! a coefficient of 0 means no degradation.

use medroute_structs::{limits, Error};
use serde::{Deserialize, Serialize};

const PAYLOAD_A: f64 = 0.810;
const PAYLOAD_B: f64 = 0.163;
const PAYLOAD_C: f64 = 0.006;

const TEMPERATURE_A: f64 = 0.000126;
const TEMPERATURE_B: f64 = 0.1288;
const TEMPERATURE_C: f64 = -0.000126;

/// Extra battery drain caused by carrying `payload_kg`.
pub fn payload_attenuation(payload_kg: f64) -> Result<f64, Error> {
    let p = Error::check_range(
        "payload (kg)",
        payload_kg,
        0.0,
        limits::ATTENUATION_MAX_PAYLOAD_KG,
    )?;
    Ok(PAYLOAD_A * (1.0 - (-PAYLOAD_B * p).exp()) + PAYLOAD_C * p)
}

/// Extra battery drain at ambient temperature `temp_c`. Never negative.
pub fn temperature_degradation(temp_c: f64) -> Result<f64, Error> {
    let t = Error::check_range(
        "temperature (°C)",
        temp_c,
        limits::MIN_TEMPERATURE_C,
        limits::MAX_TEMPERATURE_C,
    )?;
    Ok((TEMPERATURE_A * (TEMPERATURE_B * t).exp() + TEMPERATURE_C).max(0.0))
}

/// Multiplier on the nominal discharge.
pub fn degradation_factor(payload_coeff: f64, temperature_coeff: f64) -> f64 {
    1.0 + temperature_coeff + payload_coeff
}

/// The two coefficients of one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Degradation {
    pub payload: f64,
    pub temperature: f64,
}

impl Degradation {
    pub fn from_conditions(average_payload_kg: f64, temp_c: f64) -> Result<Degradation, Error> {
        Ok(Degradation {
            payload: payload_attenuation(average_payload_kg)?,
            temperature: temperature_degradation(temp_c)?,
        })
    }

    pub fn factor(&self) -> f64 {
        degradation_factor(self.payload, self.temperature)
    }
}
