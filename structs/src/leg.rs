use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Error;

pub const CHARGE_STATION: &str = "Charge station";

pub fn charge_spot_name(id: usize) -> String {
    format!("Charge spot {}", id)
}

/// A single directed flight between two named locations.
///
/// The text form `"<start> -> <end>: <distance> km"` (two decimals) is only a
/// serialization boundary. Names containing `" -> "` cannot be parsed back.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    pub start: String,
    pub end: String,
    pub distance_km: f64,
}

impl Leg {
    pub fn new(start: impl Into<String>, end: impl Into<String>, distance_km: f64) -> Leg {
        Leg {
            start: start.into(),
            end: end.into(),
            distance_km,
        }
    }

    pub fn is_charge_detour(&self) -> bool {
        self.start == CHARGE_STATION || self.end == CHARGE_STATION
    }

    /// The leg as it reads in its text form, distance rounded to 0.01 km.
    pub fn quantized(&self) -> Leg {
        let distance_km = format!("{:.2}", self.distance_km)
            .parse()
            .unwrap_or(self.distance_km);
        Leg::new(self.start.clone(), self.end.clone(), distance_km)
    }

    pub fn parse_all<S: AsRef<str>>(lines: &[S]) -> Result<Vec<Leg>, Error> {
        lines.iter().map(|l| l.as_ref().parse()).collect()
    }
}

impl fmt::Display for Leg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}: {:.2} km", self.start, self.end, self.distance_km)
    }
}

impl FromStr for Leg {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || Error::LegFormat(s.to_string());
        let (route, distance) = s.rsplit_once(':').ok_or_else(malformed)?;
        let (start, end) = route.split_once(" -> ").ok_or_else(malformed)?;
        let distance_km = distance
            .trim()
            .strip_suffix("km")
            .ok_or_else(malformed)?
            .trim()
            .parse::<f64>()
            .map_err(|_| malformed())?;
        if !distance_km.is_finite() || distance_km < 0.0 {
            return Err(malformed());
        }

        let (start, end) = (start.trim(), end.trim());
        if start.is_empty() || end.is_empty() {
            return Err(malformed());
        }
        Ok(Leg::new(start, end, distance_km))
    }
}
