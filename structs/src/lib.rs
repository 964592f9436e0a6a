use serde::{Deserialize, Serialize};

pub mod drone;
pub mod error;
pub mod leg;
pub mod scenario;
pub mod selection;

pub use error::Error;
pub use leg::Leg;

/// Hard physical limits of the delivery drone and the mission rules built on them.
pub mod limits {
    pub const MAX_PAYLOAD_KG: f64 = 15.06;
    pub const MAX_RANGE_KM: f64 = 3.6;
    pub const MAX_BATTERY_AH: f64 = 18.0;
    pub const MAX_AGGREGATE_PAYLOAD_KG: f64 = 45.03;

    // Domains of the fitted degradation models.
    pub const ATTENUATION_MAX_PAYLOAD_KG: f64 = 15.9;
    pub const MIN_TEMPERATURE_C: f64 = 0.0;
    pub const MAX_TEMPERATURE_C: f64 = 50.0;
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn on_circle(radius: f64, angle: f64) -> Point {
        Point {
            x: radius * angle.cos(),
            y: radius * angle.sin(),
        }
    }

    pub fn dist(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}
