use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{limits, Error};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeightedPoint {
    pub name: String,
    pub payload_kg: f64,
}

impl WeightedPoint {
    pub fn new(name: impl Into<String>, payload_kg: f64) -> WeightedPoint {
        WeightedPoint {
            name: name.into(),
            payload_kg,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RouteStrategy {
    AStar,
    Dijkstra,
}

impl FromStr for RouteStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a-star" | "astar" | "a*" => Ok(RouteStrategy::AStar),
            "dijkstra" => Ok(RouteStrategy::Dijkstra),
            _ => Err(Error::UnknownStrategy(s.to_string())),
        }
    }
}

impl fmt::Display for RouteStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RouteStrategy::AStar => "a-star",
            RouteStrategy::Dijkstra => "dijkstra",
        })
    }
}

impl TryFrom<String> for RouteStrategy {
    type Error = Error;
    fn try_from(s: String) -> Result<Self, Error> {
        s.parse()
    }
}

impl From<RouteStrategy> for String {
    fn from(s: RouteStrategy) -> String {
        s.to_string()
    }
}

/// When the drone goes back to a charging station between missions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ChargeStrategy {
    /// Recharge after every mission.
    A,
    /// Recharge after every two missions, or earlier if the battery runs short.
    B,
}

impl FromStr for ChargeStrategy {
    type Err = Error;

    // Also accepts the front-end labels, e.g. "Strategy B: Return to charge after ...".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A" => Ok(ChargeStrategy::A),
            "B" => Ok(ChargeStrategy::B),
            label if label.contains("Strategy A") => Ok(ChargeStrategy::A),
            label if label.contains("Strategy B") => Ok(ChargeStrategy::B),
            _ => Err(Error::UnknownStrategy(s.to_string())),
        }
    }
}

impl fmt::Display for ChargeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ChargeStrategy::A => "A",
            ChargeStrategy::B => "B",
        })
    }
}

impl TryFrom<String> for ChargeStrategy {
    type Error = Error;
    fn try_from(s: String) -> Result<Self, Error> {
        s.parse()
    }
}

impl From<ChargeStrategy> for String {
    fn from(s: ChargeStrategy) -> String {
        s.to_string()
    }
}

/// The points, weights and strategies picked by the operator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub origins: Vec<WeightedPoint>,
    pub tasks: Vec<WeightedPoint>,
    pub route_strategy: RouteStrategy,
    pub charge_strategy: ChargeStrategy,
    pub temperature_c: f64,
}

impl Selection {
    pub fn origin_names(&self) -> Vec<String> {
        self.origins.iter().map(|p| p.name.clone()).collect()
    }

    pub fn task_names(&self) -> Vec<String> {
        self.tasks.iter().map(|p| p.name.clone()).collect()
    }

    /// Checks that both point sets are non-empty and every single payload is
    /// carriable. Aggregate payload rules are left to the caller.
    pub fn validate(&self) -> Result<(), Error> {
        if self.origins.is_empty() {
            return Err(Error::EmptySelection("origins"));
        }
        if self.tasks.is_empty() {
            return Err(Error::EmptySelection("tasks"));
        }
        for p in self.origins.iter().chain(self.tasks.iter()) {
            Error::check_range("payload (kg)", p.payload_kg, 0.0, limits::MAX_PAYLOAD_KG)?;
        }
        Error::check_range(
            "temperature (°C)",
            self.temperature_c,
            limits::MIN_TEMPERATURE_C,
            limits::MAX_TEMPERATURE_C,
        )?;
        Ok(())
    }
}

pub fn total_payload(points: &[WeightedPoint]) -> f64 {
    points.iter().map(|p| p.payload_kg).sum()
}

/// Which selected points the mission average payload is taken over.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadBasis {
    #[default]
    Origins,
    Tasks,
    All,
}

impl PayloadBasis {
    pub fn average_payload(&self, selection: &Selection) -> Result<f64, Error> {
        let (sum, n) = match self {
            PayloadBasis::Origins => (total_payload(&selection.origins), selection.origins.len()),
            PayloadBasis::Tasks => (total_payload(&selection.tasks), selection.tasks.len()),
            PayloadBasis::All => (
                total_payload(&selection.origins) + total_payload(&selection.tasks),
                selection.origins.len() + selection.tasks.len(),
            ),
        };
        if n == 0 {
            return Err(Error::EmptySelection(match self {
                PayloadBasis::Tasks => "tasks",
                _ => "origins",
            }));
        }
        Ok(sum / n as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection() -> Selection {
        Selection {
            origins: vec![WeightedPoint::new("O1", 2.0), WeightedPoint::new("O2", 4.0)],
            tasks: vec![WeightedPoint::new("T1", 1.0)],
            route_strategy: RouteStrategy::AStar,
            charge_strategy: ChargeStrategy::A,
            temperature_c: 25.0,
        }
    }

    #[test]
    fn strategy_tokens() {
        assert_eq!("a-star".parse(), Ok(RouteStrategy::AStar));
        assert_eq!("Dijkstra".parse(), Ok(RouteStrategy::Dijkstra));
        assert_eq!(
            "bfs".parse::<RouteStrategy>(),
            Err(Error::UnknownStrategy("bfs".to_string()))
        );

        assert_eq!("A".parse(), Ok(ChargeStrategy::A));
        assert_eq!(
            "Strategy B: Return to charge after completing two missions".parse(),
            Ok(ChargeStrategy::B)
        );
        assert_eq!(
            "1 - Strategy A: Return to charge after each mission".parse(),
            Ok(ChargeStrategy::A)
        );
        assert_eq!(
            "C".parse::<ChargeStrategy>(),
            Err(Error::UnknownStrategy("C".to_string()))
        );
    }

    #[test]
    fn strategies_deserialize_from_tokens() {
        let s: Selection = serde_json::from_str(
            r#"{"origins": [{"name": "O", "payload_kg": 1.0}],
                "tasks": [{"name": "T", "payload_kg": 0.5}],
                "route_strategy": "dijkstra",
                "charge_strategy": "B",
                "temperature_c": 10.0}"#,
        )
        .unwrap();
        assert_eq!(s.route_strategy, RouteStrategy::Dijkstra);
        assert_eq!(s.charge_strategy, ChargeStrategy::B);

        let bad = serde_json::from_str::<Selection>(
            r#"{"origins": [], "tasks": [], "route_strategy": "a-star",
                "charge_strategy": "Z", "temperature_c": 10.0}"#,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn validation() {
        assert_eq!(selection().validate(), Ok(()));

        let mut s = selection();
        s.tasks.clear();
        assert_eq!(s.validate(), Err(Error::EmptySelection("tasks")));

        let mut s = selection();
        s.origins[1].payload_kg = 15.07;
        assert!(matches!(s.validate(), Err(Error::Range { .. })));

        let mut s = selection();
        s.temperature_c = -1.0;
        assert!(matches!(s.validate(), Err(Error::Range { .. })));
    }

    #[test]
    fn average_payload_by_basis() {
        let s = selection();
        assert_eq!(PayloadBasis::Origins.average_payload(&s), Ok(3.0));
        assert_eq!(PayloadBasis::Tasks.average_payload(&s), Ok(1.0));
        assert_eq!(PayloadBasis::All.average_payload(&s), Ok(7.0 / 3.0));
    }
}
