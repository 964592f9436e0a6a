//! Rewrites a route into flight segments with charging detours.

use log::{debug, info, warn};
use medroute_structs::{
    drone::DroneParams,
    leg::{charge_spot_name, CHARGE_STATION},
    limits,
    selection::ChargeStrategy,
    Error, Leg,
};
use serde::{Deserialize, Serialize};

use crate::{
    degradation::Degradation,
    flight::{FlightOutcome, FlightSimulation},
};

/// Battery bookkeeping carried from one leg to the next.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChargeState {
    pub current_energy_ah: f64,
    pub missions_since_charge: u32,
    pub next_charge_spot_id: usize,
}

impl ChargeState {
    pub fn full(capacity_ah: f64) -> ChargeState {
        ChargeState {
            current_energy_ah: capacity_ah,
            missions_since_charge: 0,
            next_charge_spot_id: 1,
        }
    }

    /// Hands out the next intermediate charge spot id.
    pub fn take_charge_spot(&mut self) -> usize {
        let id = self.next_charge_spot_id;
        self.next_charge_spot_id += 1;
        id
    }

    pub fn recharge(&mut self, capacity_ah: f64) {
        self.current_energy_ah = capacity_ah;
        self.missions_since_charge = 0;
    }

    pub fn record_mission(&mut self, energy_remaining_ah: f64) {
        self.current_energy_ah = energy_remaining_ah;
        self.missions_since_charge += 1;
    }

    pub fn charge_due(&self, missions_per_charge: u32) -> bool {
        self.missions_since_charge >= missions_per_charge
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargeReport {
    pub strategy: ChargeStrategy,
    pub missions: Vec<Leg>,
    pub total_minutes_flown: u32,
    pub total_energy_consumed_ah: f64,
    pub total_segments: usize,
    pub truncations: usize,
}

impl ChargeReport {
    pub fn mission_lines(&self) -> Vec<String> {
        self.missions.iter().map(|l| l.to_string()).collect()
    }
}

/// Splits every leg longer than the drone range into a full-range hop to a
/// fresh charge spot and the remainder. Returns the new legs and the number
/// of splits.
pub fn split_over_range(legs: &[Leg], state: &mut ChargeState) -> (Vec<Leg>, usize) {
    let mut out = Vec::with_capacity(legs.len());
    let mut truncations = 0;
    for leg in legs {
        if leg.distance_km > limits::MAX_RANGE_KM {
            truncations += 1;
            let spot = charge_spot_name(state.take_charge_spot());
            debug!("splitting {} at {}", leg, spot);
            out.push(Leg::new(leg.start.clone(), spot.clone(), limits::MAX_RANGE_KM));
            out.push(Leg::new(spot, leg.end.clone(), leg.distance_km - limits::MAX_RANGE_KM));
        } else {
            out.push(leg.clone());
        }
    }
    (out, truncations)
}

/// Running totals of one charging run.
#[derive(Default)]
struct Totals {
    missions: Vec<Leg>,
    minutes: u32,
    energy_ah: f64,
}

impl Totals {
    fn add_flight(&mut self, out: &FlightOutcome, capacity_ah: f64) {
        self.minutes += out.minutes_flown;
        self.energy_ah += capacity_ah - out.energy_remaining_ah;
    }
}

pub struct ChargingEngine {
    pub params: DroneParams,
    pub degradation: Degradation,
}

impl ChargingEngine {
    /// `average_payload_kg` is the mission average; it only feeds the payload
    /// attenuation coefficient, the simulated legs always carry
    /// `params.leg_payload_kg`.
    pub fn new(
        params: DroneParams,
        average_payload_kg: f64,
        temperature_coeff: f64,
    ) -> Result<ChargingEngine, Error> {
        let payload = crate::degradation::payload_attenuation(average_payload_kg)?;
        Self::with_degradation(
            params,
            Degradation {
                payload,
                temperature: temperature_coeff,
            },
        )
    }

    pub fn with_degradation(
        params: DroneParams,
        degradation: Degradation,
    ) -> Result<ChargingEngine, Error> {
        params.validate()?;
        Ok(ChargingEngine {
            params,
            degradation,
        })
    }

    fn fly(&self, distance_km: f64, capacity_ah: f64) -> Result<FlightOutcome, Error> {
        Ok(FlightSimulation::new(
            &self.params,
            self.params.leg_payload_kg,
            distance_km,
            capacity_ah,
            self.degradation,
        )?
        .outcome())
    }

    /// Return to the charge station and back out, each at half the distance
    /// of the leg just flown and each on a full battery.
    fn detour(&self, totals: &mut Totals, from: &str, to: &str, leg_km: f64) -> Result<(), Error> {
        let capacity = self.params.battery_capacity_ah;
        let half = leg_km / 2.0;
        totals.missions.push(Leg::new(from, CHARGE_STATION, half));
        totals.missions.push(Leg::new(CHARGE_STATION, to, half));
        let back = self.fly(half, capacity)?;
        totals.add_flight(&back, capacity);
        let out = self.fly(half, capacity)?;
        totals.add_flight(&out, capacity);
        Ok(())
    }

    /// Distances are taken at the 0.01 km precision of the mission text.
    pub fn run(&self, legs: &[Leg], strategy: ChargeStrategy) -> Result<ChargeReport, Error> {
        let legs = legs.iter().map(Leg::quantized).collect::<Vec<_>>();
        let mut state = ChargeState::full(self.params.battery_capacity_ah);
        let (legs, truncations) = split_over_range(&legs, &mut state);
        if truncations > 0 {
            info!("{} legs exceed the {} km range and were split", truncations, limits::MAX_RANGE_KM);
        }

        let (totals, total_segments) = match strategy {
            ChargeStrategy::A => {
                let totals = self.strategy_a(&legs)?;
                let segments = legs.len() + truncations + 2 * legs.len().saturating_sub(1);
                (totals, segments)
            }
            ChargeStrategy::B => {
                let totals = self.strategy_b(&legs, &mut state)?;
                let segments = totals.missions.len();
                (totals, segments)
            }
        };

        info!(
            "strategy {}: {} segments, {} min, {:.3} Ah",
            strategy, total_segments, totals.minutes, totals.energy_ah
        );
        Ok(ChargeReport {
            strategy,
            missions: totals.missions,
            total_minutes_flown: totals.minutes,
            total_energy_consumed_ah: totals.energy_ah,
            total_segments,
            truncations,
        })
    }

    /// Recharge after every leg.
    fn strategy_a(&self, legs: &[Leg]) -> Result<Totals, Error> {
        let capacity = self.params.battery_capacity_ah;
        let mut totals = Totals::default();
        for (i, leg) in legs.iter().enumerate() {
            let out = self.fly(leg.distance_km, capacity)?;
            debug!("{} -> {} min, {:.3} Ah left", leg, out.minutes_flown, out.energy_remaining_ah);
            totals.missions.push(leg.clone());
            totals.add_flight(&out, capacity);

            if let Some(next) = legs.get(i + 1) {
                self.detour(&mut totals, &leg.end, &next.start, leg.distance_km)?;
            }
        }
        Ok(totals)
    }

    /// Carry the battery level across legs, recharging when the level looks
    /// too low for the next leg or after every `missions_per_charge` legs.
    fn strategy_b(&self, legs: &[Leg], state: &mut ChargeState) -> Result<Totals, Error> {
        let capacity = self.params.battery_capacity_ah;
        let mut totals = Totals::default();
        for (i, leg) in legs.iter().enumerate() {
            let mut out = self.fly(leg.distance_km, state.current_energy_ah)?;
            let required = leg.distance_km * self.params.current_ah_per_min() * out.minutes_flown as f64;

            if state.current_energy_ah < required {
                debug!(
                    "{:.3} Ah left but {} needs {:.3} Ah, recharging first",
                    state.current_energy_ah, leg, required
                );
                // The early detour returns to the end of the leg, not its start.
                self.detour(&mut totals, &leg.end, &leg.end, leg.distance_km)?;
                state.recharge(capacity);
                out = self.fly(leg.distance_km, state.current_energy_ah)?;
            }

            totals.missions.push(leg.clone());
            totals.add_flight(&out, state.current_energy_ah);
            state.record_mission(out.energy_remaining_ah);

            if state.charge_due(self.params.missions_per_charge) {
                if let Some(next) = legs.get(i + 1) {
                    self.detour(&mut totals, &leg.end, &next.start, leg.distance_km)?;
                    state.recharge(capacity);
                }
            }
        }
        Ok(totals)
    }

    /// Runs with a textual strategy token. The token is checked before any
    /// leg is simulated.
    pub fn run_named(&self, legs: &[Leg], strategy: &str) -> Result<ChargeReport, Error> {
        let strategy = strategy.parse::<ChargeStrategy>().map_err(|e| {
            warn!("rejecting charge strategy {:?}", strategy);
            e
        })?;
        self.run(legs, strategy)
    }

    /// Like [`ChargingEngine::run_named`] for legs in their text form.
    pub fn run_text<S: AsRef<str>>(&self, lines: &[S], strategy: &str) -> Result<ChargeReport, Error> {
        let strategy = strategy.parse::<ChargeStrategy>()?;
        let legs = Leg::parse_all(lines)?;
        self.run(&legs, strategy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::degradation::temperature_degradation;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn plain_engine(params: DroneParams) -> ChargingEngine {
        ChargingEngine::with_degradation(params, Degradation::default()).unwrap()
    }

    #[test]
    fn state_transitions() {
        let mut s = ChargeState::full(18.0);
        assert_eq!(s.take_charge_spot(), 1);
        assert_eq!(s.take_charge_spot(), 2);
        assert_eq!(s.next_charge_spot_id, 3);

        s.record_mission(12.5);
        assert_eq!(s.current_energy_ah, 12.5);
        assert!(!s.charge_due(2));
        s.record_mission(7.0);
        assert!(s.charge_due(2));

        s.recharge(18.0);
        assert_eq!(s.current_energy_ah, 18.0);
        assert_eq!(s.missions_since_charge, 0);
        assert_eq!(s.next_charge_spot_id, 3);
    }

    #[test]
    fn long_legs_split_at_range() {
        let legs = vec![
            Leg::new("A", "B", 5.0),
            Leg::new("B", "C", 3.6),
            Leg::new("C", "D", 4.2),
        ];
        let mut state = ChargeState::full(18.0);
        let (split, truncations) = split_over_range(&legs, &mut state);
        assert_eq!(truncations, 2);
        assert_eq!(split.len(), 5);

        assert_eq!(split[0], Leg::new("A", "Charge spot 1", 3.6));
        assert_eq!(split[1].start, "Charge spot 1");
        assert_eq!(split[1].end, "B");
        assert!(close(split[0].distance_km + split[1].distance_km, 5.0));
        assert_eq!(split[2], legs[1]);
        assert_eq!(split[3].end, "Charge spot 2");
        assert!(close(split[3].distance_km + split[4].distance_km, 4.2));
    }

    #[test]
    fn strategy_a_two_legs_at_25_degrees() {
        let _ = env_logger::try_init();
        let temperature = temperature_degradation(25.0).unwrap();
        let engine = ChargingEngine::new(DroneParams::default(), 1.0, temperature).unwrap();
        let legs = vec![Leg::new("O", "T1", 2.0), Leg::new("T1", "T2", 1.5)];
        let report = engine.run(&legs, ChargeStrategy::A).unwrap();

        assert_eq!(
            report.mission_lines(),
            vec![
                "O -> T1: 2.00 km",
                "T1 -> Charge station: 1.00 km",
                "Charge station -> T1: 1.00 km",
                "T1 -> T2: 1.50 km",
            ]
        );
        assert_eq!(report.total_segments, 4);
        assert_eq!(report.truncations, 0);
        // 2.0 km, 1.0 km, 1.0 km and 1.5 km legs.
        assert_eq!(report.total_minutes_flown, 12 + 6 + 6 + 9);
        let factor = engine.degradation.factor();
        let expected = 5.68 * 33.0 / 60.0 * factor;
        assert!((report.total_energy_consumed_ah - expected).abs() < 1e-9);
    }

    #[test]
    fn strategy_a_counts_truncations_twice() {
        let engine = plain_engine(DroneParams::default());
        let report = engine.run(&[Leg::new("O", "X", 5.0)], ChargeStrategy::A).unwrap();
        assert_eq!(report.truncations, 1);
        assert_eq!(report.missions.len(), 4);
        assert_eq!(report.missions[1], Leg::new("Charge spot 1", CHARGE_STATION, 1.8));
        assert_eq!(report.total_segments, 2 + 1 + 2);
    }

    #[test]
    fn strategy_a_without_legs() {
        let engine = plain_engine(DroneParams::default());
        let report = engine.run(&[], ChargeStrategy::A).unwrap();
        assert!(report.missions.is_empty());
        assert_eq!(report.total_segments, 0);
        assert_eq!(report.total_minutes_flown, 0);
    }

    #[test]
    fn strategy_b_recharges_every_two_missions() {
        let engine = plain_engine(DroneParams::default());
        let legs = vec![
            Leg::new("O", "A", 3.0),
            Leg::new("A", "B", 3.0),
            Leg::new("B", "C", 3.0),
        ];
        let report = engine.run(&legs, ChargeStrategy::B).unwrap();
        assert_eq!(
            report.mission_lines(),
            vec![
                "O -> A: 3.00 km",
                "A -> B: 3.00 km",
                "B -> Charge station: 1.50 km",
                "Charge station -> B: 1.50 km",
                "B -> C: 3.00 km",
            ]
        );
        assert_eq!(report.total_segments, 5);
        assert_eq!(report.total_minutes_flown, 3 * 17 + 2 * 9);
        let expected = 5.68 * (3.0 * 17.0 + 2.0 * 9.0) / 60.0;
        assert!((report.total_energy_consumed_ah - expected).abs() < 1e-9);
    }

    #[test]
    fn strategy_b_recharges_early_on_low_battery() {
        let _ = env_logger::try_init();
        let params = DroneParams {
            battery_capacity_ah: 5.0,
            ..DroneParams::default()
        };
        let engine = plain_engine(params);
        let legs = vec![
            Leg::new("O", "A", 3.0),
            Leg::new("A", "B", 3.0),
            Leg::new("B", "C", 3.0),
        ];
        let report = engine.run(&legs, ChargeStrategy::B).unwrap();
        assert_eq!(
            report.mission_lines(),
            vec![
                "O -> A: 3.00 km",
                "B -> Charge station: 1.50 km",
                "Charge station -> B: 1.50 km",
                "A -> B: 3.00 km",
                "C -> Charge station: 1.50 km",
                "Charge station -> C: 1.50 km",
                "B -> C: 3.00 km",
            ]
        );
        assert_eq!(report.total_segments, 7);
        assert_eq!(report.total_minutes_flown, 3 * 17 + 4 * 9);
        let expected = 5.68 * (3.0 * 17.0 + 4.0 * 9.0) / 60.0;
        assert!((report.total_energy_consumed_ah - expected).abs() < 1e-9);
    }

    #[test]
    fn unknown_strategy_produces_nothing() {
        let engine = plain_engine(DroneParams::default());
        let legs = vec![Leg::new("O", "T1", 2.0)];
        assert_eq!(
            engine.run_named(&legs, "Strategy C"),
            Err(Error::UnknownStrategy("Strategy C".to_string()))
        );
        // The token is rejected before the malformed leg is looked at.
        assert!(matches!(
            engine.run_text(&["not a leg"], "C"),
            Err(Error::UnknownStrategy(_))
        ));
    }

    #[test]
    fn text_legs() {
        let engine = plain_engine(DroneParams::default());
        let report = engine
            .run_text(&["O -> T1: 2.00 km", "T1 -> T2: 1.50 km"], "Strategy A: recharge after every mission")
            .unwrap();
        assert_eq!(report.strategy, ChargeStrategy::A);
        assert_eq!(report.total_segments, 4);
        assert!(matches!(
            engine.run_text(&["O to T1"], "B"),
            Err(Error::LegFormat(_))
        ));
    }

    #[test]
    fn distances_use_mission_text_precision() {
        let engine = plain_engine(DroneParams::default());

        // 3.603 km reads as 3.60 km, which is within range.
        let report = engine.run(&[Leg::new("O", "T", 3.603)], ChargeStrategy::A).unwrap();
        assert_eq!(report.mission_lines(), vec!["O -> T: 3.60 km"]);
        assert_eq!(report.truncations, 0);
        assert_eq!(report.total_segments, 1);
        assert_eq!(report.total_minutes_flown, 20);
        assert_eq!(
            report,
            engine.run_text(&["O -> T: 3.60 km"], "A").unwrap()
        );

        // 1.804 km is flown as 1.80 km, ten minutes rather than eleven.
        let report = engine.run(&[Leg::new("O", "T", 1.804)], ChargeStrategy::B).unwrap();
        assert_eq!(report.missions, vec![Leg::new("O", "T", 1.8)]);
        assert_eq!(report.total_minutes_flown, 10);
    }

    #[test]
    fn engine_rejects_invalid_drone() {
        let params = DroneParams {
            battery_capacity_ah: 0.0,
            ..DroneParams::default()
        };
        assert!(matches!(
            ChargingEngine::with_degradation(params.clone(), Degradation::default()),
            Err(Error::Range { .. })
        ));
        assert!(ChargingEngine::new(params, 1.0, 0.0).is_err());
    }

    #[test]
    fn unsplittable_leg_is_a_range_error() {
        let engine = plain_engine(DroneParams::default());
        assert!(matches!(
            engine.run(&[Leg::new("O", "X", 7.5)], ChargeStrategy::A),
            Err(Error::Range { .. })
        ));
    }
}
