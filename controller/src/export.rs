use std::io::Write;

use medroute_structs::Leg;
use serde::Serialize;

use crate::{error::ControllerError, pipeline::MissionReport};

#[derive(Serialize)]
struct MissionRow<'a> {
    start: &'a str,
    end: &'a str,
    distance_km: f64,
    kind: &'static str,
}

impl<'a> From<&'a Leg> for MissionRow<'a> {
    fn from(leg: &'a Leg) -> Self {
        MissionRow {
            start: &leg.start,
            end: &leg.end,
            distance_km: leg.distance_km,
            kind: if leg.is_charge_detour() {
                "charge_detour"
            } else {
                "mission"
            },
        }
    }
}

pub fn write_json<W: Write>(report: &MissionReport, writer: W) -> Result<(), ControllerError> {
    serde_json::to_writer_pretty(writer, report)?;
    Ok(())
}

/// One row per flight segment, charging detours included.
pub fn write_csv<W: Write>(missions: &[Leg], writer: W) -> Result<(), ControllerError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for leg in missions {
        wtr.serialize(MissionRow::from(leg))?;
    }
    wtr.flush().map_err(ControllerError::io("csv output"))?;
    Ok(())
}
